//! Damage sink и смерть
//!
//! Мир → `ProjectileHit` (buffered) → `apply_projectile_hits` → Health.
//! Health sink эмитит entity-targeted `Damaged` / `Died` triggers;
//! солдат (см. `soldier::reactions`) подписан на них observers.

use bevy::prelude::*;
use crate::components::Health;

/// Event: пуля попала в цель (мир → ECS)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileHit {
    pub shooter: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Trigger: health получил урон
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Damaged {
    pub amount: u32,
    pub source: Option<Entity>,
}

/// Trigger: health дошёл до нуля (ровно один раз)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Died;

/// Маркер: entity мёртв, AI и detection его пропускают
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Деспавн entity после указанного времени (секунды fixed clock)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DespawnAfter {
    pub despawn_time: f32,
}

/// System: ProjectileHit → Health → Damaged/Died triggers
pub fn apply_projectile_hits(
    mut commands: Commands,
    mut hits: EventReader<ProjectileHit>,
    mut targets: Query<&mut Health, Without<Dead>>,
) {
    for hit in hits.read() {
        if hit.shooter == hit.target {
            crate::logger::log(&format!("⚠️ Self-hit ignored for {:?}", hit.shooter));
            continue;
        }

        let Ok(mut health) = targets.get_mut(hit.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let applied = health.take_damage(hit.damage);
        crate::logger::log(&format!(
            "💥 {:?} hit {:?} for {} (HP: {}/{})",
            hit.shooter, hit.target, applied, health.current, health.max
        ));

        commands.trigger_targets(
            Damaged {
                amount: applied,
                source: Some(hit.shooter),
            },
            hit.target,
        );

        if !health.is_alive() {
            commands.trigger_targets(Died, hit.target);
        }
    }
}

/// System: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_time {
            crate::logger::log(&format!("⚰️ Despawning {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
