//! Detection: восприятие солдат (line-of-sight + range)
//!
//! Pipeline за тик:
//! 1. `update_detection` собирает препятствия и потенциальные цели
//! 2. Для каждого солдата ищет ближайшего видимого врага в detection range
//! 3. `DetectionModule::update` → snapshot + edge
//! 4. Edge → `TargetDetected` / `TargetLost` observer trigger на солдата
//!
//! Триггеры диспатчатся при flush команд, до Decision set: AI видит
//! переход в том же тике.

use bevy::prelude::*;

pub mod line_of_sight;
pub mod module;

pub use line_of_sight::{Obstacle, ObstacleSet, ObstacleShape, OwnedBy};
pub use module::{DetectionConfig, DetectionEdge, DetectionModule, DetectionState, Sighting};

use crate::combat::Dead;
use crate::components::{Actor, AimPoint, Health};
use crate::soldier::{SetupFailed, Soldier, TargetDetected, TargetLost};

/// Кандидат в цели на этот тик
#[derive(Debug, Clone, Copy)]
struct Candidate {
    entity: Entity,
    faction_id: u64,
    position: Vec3,
    aim_point: Vec3,
}

/// Ближайший видимый враг из `candidates`
///
/// Дистанция и LOS меряются от `source` до aim point кандидата.
fn find_closest_visible(
    observer: Entity,
    faction_id: u64,
    source: Vec3,
    detection_range: f32,
    candidates: &[Candidate],
    obstacles: &ObstacleSet,
) -> Option<Sighting> {
    let mut closest: Option<(f32, Sighting)> = None;
    let range_sq = detection_range * detection_range;

    for candidate in candidates {
        if candidate.entity == observer || candidate.faction_id == faction_id {
            continue;
        }

        let distance_sq = source.distance_squared(candidate.aim_point);
        if distance_sq >= range_sq {
            continue;
        }
        if closest.is_some_and(|(best, _)| distance_sq >= best) {
            continue;
        }

        // Свои коллайдеры и коллайдеры цели не перекрывают луч
        if obstacles.segment_clear(source, candidate.aim_point, &[observer, candidate.entity]) {
            closest = Some((
                distance_sq,
                Sighting {
                    target: candidate.entity,
                    position: candidate.position,
                },
            ));
        }
    }

    closest.map(|(_, sighting)| sighting)
}

/// System: perception tick для всех живых солдат
pub fn update_detection(
    mut commands: Commands,
    mut soldiers: Query<(Entity, &Transform, &Actor, &mut DetectionModule), (With<Soldier>, Without<Dead>, Without<SetupFailed>)>,
    actors: Query<(Entity, &Transform, &Actor, Option<&Health>, Option<&AimPoint>)>,
    obstacles: Query<(&Transform, &Obstacle, Option<&OwnedBy>)>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    let mut obstacle_set = ObstacleSet::new();
    for (transform, obstacle, owner) in obstacles.iter() {
        obstacle_set.push(transform.translation, obstacle.shape, owner.map(|o| o.0));
    }

    let candidates: Vec<Candidate> = actors
        .iter()
        .filter(|(_, _, _, health, _)| health.map_or(true, |h| h.is_alive()))
        .map(|(entity, transform, actor, _, aim)| Candidate {
            entity,
            faction_id: actor.faction_id,
            position: transform.translation,
            aim_point: AimPoint::world_point(aim, transform),
        })
        .collect();

    for (entity, transform, actor, mut detection) in soldiers.iter_mut() {
        let source = detection.source_point(transform);
        let sighting = find_closest_visible(
            entity,
            actor.faction_id,
            source,
            detection.config.detection_range,
            &candidates,
            &obstacle_set,
        );

        let known_target_alive = detection
            .known_target()
            .is_some_and(|known| candidates.iter().any(|c| c.entity == known));

        match detection.update(now, source, sighting, known_target_alive) {
            Some(DetectionEdge::Detected) => {
                let Some(target) = detection.known_target() else {
                    continue;
                };
                crate::logger::log(&format!("👁️ {:?} detected target {:?}", entity, target));
                commands.trigger_targets(TargetDetected { target }, entity);
            }
            Some(DetectionEdge::Lost) => {
                crate::logger::log(&format!("👻 {:?} lost its target", entity));
                commands.trigger_targets(TargetLost, entity);
            }
            None => {}
        }
    }
}
