//! Soldier reactions на Health (damage, death) + animation sync.

use bevy::prelude::*;

use crate::combat::{Damaged, Dead, DespawnAfter, Died};
use crate::components::{Actor, Player};
use crate::detection::DetectionModule;
use crate::navigation::NavAgent;
use crate::roster::{Roster, SoldierRemoved};
use crate::soldier::{
    DamageCue, Posture, SetupFailed, Soldier, SoldierAnimation, SoldierDamaged, SoldierDied, SoldierStatus,
};

/// System: сброс per-tick флагов (DamageCue gate, flinch)
pub fn begin_soldier_tick(mut soldiers: Query<(&mut SoldierStatus, &mut SoldierAnimation)>) {
    for (mut status, mut animation) in soldiers.iter_mut() {
        status.was_damaged_this_tick = false;
        animation.flinch = false;
    }
}

/// Observer: Health получил урон
///
/// Реагируем только на урон от игрока-актора (его же видит detection):
/// - force acquire: стрелявший становится known target (позиция на момент урона)
/// - `SoldierDamaged` → AI
/// - `DamageCue` не чаще раза за тик
pub fn on_health_damaged(
    trigger: Trigger<Damaged>,
    mut commands: Commands,
    mut soldiers: Query<
        (&Transform, &mut DetectionModule, &mut SoldierStatus),
        (With<Soldier>, Without<Dead>, Without<SetupFailed>),
    >,
    players: Query<&Transform, (With<Player>, With<Actor>)>,
    mut cues: EventWriter<DamageCue>,
    time: Res<Time<Fixed>>,
) {
    let soldier = trigger.target();
    let damaged = trigger.event();

    let Ok((transform, mut detection, mut status)) = soldiers.get_mut(soldier) else {
        return;
    };
    let Some((source, player_transform)) = damaged
        .source
        .and_then(|source| players.get(source).ok().map(|t| (source, t)))
    else {
        return;
    };

    let now = time.elapsed_secs();
    detection.force_acquire(source, player_transform.translation, now);

    commands.trigger_targets(
        SoldierDamaged {
            amount: damaged.amount,
            source,
        },
        soldier,
    );

    if !status.was_damaged_this_tick {
        cues.write(DamageCue {
            soldier,
            position: transform.translation,
        });
        status.was_damaged_this_tick = true;
    }
    status.last_time_damaged = now;

    crate::logger::log(&format!("🩸 {:?} damaged by player {:?} ({} HP)", soldier, source, damaged.amount));
}

/// Observer: Health дошёл до нуля
///
/// Снять с roster → остановить агента → поза Dead → Dead marker →
/// `SoldierDied` → despawn (сразу или через death_duration).
pub fn on_health_died(
    trigger: Trigger<Died>,
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    mut soldiers: Query<(&Soldier, Option<&mut NavAgent>, &mut SoldierAnimation), Without<Dead>>,
    mut removed: EventWriter<SoldierRemoved>,
    time: Res<Time<Fixed>>,
) {
    let soldier = trigger.target();
    let Ok((config, nav, mut animation)) = soldiers.get_mut(soldier) else {
        return;
    };

    if let Some(remaining) = roster.unregister(soldier) {
        removed.write(SoldierRemoved { soldier, remaining });
    }

    if let Some(mut nav) = nav {
        nav.stop();
    }
    animation.posture = Posture::Dead;
    animation.move_speed = 0.0;

    commands.entity(soldier).insert(Dead);
    commands.trigger_targets(SoldierDied, soldier);

    let death_duration = config.config.death_duration;
    if death_duration <= 0.0 {
        commands.entity(soldier).despawn();
    } else {
        commands.entity(soldier).insert(DespawnAfter {
            despawn_time: time.elapsed_secs() + death_duration,
        });
    }

    crate::logger::log_info(&format!(
        "💀 Soldier {:?} died ({} remaining)",
        soldier,
        roster.remaining()
    ));
}

/// System: NavAgent velocity → animation move speed
pub fn sync_soldier_animation(mut soldiers: Query<(&NavAgent, &mut SoldierAnimation), Without<Dead>>) {
    for (nav, mut animation) in soldiers.iter_mut() {
        animation.move_speed = nav.velocity_magnitude();
    }
}
