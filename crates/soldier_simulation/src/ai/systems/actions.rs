//! Per-state actions (после transitions).

use bevy::prelude::*;

use crate::ai::{AIConfig, AIState};
use crate::combat::{Dead, FireAnimationGate, WeaponController, WeaponFired};
use crate::detection::DetectionModule;
use crate::navigation::NavAgent;
use crate::patrol::{PatrolPath, PatrolRoute};
use crate::soldier::{orient_towards, try_attack, Posture, SetupFailed, Soldier, SoldierAnimation};

/// System: действие текущего состояния
///
/// - Patrol: поза Walk, следующий waypoint если дошли, nav → waypoint
/// - Follow: nav → last known position
/// - Attack: сближение до stop distance, поворот и выстрел всегда
pub fn ai_state_actions(
    mut commands: Commands,
    mut fired: EventWriter<WeaponFired>,
    mut soldiers: Query<
        (
            Entity,
            &AIState,
            &Soldier,
            &AIConfig,
            &DetectionModule,
            &mut Transform,
            &mut NavAgent,
            &mut PatrolRoute,
            &mut SoldierAnimation,
            &mut WeaponController,
            Option<&FireAnimationGate>,
        ),
        (Without<Dead>, Without<SetupFailed>),
    >,
    paths: Query<&PatrolPath>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (
        entity,
        state,
        soldier,
        ai_config,
        detection,
        mut transform,
        mut nav,
        mut route,
        mut animation,
        mut weapon,
        gate,
    ) in soldiers.iter_mut()
    {
        match state {
            AIState::Patrol => {
                animation.posture = Posture::Walk;

                let path = route.path.and_then(|p| paths.get(p).ok());
                let position = transform.translation;
                route.update_destination(path, position, soldier.config.path_reaching_radius, false);
                nav.set_destination(route.destination(path, position));
            }
            AIState::Follow => {
                if let Some(last_known) = detection.last_known_position() {
                    nav.set_destination(last_known);
                }
            }
            AIState::Attack => {
                let Some(target_point) = detection.last_known_position() else {
                    continue;
                };

                let source = detection.source_point(&transform);
                let stop_distance = ai_config.stop_distance(detection.config.attack_range);
                if source.distance(target_point) >= stop_distance {
                    nav.set_destination(target_point);
                } else {
                    nav.set_destination(transform.translation);
                }

                orient_towards(&mut transform, target_point, soldier.config.orientation_speed, delta);
                try_attack(
                    &mut commands,
                    &mut fired,
                    entity,
                    &transform,
                    &mut weapon,
                    gate,
                    target_point,
                );
            }
        }
    }
}
