//! FSM polling transitions (Follow ↔ Attack).

use bevy::prelude::*;

use crate::ai::{polled_transition, AIState};
use crate::combat::Dead;
use crate::detection::DetectionModule;
use crate::navigation::NavAgent;
use crate::soldier::{Posture, SetupFailed, SoldierAnimation};

/// System: FSM transitions по snapshot восприятия
///
/// Выполняется до `ai_state_actions`: переход действует в том же тике.
/// - Follow → Attack: поза Attack, остановка на текущей позиции
/// - Attack → Follow: поза Pursue, destination = last known position
pub fn ai_fsm_transitions(
    mut soldiers: Query<
        (Entity, &mut AIState, &DetectionModule, &Transform, &mut NavAgent, &mut SoldierAnimation),
        (Without<Dead>, Without<SetupFailed>),
    >,
) {
    for (entity, mut state, detection, transform, mut nav, mut animation) in soldiers.iter_mut() {
        let Some(next) = polled_transition(*state, &detection.snapshot()) else {
            continue;
        };

        match next {
            AIState::Attack => {
                animation.posture = Posture::Attack;
                nav.set_destination(transform.translation);
            }
            AIState::Follow => {
                animation.posture = Posture::Pursue;
                if let Some(last_known) = detection.last_known_position() {
                    nav.set_destination(last_known);
                }
            }
            AIState::Patrol => {}
        }

        crate::logger::log(&format!("🔄 {:?}: {:?} → {:?}", entity, *state, next));
        *state = next;
    }
}
