//! AI decision-making module
//!
//! FSM солдата: Patrol → Follow → Attack.
//! - Patrol ↔ {Follow, Attack}: только detected/lost notifications (observers)
//! - Follow ↔ Attack: polling видимости и attack range каждый тик

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{polled_transition, transition_on_detected, transition_on_lost, AIConfig, AIState};
pub use systems::{
    ai_fsm_transitions, ai_state_actions, on_soldier_attacked, on_soldier_damaged, on_target_detected,
    on_target_lost,
};

use crate::SoldierSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate (Decision set).
/// Порядок выполнения:
/// 1. ai_fsm_transitions: polling переходы Follow ↔ Attack
/// 2. ai_state_actions: действие текущего состояния (nav, поворот, выстрел)
///
/// Observers: TargetDetected, TargetLost, SoldierAttacked, SoldierDamaged.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (ai_fsm_transitions, ai_state_actions)
                .chain() // Переход до action: в том же тике
                .in_set(SoldierSet::Decision),
        );

        app.add_observer(on_target_detected)
            .add_observer(on_target_lost)
            .add_observer(on_soldier_attacked)
            .add_observer(on_soldier_damaged);
    }
}
