//! FSM AI components (state, config) + чистые правила переходов.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::detection::DetectionState;

/// AI FSM состояния
///
/// Смерть вне FSM: мёртвый солдат получает `Dead` и выпадает из AI queries.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Обход patrol path (начальное)
    #[default]
    Patrol,
    /// Идём к последней известной позиции цели
    Follow,
    /// Цель видна и в attack range: стреляем
    Attack,
}

/// Параметры AI
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Доля attack range, внутри которой солдат перестаёт сближаться
    ///
    /// 0 = всегда в упор, 1 = после контакта не сближается вообще.
    pub attack_stop_distance_ratio: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            attack_stop_distance_ratio: 0.5,
        }
    }
}

impl AIConfig {
    /// Дистанция, ближе которой солдат держит позицию в Attack
    pub fn stop_distance(&self, attack_range: f32) -> f32 {
        self.attack_stop_distance_ratio * attack_range
    }
}

/// Polling переход (каждый тик, до action)
///
/// Только между Follow и Attack. Patrol ↔ {Follow, Attack}: исключительно
/// через detected/lost notifications.
pub fn polled_transition(state: AIState, detection: &DetectionState) -> Option<AIState> {
    let engaged = detection.is_seeing_target && detection.is_target_in_attack_range;

    match state {
        AIState::Follow if engaged => Some(AIState::Attack),
        AIState::Attack if !engaged => Some(AIState::Follow),
        _ => None,
    }
}

/// Notification: target detected
pub fn transition_on_detected(state: AIState) -> Option<AIState> {
    match state {
        AIState::Patrol => Some(AIState::Follow),
        _ => None,
    }
}

/// Notification: target lost
pub fn transition_on_lost(state: AIState) -> Option<AIState> {
    match state {
        AIState::Follow | AIState::Attack => Some(AIState::Patrol),
        AIState::Patrol => None,
    }
}
