//! Soldier initialization: проверка зависимостей и регистрация
//!
//! Солдат без DetectionModule / NavAgent / WeaponController не запускается:
//! ошибка логируется громко, публикуется `SoldierSetupFailed`, entity получает
//! `SetupFailed` и никогда не получает `AIState`. Остальной roster не страдает.

use bevy::prelude::*;
use thiserror::Error;

use crate::ai::{AIConfig, AIState};
use crate::combat::{FireAnimationGate, WeaponController};
use crate::detection::DetectionModule;
use crate::navigation::NavAgent;
use crate::patrol::{PatrolPath, PatrolRoute};
use crate::roster::Roster;
use crate::soldier::Soldier;

/// Обязательный collaborator отсутствует
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("soldier has no DetectionModule")]
    MissingDetectionModule,
    #[error("soldier has no NavAgent")]
    MissingNavAgent,
    #[error("soldier has no WeaponController")]
    MissingWeapon,
}

/// Маркер: инициализация провалилась
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupFailed(pub SetupError);

/// Event: диагностика для хоста/редактора
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoldierSetupFailed {
    pub soldier: Entity,
    pub error: SetupError,
}

/// Проверка зависимостей (первая отсутствующая: ошибка)
pub fn validate_dependencies(
    has_detection: bool,
    has_navigation: bool,
    has_weapon: bool,
) -> Result<(), SetupError> {
    if !has_detection {
        return Err(SetupError::MissingDetectionModule);
    }
    if !has_navigation {
        return Err(SetupError::MissingNavAgent);
    }
    if !has_weapon {
        return Err(SetupError::MissingWeapon);
    }
    Ok(())
}

/// System: инициализация только что заспавненных солдат
///
/// - валидация collaborators
/// - регистрация в Roster
/// - ближайшая нода патруля
/// - старт FSM в Patrol
pub fn initialize_soldiers(
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    mut new_soldiers: Query<
        (
            Entity,
            &Transform,
            &mut PatrolRoute,
            Has<DetectionModule>,
            Has<NavAgent>,
            Has<WeaponController>,
            Has<FireAnimationGate>,
        ),
        Added<Soldier>,
    >,
    paths: Query<&PatrolPath>,
    mut failures: EventWriter<SoldierSetupFailed>,
) {
    for (entity, transform, mut route, has_detection, has_nav, has_weapon, has_gate) in new_soldiers.iter_mut() {
        if let Err(error) = validate_dependencies(has_detection, has_nav, has_weapon) {
            crate::logger::log_error(&format!("❌ Soldier {:?} failed to initialize: {}", entity, error));
            failures.write(SoldierSetupFailed { soldier: entity, error });
            commands.entity(entity).insert(SetupFailed(error));
            continue;
        }

        if !has_gate {
            crate::logger::log_warning(&format!(
                "Soldier {:?} has no FireAnimationGate: it will aim but never fire",
                entity
            ));
        }

        let path = route.path.and_then(|p| paths.get(p).ok());
        if path.is_none_or(|p| p.is_empty()) {
            crate::logger::log_warning(&format!(
                "Soldier {:?} has no valid patrol path: holding position",
                entity
            ));
        }
        route.set_destination_to_closest_node(path, transform.translation);

        roster.register(entity);
        // AIConfig приходит из SoldierBundle; default только для ручной сборки
        commands
            .entity(entity)
            .insert(AIState::Patrol)
            .insert_if_new(AIConfig::default());

        crate::logger::log_info(&format!(
            "🪖 Soldier {:?} ready (waypoint {}, roster {}/{})",
            entity,
            route.destination_index(),
            roster.remaining(),
            roster.total_spawned()
        ));
    }
}
