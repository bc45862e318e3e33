//! Soldier: враждебный NPC, собранный из collaborators
//!
//! Entity солдата несёт:
//! - Actor + Health (damage sink)
//! - DetectionModule, NavAgent, WeaponController (обязательные collaborators)
//! - FireAnimationGate (опционально, без него солдат не стреляет)
//! - PatrolRoute, SoldierStatus, SoldierAnimation (свои данные)
//! - AIConfig (из `SoldierTuning.ai`)
//!
//! Lifecycle: spawn → `initialize_soldiers` (Prepare) → AIState::Patrol →
//! ... → Died → Dead + DespawnAfter → despawn.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod controller;
pub mod events;
pub mod reactions;
pub mod setup;

pub use controller::{orient_towards, try_attack};
pub use events::{DamageCue, SoldierAttacked, SoldierDamaged, SoldierDied, TargetDetected, TargetLost};
pub use reactions::{begin_soldier_tick, on_health_damaged, on_health_died, sync_soldier_animation};
pub use setup::{initialize_soldiers, validate_dependencies, SetupError, SetupFailed, SoldierSetupFailed};

use crate::ai::AIConfig;
use crate::combat::{FireAnimationGate, WeaponController};
use crate::components::{Actor, Health};
use crate::config::SoldierTuning;
use crate::detection::{update_detection, DetectionModule};
use crate::navigation::{drive_nav_agents, NavAgent};
use crate::patrol::PatrolRoute;
use crate::roster::{Roster, SoldierRemoved};
use crate::SoldierSet;

/// Параметры солдата
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SoldierConfig {
    /// Радиус "дошёл до waypoint" (метры)
    pub path_reaching_radius: f32,
    /// Скорость поворота (доля slerp в секунду)
    pub orientation_speed: f32,
    /// Сколько труп лежит до despawn (секунды, ≤0 = сразу)
    pub death_duration: f32,
    pub max_health: u32,
}

impl Default for SoldierConfig {
    fn default() -> Self {
        Self {
            path_reaching_radius: 2.0,
            orientation_speed: 10.0,
            death_duration: 0.0,
            max_health: 100,
        }
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(SoldierStatus, SoldierAnimation, PatrolRoute)]
pub struct Soldier {
    pub config: SoldierConfig,
}

/// Runtime статус солдата
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SoldierStatus {
    /// Время последнего урона от игрока (fixed clock)
    pub last_time_damaged: f32,
    /// DamageCue уже отправлен в этом тике
    pub was_damaged_this_tick: bool,
}

impl Default for SoldierStatus {
    fn default() -> Self {
        Self {
            last_time_damaged: f32::NEG_INFINITY,
            was_damaged_this_tick: false,
        }
    }
}

/// Поза для animation слоя
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum Posture {
    #[default]
    Idle,
    Walk,
    Pursue,
    Attack,
    Dead,
}

/// Animation-facing состояние (хост читает, ECS пишет)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SoldierAnimation {
    pub posture: Posture,
    /// Скорость движения для blend (из NavAgent velocity)
    pub move_speed: f32,
    /// One-shot: солдата ранили в этом тике
    pub flinch: bool,
}

/// Полный набор компонентов солдата
#[derive(Bundle)]
pub struct SoldierBundle {
    pub soldier: Soldier,
    pub actor: Actor,
    pub health: Health,
    pub transform: Transform,
    pub route: PatrolRoute,
    pub detection: DetectionModule,
    pub nav: NavAgent,
    pub weapon: WeaponController,
    pub fire_gate: FireAnimationGate,
    pub ai: AIConfig,
}

impl SoldierBundle {
    pub fn new(tuning: &SoldierTuning, faction_id: u64, position: Vec3, route: PatrolRoute) -> Self {
        Self {
            soldier: Soldier { config: tuning.soldier },
            actor: Actor { faction_id },
            health: Health::new(tuning.soldier.max_health),
            transform: Transform::from_translation(position),
            route,
            detection: DetectionModule::new(tuning.detection),
            nav: NavAgent::new(tuning.nav),
            weapon: WeaponController::new(tuning.weapon),
            fire_gate: FireAnimationGate { fire_playing: true },
            ai: tuning.ai,
        }
    }
}

/// Soldier Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. begin_soldier_tick → initialize_soldiers (Prepare)
/// 2. update_detection (Perception)
/// 3. drive_nav_agents → sync_soldier_animation (Locomotion)
///
/// Observers: Damaged → on_health_damaged, Died → on_health_died.
pub struct SoldierPlugin;

impl Plugin for SoldierPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Roster>()
            .add_event::<DamageCue>()
            .add_event::<SoldierSetupFailed>()
            .add_event::<SoldierRemoved>();

        app.add_systems(
            FixedUpdate,
            (begin_soldier_tick, initialize_soldiers)
                .chain()
                .in_set(SoldierSet::Prepare),
        )
        .add_systems(FixedUpdate, update_detection.in_set(SoldierSet::Perception))
        .add_systems(
            FixedUpdate,
            (drive_nav_agents, sync_soldier_animation)
                .chain()
                .in_set(SoldierSet::Locomotion),
        );

        app.add_observer(on_health_damaged)
            .add_observer(on_health_died);
    }
}
