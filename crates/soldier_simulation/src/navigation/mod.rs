//! Navigation adapter: обёртка над pathfinding/movement сервисом
//!
//! Архитектура:
//! - AI пишет destination через `NavAgent::set_destination` (high-level intent)
//! - Movement сервис (здесь: `drive_nav_agents`, kinematic stand-in) двигает
//!   Transform и отчитывается velocity
//! - Animation читает `velocity_magnitude()` для blend скорости
//!
//! Реальный navmesh вне этого crate: хост может заменить `drive_nav_agents`
//! своей системой, контракт `NavAgent` тот же.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Дистанция на которой агент считает что пришёл (метры)
const ARRIVAL_EPSILON: f32 = 0.05;

/// Параметры движения агента
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct NavConfig {
    /// Скорость движения (м/с)
    pub speed: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}

/// Navigation agent солдата
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub config: NavConfig,
    /// false = агента нет (умер / отключён), все команды no-op
    enabled: bool,
    destination: Option<Vec3>,
    velocity: Vec3,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl NavAgent {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            enabled: true,
            destination: None,
            velocity: Vec3::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Новый destination; без активного агента молча игнорируется
    pub fn set_destination(&mut self, point: Vec3) {
        if self.enabled {
            self.destination = Some(point);
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Остановка навсегда (смерть): destination сброшен, агент выключен
    pub fn stop(&mut self) {
        self.enabled = false;
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn velocity_magnitude(&self) -> f32 {
        self.velocity.length()
    }
}

/// Чистая геометрия: Euclidean distance ≤ radius
pub fn reached_destination(current: Vec3, destination: Vec3, radius: f32) -> bool {
    current.distance(destination) <= radius
}

/// Один шаг kinematic движения к destination по горизонтали
///
/// Возвращает (новая позиция, velocity).
pub fn step_towards(position: Vec3, destination: Vec3, speed: f32, delta: f32) -> (Vec3, Vec3) {
    let mut offset = destination - position;
    offset.y = 0.0;
    let distance = offset.length();

    if distance <= ARRIVAL_EPSILON || delta <= 0.0 {
        return (position, Vec3::ZERO);
    }

    let travel = (speed * delta).min(distance);
    let direction = offset / distance;
    (position + direction * travel, direction * (travel / delta))
}

/// System: movement сервис: двигает агентов к их destination
pub fn drive_nav_agents(
    mut agents: Query<(&mut Transform, &mut NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        let Some(destination) = agent.destination.filter(|_| agent.enabled) else {
            agent.velocity = Vec3::ZERO;
            continue;
        };

        let (position, velocity) =
            step_towards(transform.translation, destination, agent.config.speed, delta);
        transform.translation = position;
        agent.velocity = velocity;
    }
}
