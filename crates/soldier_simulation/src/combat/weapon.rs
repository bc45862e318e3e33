//! Weapon adapter: ориентация оружия и попытка выстрела
//!
//! Architecture:
//! - ECS: WeaponController (cooldown, aim direction): решает "можно ли стрелять"
//! - Анимация: FireAnimationGate: "fire animation сейчас играет?" (пишет хост)
//! - Events: WeaponFired (ECS → мир: spawn projectile, VFX, звук)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры оружия
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct WeaponConfig {
    /// Минимальный интервал между выстрелами (секунды)
    pub delay_between_shots: f32,
    /// Урон пули
    pub damage: u32,
    /// Скорость пули (м/с)
    pub projectile_speed: f32,
    /// Высота weapon root над `translation`
    pub muzzle_height: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            delay_between_shots: 0.5,
            damage: 10,
            projectile_speed: 60.0,
            muzzle_height: 1.4,
        }
    }
}

/// Входы стрельбы (down / held / up)
///
/// Солдат стреляет только `held`: одиночный выстрел на тик,
/// без burst/auto/aim режимов.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShootInputs {
    pub down: bool,
    pub held: bool,
    pub up: bool,
}

impl ShootInputs {
    pub const HELD: Self = Self {
        down: false,
        held: true,
        up: false,
    };
}

/// Оружие солдата
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponController {
    pub config: WeaponConfig,
    /// Куда смотрит ствол (normalized)
    aim_direction: Vec3,
    cooldown_timer: f32,
}

impl Default for WeaponController {
    fn default() -> Self {
        Self::new(WeaponConfig::default())
    }
}

impl WeaponController {
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            config,
            aim_direction: Vec3::NEG_Z,
            cooldown_timer: 0.0,
        }
    }

    /// Weapon root в world coordinates
    pub fn root(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.config.muzzle_height
    }

    pub fn aim_direction(&self) -> Vec3 {
        self.aim_direction
    }

    /// Направить ствол из `root` на `point`; нулевой вектор игнорируется
    pub fn orient_towards(&mut self, root: Vec3, point: Vec3) {
        if let Some(direction) = (point - root).try_normalize() {
            self.aim_direction = direction;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Обработка входов; true если выстрел произошёл
    pub fn handle_shoot_inputs(&mut self, inputs: ShootInputs) -> bool {
        if !(inputs.held || inputs.down) || !self.can_shoot() {
            return false;
        }
        self.cooldown_timer = self.config.delay_between_shots;
        true
    }

    pub fn tick_cooldown(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Animation collaborator: играет ли сейчас fire animation
///
/// Хост обновляет флаг каждый кадр; без компонента солдат не стреляет.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct FireAnimationGate {
    pub fire_playing: bool,
}

impl FireAnimationGate {
    pub fn is_fire_playing(gate: Option<&FireAnimationGate>) -> bool {
        gate.is_some_and(|g| g.fire_playing)
    }
}

/// Event: выстрел (fire command для мира)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub damage: u32,
    pub speed: f32,
}

/// System: обновление weapon cooldowns
pub fn update_weapon_cooldowns(mut weapons: Query<&mut WeaponController>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut weapon in weapons.iter_mut() {
        weapon.tick_cooldown(delta);
    }
}
