//! Базовые компоненты акторов: Actor, Health, Player, AimPoint

use bevy::prelude::*;

/// Актор (солдат, игрок): всё, что может видеть или быть увиденным
///
/// Detection считает враждебными акторов с другим `faction_id`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Health, Transform)]
pub struct Actor {
    /// Stable ID фракции
    pub faction_id: u64,
}

/// Здоровье актора (damage sink)
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Возвращает сколько урона реально прошло
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }
}

/// Marker: актор которым управляет игрок
///
/// Урон от `Player`: единственный урон, на который солдат реагирует
/// принудительным захватом цели.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Точка прицеливания относительно `Transform` актора (грудь/голова)
///
/// Line-of-sight луч идёт к этой точке. Без компонента: в `translation`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AimPoint {
    pub offset: Vec3,
}

impl AimPoint {
    pub fn world_point(offset: Option<&AimPoint>, transform: &Transform) -> Vec3 {
        transform.translation + offset.map(|a| a.offset).unwrap_or(Vec3::ZERO)
    }
}
