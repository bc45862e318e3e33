//! Soldier event surface
//!
//! Entity-targeted triggers (observers, синхронно при flush команд):
//! - TargetDetected / TargetLost: edge от DetectionModule
//! - SoldierDamaged / SoldierDied: republish от Health (только урон от игрока)
//! - SoldierAttacked: попытка атаки (даже если выстрела не было)
//!
//! AI зависит только от этих событий, не от подсистем напрямую.
//!
//! Buffered events (внешние слушатели, fire-and-forget):
//! - DamageCue: audio hook "damage tick", не чаще раза за тик

use bevy::prelude::*;

/// Trigger: появился known target (переход нет → есть)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetDetected {
    pub target: Entity,
}

/// Trigger: known target потерян (переход есть → нет)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLost;

/// Trigger: солдата ранил игрок
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SoldierDamaged {
    pub amount: u32,
    pub source: Entity,
}

/// Trigger: солдат умер (уже снят с roster)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoldierDied;

/// Trigger: солдат попытался атаковать
///
/// Шлётся всегда, даже если fire animation не играла и выстрела не было.
/// `shot_fired` отличает реальный выстрел.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SoldierAttacked {
    pub target_point: Vec3,
    pub shot_fired: bool,
}

/// Event: проиграть damage tick звук
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageCue {
    pub soldier: Entity,
    pub position: Vec3,
}
