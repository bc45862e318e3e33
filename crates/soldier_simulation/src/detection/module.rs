//! DetectionModule: perception oracle солдата
//!
//! Раз в тик получает результат поиска ("кого видно ближе всех") и
//! обновляет snapshot: видим ли цель, в attack range ли она, кто known target.
//! Edge-triggered: `DetectionEdge::Detected` на переходе "нет цели → есть",
//! `DetectionEdge::Lost` на обратном.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры восприятия
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct DetectionConfig {
    /// Дальность обнаружения (метры)
    pub detection_range: f32,
    /// Дальность атаки (метры)
    pub attack_range: f32,
    /// Сколько секунд помним цель без прямой видимости
    pub known_target_timeout: f32,
    /// Высота detection source point (глаза) над `translation`
    pub eye_height: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            detection_range: 20.0,
            attack_range: 10.0,
            known_target_timeout: 4.0,
            eye_height: 1.6,
        }
    }
}

/// Read-only snapshot восприятия за текущий тик
///
/// Инвариант: `is_target_in_attack_range ⇒ known_target.is_some()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionState {
    pub is_seeing_target: bool,
    pub is_target_in_attack_range: bool,
    pub known_target: Option<Entity>,
    pub had_known_target: bool,
}

/// Результат поиска цели: ближайший видимый враг
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub target: Entity,
    /// Позиция цели (её `translation`)
    pub position: Vec3,
}

/// Переход known target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionEdge {
    Detected,
    Lost,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DetectionModule {
    pub config: DetectionConfig,
    known_target: Option<Entity>,
    /// Последняя известная позиция known target (может быть stale)
    last_known_position: Vec3,
    is_seeing_target: bool,
    is_target_in_attack_range: bool,
    had_known_target: bool,
    time_last_seen: f32,
}

impl Default for DetectionModule {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl DetectionModule {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            known_target: None,
            last_known_position: Vec3::ZERO,
            is_seeing_target: false,
            is_target_in_attack_range: false,
            had_known_target: false,
            time_last_seen: f32::NEG_INFINITY,
        }
    }

    pub fn snapshot(&self) -> DetectionState {
        DetectionState {
            is_seeing_target: self.is_seeing_target,
            is_target_in_attack_range: self.is_target_in_attack_range,
            known_target: self.known_target,
            had_known_target: self.had_known_target,
        }
    }

    pub fn known_target(&self) -> Option<Entity> {
        self.known_target
    }

    pub fn is_seeing_target(&self) -> bool {
        self.is_seeing_target
    }

    pub fn is_target_in_attack_range(&self) -> bool {
        self.is_target_in_attack_range
    }

    pub fn had_known_target(&self) -> bool {
        self.had_known_target
    }

    /// Позиция known target, None если цели нет
    pub fn last_known_position(&self) -> Option<Vec3> {
        self.known_target.map(|_| self.last_known_position)
    }

    /// Detection source point в world coordinates
    pub fn source_point(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.config.eye_height
    }

    /// "Меня подстрелили отсюда": захват цели без прямой видимости
    pub fn force_acquire(&mut self, target: Entity, position: Vec3, now: f32) {
        self.known_target = Some(target);
        self.last_known_position = position;
        self.time_last_seen = now;
    }

    /// Явный внешний сброс; `Lost` прилетит на следующем `update`
    pub fn forget_target(&mut self) {
        self.known_target = None;
    }

    /// Один тик восприятия
    ///
    /// - `sighting`: ближайший видимый враг в detection range (уже после LOS)
    /// - `known_target_alive`: known target всё ещё существует и жив
    pub fn update(
        &mut self,
        now: f32,
        source: Vec3,
        sighting: Option<Sighting>,
        known_target_alive: bool,
    ) -> Option<DetectionEdge> {
        if self.known_target.is_some() && !known_target_alive {
            self.known_target = None;
        }

        // Таймаут считается только пока цель не видна (флаг с прошлого тика)
        if self.known_target.is_some()
            && !self.is_seeing_target
            && now - self.time_last_seen > self.config.known_target_timeout
        {
            self.known_target = None;
        }

        self.is_seeing_target = sighting.is_some();
        if let Some(sighting) = sighting {
            self.known_target = Some(sighting.target);
            self.last_known_position = sighting.position;
            self.time_last_seen = now;
        }

        self.is_target_in_attack_range = self.known_target.is_some()
            && source.distance(self.last_known_position) <= self.config.attack_range;

        let has_known_target = self.known_target.is_some();
        let edge = match (self.had_known_target, has_known_target) {
            (false, true) => Some(DetectionEdge::Detected),
            (true, false) => Some(DetectionEdge::Lost),
            _ => None,
        };
        self.had_known_target = has_known_target;

        edge
    }
}
