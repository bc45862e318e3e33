//! SoldierTuning: все параметры солдата в одном RON файле
//!
//! ```ron
//! (
//!     soldier: (path_reaching_radius: 2.0, death_duration: 3.0),
//!     detection: (detection_range: 25.0),
//!     weapon: (delay_between_shots: 0.25),
//! )
//! ```
//!
//! Отсутствующие поля берут default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AIConfig;
use crate::combat::WeaponConfig;
use crate::detection::DetectionConfig;
use crate::navigation::NavConfig;
use crate::soldier::SoldierConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoldierTuning {
    pub soldier: SoldierConfig,
    pub detection: DetectionConfig,
    pub ai: AIConfig,
    pub weapon: WeaponConfig,
    pub nav: NavConfig,
}

impl SoldierTuning {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: Self = ron::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Диапазоны, без которых AI ведёт себя бессмысленно
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("soldier.path_reaching_radius", self.soldier.path_reaching_radius),
            ("soldier.orientation_speed", self.soldier.orientation_speed),
            ("detection.detection_range", self.detection.detection_range),
            ("detection.attack_range", self.detection.attack_range),
            ("detection.known_target_timeout", self.detection.known_target_timeout),
            ("nav.speed", self.nav.speed),
            ("weapon.projectile_speed", self.weapon.projectile_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if self.detection.attack_range > self.detection.detection_range {
            return Err(ConfigError::OutOfRange {
                field: "detection.attack_range",
                value: self.detection.attack_range,
            });
        }

        let ratio = self.ai.attack_stop_distance_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::OutOfRange {
                field: "ai.attack_stop_distance_ratio",
                value: ratio,
            });
        }

        if self.weapon.delay_between_shots < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "weapon.delay_between_shots",
                value: self.weapon.delay_between_shots,
            });
        }

        if self.soldier.max_health == 0 {
            return Err(ConfigError::OutOfRange {
                field: "soldier.max_health",
                value: 0.0,
            });
        }

        Ok(())
    }
}
