//! Общие ECS компоненты акторов
//!
//! Доменные компоненты живут рядом со своими системами:
//! - detection: DetectionModule, Obstacle, OwnedBy
//! - navigation: NavAgent
//! - combat: WeaponController, FireAnimationGate, Dead
//! - patrol: PatrolPath, PatrolRoute
//! - soldier: Soldier, SoldierStatus, SoldierAnimation

pub mod actor;

pub use actor::*;
