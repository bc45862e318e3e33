//! Combat module: оружие, урон, смерть
//!
//! ECS ответственность:
//! - WeaponController: cooldown, aim direction, fire decision
//! - Health: damage sink, Damaged/Died triggers
//! - DespawnAfter: уборка трупов
//!
//! Хост ответственность:
//! - FireAnimationGate (animation state)
//! - WeaponFired → projectile/VFX/audio
//! - ProjectileHit → обратно в ECS

use bevy::prelude::*;

pub mod damage;
pub mod weapon;


pub use damage::{apply_projectile_hits, despawn_after_timeout, Damaged, Dead, DespawnAfter, Died, ProjectileHit};
pub use weapon::{update_weapon_cooldowns, FireAnimationGate, ShootInputs, WeaponConfig, WeaponController, WeaponFired};

use crate::SoldierSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. update_weapon_cooldowns (Prepare)
/// 2. apply_projectile_hits (Combat)
/// 3. despawn_after_timeout (Cleanup, в конце тика)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileHit>()
            .add_event::<WeaponFired>();

        app.add_systems(FixedUpdate, update_weapon_cooldowns.in_set(SoldierSet::Prepare))
            .add_systems(FixedUpdate, apply_projectile_hits.in_set(SoldierSet::Combat))
            .add_systems(FixedUpdate, despawn_after_timeout.in_set(SoldierSet::Cleanup));
    }
}
