//! Soldier primitives, которые дёргает AI
//!
//! Чистые функции над компонентами солдата: поворот, атака.
//! Патрульные примитивы: методы `PatrolRoute`, навигация: `NavAgent`.

use bevy::prelude::*;

use crate::combat::{FireAnimationGate, ShootInputs, WeaponController, WeaponFired};
use crate::soldier::SoldierAttacked;

/// Поворот heading к `point` по горизонтали
///
/// Slerp к целевому повороту с долей `orientation_speed * delta` (clamp 1.0).
/// Вырожденное направление (точка над/под нами): пропускаем, возвращаем false.
pub fn orient_towards(transform: &mut Transform, point: Vec3, orientation_speed: f32, delta: f32) -> bool {
    let mut look = point - transform.translation;
    look.y = 0.0;

    let Ok(direction) = Dir3::new(look) else {
        return false;
    };

    let target_rotation = Transform::IDENTITY.looking_to(direction, Dir3::Y).rotation;
    let t = (orientation_speed * delta).clamp(0.0, 1.0);
    transform.rotation = transform.rotation.slerp(target_rotation, t);
    true
}

/// Попытка атаки по `target_point`
///
/// 1. Ствол на цель (всегда)
/// 2. Выстрел только если играет fire animation и оружие готово
/// 3. `SoldierAttacked`: всегда, независимо от выстрела
///
/// Возвращает true если выстрел реально был.
pub fn try_attack(
    commands: &mut Commands,
    fired: &mut EventWriter<WeaponFired>,
    soldier: Entity,
    transform: &Transform,
    weapon: &mut WeaponController,
    gate: Option<&FireAnimationGate>,
    target_point: Vec3,
) -> bool {
    let root = weapon.root(transform);
    weapon.orient_towards(root, target_point);

    let mut did_fire = false;
    if FireAnimationGate::is_fire_playing(gate) {
        did_fire = weapon.handle_shoot_inputs(ShootInputs::HELD);
    }

    if did_fire {
        fired.write(WeaponFired {
            shooter: soldier,
            origin: root,
            direction: weapon.aim_direction(),
            damage: weapon.config.damage,
            speed: weapon.config.projectile_speed,
        });
    }

    commands.trigger_targets(
        SoldierAttacked {
            target_point,
            shot_fired: did_fire,
        },
        soldier,
    );

    did_fire
}
