//! Line-of-sight: луч от глаз до цели против набора препятствий
//!
//! Raycast через `bevy::math::bounding` (RayCast3d против Aabb3d /
//! BoundingSphere), без physics engine.
//! Exclusion set = владельцы геометрии, которая не должна перекрывать луч
//! (собственные коллайдеры наблюдателя и цели).

use bevy::math::bounding::{Aabb3d, BoundingSphere, IntersectsVolume, RayCast3d};
use bevy::prelude::*;

/// Форма препятствия (в локальных координатах, без вращения)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ObstacleShape {
    Sphere { radius: f32 },
    /// Axis-aligned box вокруг `Transform.translation`
    Box { half_extents: Vec3 },
}

/// Геометрия, перекрывающая обзор
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Obstacle {
    pub shape: ObstacleShape,
}

impl Obstacle {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ObstacleShape::Sphere { radius },
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ObstacleShape::Box { half_extents },
        }
    }
}

/// Коллайдер принадлежит актору (его "собственная геометрия")
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct OwnedBy(pub Entity);

/// Снимок препятствий на один тик
#[derive(Debug, Default)]
pub struct ObstacleSet {
    obstacles: Vec<(Vec3, ObstacleShape, Option<Entity>)>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, center: Vec3, shape: ObstacleShape, owner: Option<Entity>) {
        self.obstacles.push((center, shape, owner));
    }

    /// true если луч `from → to` не пересекает ни одно препятствие,
    /// кроме принадлежащих `exclude`
    ///
    /// Луч нулевой длины ничего не пересекает.
    pub fn segment_clear(&self, from: Vec3, to: Vec3, exclude: &[Entity]) -> bool {
        let Some(ray) = segment_ray(from, to) else {
            return true;
        };

        self.obstacles.iter().all(|(center, shape, owner)| {
            if owner.is_some_and(|o| exclude.contains(&o)) {
                return true;
            }
            !ray_hits(&ray, *center, shape)
        })
    }
}

/// RayCast3d от `from` к `to`, `max` = длина отрезка
fn segment_ray(from: Vec3, to: Vec3) -> Option<RayCast3d> {
    let (direction, length) = Dir3::new_and_length(to - from).ok()?;
    Some(RayCast3d::new(from, direction, length))
}

fn ray_hits(ray: &RayCast3d, center: Vec3, shape: &ObstacleShape) -> bool {
    match *shape {
        ObstacleShape::Sphere { radius } => ray.intersects(&BoundingSphere::new(center, radius)),
        ObstacleShape::Box { half_extents } => ray.intersects(&Aabb3d::new(center, half_extents)),
    }
}
