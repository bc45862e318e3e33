//! Patrol paths: замкнутые маршруты из waypoints
//!
//! `PatrolPath` живёт на отдельной entity и шарится между солдатами
//! (read-only). Солдат держит `PatrolRoute`: non-owning ссылку на путь
//! плюс свой текущий индекс waypoint.
//!
//! Путь без нод или отсутствующий путь = "стоим на месте".

use bevy::prelude::*;

/// Упорядоченный цикл waypoints (world coordinates)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolPath {
    pub nodes: Vec<Vec3>,
}

impl PatrolPath {
    pub fn new(nodes: impl Into<Vec<Vec3>>) -> Self {
        Self { nodes: nodes.into() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position_of_node(&self, index: usize) -> Option<Vec3> {
        self.nodes.get(index).copied()
    }

    /// Индекс ближайшей ноды; при равенстве побеждает меньший индекс
    pub fn nearest_node(&self, origin: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let distance = origin.distance(*node);
            // strict `<`: первая найденная нода выигрывает tie
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Маршрут солдата: какой путь и к какой ноде идём
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    /// Entity с `PatrolPath` (None = патрулировать нечего)
    pub path: Option<Entity>,
    destination_index: usize,
}

impl PatrolRoute {
    pub fn new(path: Entity) -> Self {
        Self {
            path: Some(path),
            destination_index: 0,
        }
    }

    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn destination_index(&self) -> usize {
        self.destination_index
    }

    pub fn reset_destination(&mut self) {
        self.destination_index = 0;
    }

    /// Выбирает ближайшую к `position` ноду (вызывается при спавне)
    pub fn set_destination_to_closest_node(&mut self, path: Option<&PatrolPath>, position: Vec3) {
        self.destination_index = valid(path)
            .and_then(|p| p.nearest_node(position))
            .unwrap_or(0);
    }

    /// Если дошли до текущей ноды (в пределах `reaching_radius`): следующая нода
    ///
    /// `inverse_order` идёт по циклу назад. Индекс всегда в `[0, len)`.
    pub fn update_destination(
        &mut self,
        path: Option<&PatrolPath>,
        position: Vec3,
        reaching_radius: f32,
        inverse_order: bool,
    ) {
        let Some(path) = valid(path) else {
            return;
        };

        let destination = self.destination(Some(path), position);
        if !crate::navigation::reached_destination(position, destination, reaching_radius) {
            return;
        }

        let len = path.len();
        // Индекс мог устареть если путь укоротили: сначала нормализуем
        let current = self.destination_index % len;
        self.destination_index = if inverse_order {
            (current + len - 1) % len
        } else {
            (current + 1) % len
        };
    }

    /// Позиция текущей ноды, или `position` если пути нет
    pub fn destination(&self, path: Option<&PatrolPath>, position: Vec3) -> Vec3 {
        valid(path)
            .and_then(|p| p.position_of_node(self.destination_index % p.len()))
            .unwrap_or(position)
    }
}

fn valid(path: Option<&PatrolPath>) -> Option<&PatrolPath> {
    path.filter(|p| !p.is_empty())
}
