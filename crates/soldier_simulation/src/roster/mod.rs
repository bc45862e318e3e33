//! Roster: реестр живых солдат
//!
//! Инварианты:
//! - `remaining() == soldiers.len()`
//! - `total_spawned` только растёт
//!
//! Resource мутируется только при spawn (setup) и смерти. Внешние системы,
//! которые хотят итерировать "оставшихся", берут `snapshot()`: копию,
//! безопасную к удалению во время обхода.

use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone)]
pub struct Roster {
    soldiers: Vec<Entity>,
    total_spawned: u32,
}

/// Event: солдат снят с roster
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoldierRemoved {
    pub soldier: Entity,
    /// Сколько осталось после удаления
    pub remaining: usize,
}

impl Roster {
    /// Повторная регистрация той же entity игнорируется
    pub fn register(&mut self, soldier: Entity) -> bool {
        if self.soldiers.contains(&soldier) {
            return false;
        }
        self.soldiers.push(soldier);
        self.total_spawned += 1;
        true
    }

    /// Возвращает remaining после удаления; None если солдата не было
    pub fn unregister(&mut self, soldier: Entity) -> Option<usize> {
        let index = self.soldiers.iter().position(|&s| s == soldier)?;
        self.soldiers.remove(index);
        Some(self.soldiers.len())
    }

    pub fn contains(&self, soldier: Entity) -> bool {
        self.soldiers.contains(&soldier)
    }

    pub fn remaining(&self) -> usize {
        self.soldiers.len()
    }

    pub fn total_spawned(&self) -> u32 {
        self.total_spawned
    }

    /// Copy-on-iterate
    pub fn snapshot(&self) -> Vec<Entity> {
        self.soldiers.clone()
    }
}
