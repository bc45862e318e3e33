//! Soldier Simulation Core
//!
//! ECS-симуляция враждебных солдат на Bevy 0.16.
//!
//! Тик солдата (FixedUpdate, 60Hz):
//! 1. Prepare: сброс per-tick флагов, инициализация новых солдат, cooldowns
//! 2. Combat: ProjectileHit → Health → Damaged/Died
//! 3. Perception: DetectionModule, TargetDetected/TargetLost
//! 4. Decision: FSM transitions → state action
//! 5. Locomotion: NavAgent двигает Transform, animation sync
//! 6. Cleanup: despawn трупов
//!
//! Observers срабатывают на sync points между sets, так что урон в Combat
//! может перевести солдата в Follow в том же тике.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod detection;
pub mod logger;
pub mod navigation;
pub mod patrol;
pub mod roster;
pub mod soldier;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AIState};
pub use combat::{
    CombatPlugin, Damaged, Dead, DespawnAfter, Died, FireAnimationGate, ProjectileHit, WeaponConfig,
    WeaponController, WeaponFired,
};
pub use components::*;
pub use config::{ConfigError, SoldierTuning};
pub use detection::{DetectionConfig, DetectionModule, DetectionState, Obstacle, ObstacleShape, OwnedBy};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavAgent, NavConfig};
pub use patrol::{PatrolPath, PatrolRoute};
pub use roster::{Roster, SoldierRemoved};
pub use soldier::{
    DamageCue, Posture, SetupError, SetupFailed, Soldier, SoldierAnimation, SoldierAttacked, SoldierBundle,
    SoldierConfig, SoldierDamaged, SoldierDied, SoldierPlugin, SoldierSetupFailed, SoldierStatus, TargetDetected,
    TargetLost,
};

/// Фазы тика солдата (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoldierSet {
    Prepare,
    Combat,
    Perception,
    Decision,
    Locomotion,
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SoldierSet::Prepare,
                SoldierSet::Combat,
                SoldierSet::Perception,
                SoldierSet::Decision,
                SoldierSet::Locomotion,
                SoldierSet::Cleanup,
            )
                .chain(),
        );

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Подсистемы
            .add_plugins((CombatPlugin, SoldierPlugin, AIPlugin));

        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Один fixed тик вручную (детерминированно, без wall clock)
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
