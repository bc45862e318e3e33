//! Headless симуляция патруля
//!
//! Четыре солдата патрулируют квадрат, игрок бродит по seeded RNG и
//! время от времени попадает в ближайшего. Печатает roster каждые 100 тиков.
//!
//! Usage: soldier_simulation [tuning.ron]

use bevy::prelude::*;
use rand::Rng;
use soldier_simulation::*;

const SEED: u64 = 42;
const TICK_COUNT: usize = 3000;

fn main() {
    let tuning = match std::env::args().nth(1) {
        Some(path) => match SoldierTuning::load(&path) {
            Ok(tuning) => tuning,
            Err(error) => {
                eprintln!("Failed to load tuning from {}: {} (using defaults)", path, error);
                SoldierTuning::default()
            }
        },
        None => SoldierTuning::default(),
    };

    println!("Starting soldier headless simulation (seed: {})", SEED);

    let mut app = create_headless_app(SEED);
    app.add_systems(FixedUpdate, wander_and_shoot.in_set(SoldierSet::Prepare))
        .add_systems(FixedUpdate, report_removals.in_set(SoldierSet::Cleanup));

    spawn_scenario(app.world_mut(), &tuning);

    for tick in 0..TICK_COUNT {
        run_fixed_tick(&mut app);

        if tick % 100 == 0 {
            let roster = app.world().resource::<Roster>();
            println!(
                "Tick {}: {}/{} soldiers remaining",
                tick,
                roster.remaining(),
                roster.total_spawned()
            );
        }

        if app.world().resource::<Roster>().remaining() == 0 {
            println!("Tick {}: squad eliminated", tick);
            break;
        }
    }

    println!("Simulation complete!");
}

fn spawn_scenario(world: &mut World, tuning: &SoldierTuning) {
    let path = world
        .spawn(PatrolPath::new(vec![
            Vec3::new(-15.0, 0.0, -15.0),
            Vec3::new(15.0, 0.0, -15.0),
            Vec3::new(15.0, 0.0, 15.0),
            Vec3::new(-15.0, 0.0, 15.0),
        ]))
        .id();

    for i in 0..4 {
        let position = Vec3::new(-15.0 + i as f32 * 8.0, 0.0, -15.0);
        world.spawn(SoldierBundle::new(tuning, 1, position, PatrolRoute::new(path)));
    }

    world.spawn((
        Player,
        Actor { faction_id: 2 },
        Health::new(500),
        AimPoint {
            offset: Vec3::Y * 1.5,
        },
        Transform::from_xyz(0.0, 0.0, 30.0),
    ));

    // Стена посреди двора
    world.spawn((Transform::from_xyz(0.0, 1.5, 0.0), Obstacle::cuboid(Vec3::new(6.0, 1.5, 0.5))));
}

/// System: игрок бродит и иногда попадает в ближайшего солдата
fn wander_and_shoot(
    mut rng: ResMut<DeterministicRng>,
    mut players: Query<(Entity, &mut Transform), With<Player>>,
    soldiers: Query<(Entity, &Transform), (With<Soldier>, Without<Player>, Without<Dead>)>,
    mut hits: EventWriter<ProjectileHit>,
) {
    for (player, mut transform) in players.iter_mut() {
        transform.translation.x += rng.rng.gen_range(-0.25..0.25);
        transform.translation.z += rng.rng.gen_range(-0.25..0.25);

        if !rng.rng.gen_bool(0.03) {
            continue;
        }
        let closest = soldiers
            .iter()
            .map(|(entity, t)| (entity, t.translation.distance_squared(transform.translation)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((target, _)) = closest {
            hits.write(ProjectileHit {
                shooter: player,
                target,
                damage: 20,
            });
        }
    }
}

/// System: печать снятых с roster
fn report_removals(mut removed: EventReader<SoldierRemoved>) {
    for event in removed.read() {
        println!("Soldier {:?} down, {} remaining", event.soldier, event.remaining);
    }
}
