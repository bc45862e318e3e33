//! Soldier behaviour integration test
//!
//! Headless App + SimulationPlugin, тики через `run_fixed_tick`.
//!
//! Проверяем:
//! - Follow/Attack сценарии (дистанции 12 / 8 / 3 при attack range 10, ratio 0.5)
//! - Patrol ↔ Follow только через detected/lost
//! - fire gate, damage cue, смерть, roster
//! - провал инициализации одного солдата не ломает остальных

use bevy::prelude::*;
use soldier_simulation::*;

#[derive(Resource, Default)]
struct Notifications {
    attacked: Vec<(Entity, bool)>,
    damaged: Vec<(Entity, u32)>,
    died: Vec<Entity>,
}

/// Helper: headless App + observers, которые пишут notifications
fn create_soldier_app() -> App {
    let mut app = create_headless_app(42);
    app.init_resource::<Notifications>()
        .add_observer(|trigger: Trigger<SoldierAttacked>, mut log: ResMut<Notifications>| {
            log.attacked.push((trigger.target(), trigger.event().shot_fired));
        })
        .add_observer(|trigger: Trigger<SoldierDamaged>, mut log: ResMut<Notifications>| {
            log.damaged.push((trigger.target(), trigger.event().amount));
        })
        .add_observer(|trigger: Trigger<SoldierDied>, mut log: ResMut<Notifications>| {
            log.died.push(trigger.target());
        });
    app
}

/// Глаза на уровне земли: дистанции в сценариях "как написано"
fn tuning() -> SoldierTuning {
    let mut tuning = SoldierTuning::default();
    tuning.detection.eye_height = 0.0;
    tuning
}

fn spawn_soldier(app: &mut App, tuning: &SoldierTuning, position: Vec3, route: PatrolRoute) -> Entity {
    app.world_mut()
        .spawn(SoldierBundle::new(tuning, 1, position, route))
        .id()
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((Player, Actor { faction_id: 2 }, Transform::from_translation(position)))
        .id()
}

fn state(app: &App, soldier: Entity) -> Option<AIState> {
    app.world().get::<AIState>(soldier).copied()
}

fn nav_destination(app: &App, soldier: Entity) -> Option<Vec3> {
    app.world().get::<NavAgent>(soldier).and_then(|nav| nav.destination())
}

fn posture(app: &App, soldier: Entity) -> Option<Posture> {
    app.world().get::<SoldierAnimation>(soldier).map(|a| a.posture)
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn ticks(app: &mut App, count: usize) {
    for _ in 0..count {
        run_fixed_tick(app);
    }
}

#[test]
fn test_target_beyond_attack_range_is_followed() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(12.0, 0.0, 0.0));

    run_fixed_tick(&mut app);

    assert_eq!(state(&app, soldier), Some(AIState::Follow));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(12.0, 0.0, 0.0)));
    assert_eq!(posture(&app, soldier), Some(Posture::Pursue));
    assert!(drain::<WeaponFired>(&mut app).is_empty());
}

#[test]
fn test_target_inside_attack_range_closes_distance() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));

    run_fixed_tick(&mut app);

    // Detected → Follow → (тот же тик) Attack; 8 ≥ 0.5 × 10 → сближаемся
    assert_eq!(state(&app, soldier), Some(AIState::Attack));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(8.0, 0.0, 0.0)));
    assert_eq!(posture(&app, soldier), Some(Posture::Attack));

    let shots = drain::<WeaponFired>(&mut app);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].shooter, soldier);
}

#[test]
fn test_target_inside_stop_distance_holds_position_and_fires() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(3.0, 0.0, 0.0));

    run_fixed_tick(&mut app);

    assert_eq!(state(&app, soldier), Some(AIState::Attack));
    // 3 < 5 → держим текущую позицию
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::ZERO));
    assert_eq!(app.world().get::<Transform>(soldier).map(|t| t.translation), Some(Vec3::ZERO));

    // Оружие смотрит на цель, выстрел был
    let aim = app.world().get::<WeaponController>(soldier).map(|w| w.aim_direction());
    assert!(aim.is_some_and(|dir| dir.x > 0.0));
    assert_eq!(drain::<WeaponFired>(&mut app).len(), 1);

    // Корпус повернулся к цели (+X)
    let forward = app.world().get::<Transform>(soldier).map(|t| *t.forward());
    assert!(forward.is_some_and(|f| f.x > 0.0));

    assert_eq!(app.world().resource::<Notifications>().attacked, vec![(soldier, true)]);
}

#[test]
fn test_zero_stop_ratio_from_tuning_closes_to_point_blank() {
    let mut app = create_soldier_app();
    let mut point_blank = tuning();
    point_blank.ai.attack_stop_distance_ratio = 0.0;
    let soldier = spawn_soldier(&mut app, &point_blank, Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(3.0, 0.0, 0.0));

    run_fixed_tick(&mut app);

    assert_eq!(app.world().get::<AIConfig>(soldier).map(|c| c.attack_stop_distance_ratio), Some(0.0));
    assert_eq!(state(&app, soldier), Some(AIState::Attack));
    // 3 ≥ 0 × 10 → сближаемся даже вплотную
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn test_full_stop_ratio_from_tuning_never_advances() {
    let mut app = create_soldier_app();
    let mut stand_ground = tuning();
    stand_ground.ai.attack_stop_distance_ratio = 1.0;
    let soldier = spawn_soldier(&mut app, &stand_ground, Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));

    ticks(&mut app, 10);

    assert_eq!(app.world().get::<AIConfig>(soldier).map(|c| c.attack_stop_distance_ratio), Some(1.0));
    assert_eq!(state(&app, soldier), Some(AIState::Attack));
    // 8 < 1.0 × 10 → стоим на месте
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::ZERO));
    assert_eq!(app.world().get::<Transform>(soldier).map(|t| t.translation), Some(Vec3::ZERO));
}

#[test]
fn test_attack_drops_back_to_follow_when_target_leaves_range() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let player = spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Attack));

    app.world_mut().entity_mut(player).insert(Transform::from_xyz(16.0, 0.0, 0.0));
    run_fixed_tick(&mut app);

    assert_eq!(state(&app, soldier), Some(AIState::Follow));
    assert_eq!(posture(&app, soldier), Some(Posture::Pursue));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(16.0, 0.0, 0.0)));
}

#[test]
fn test_closed_fire_gate_blocks_shot_but_not_notification() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    app.world_mut().entity_mut(soldier).insert(FireAnimationGate { fire_playing: false });
    spawn_player(&mut app, Vec3::new(3.0, 0.0, 0.0));

    ticks(&mut app, 3);

    assert_eq!(state(&app, soldier), Some(AIState::Attack));
    assert!(drain::<WeaponFired>(&mut app).is_empty());
    assert_eq!(
        app.world().resource::<Notifications>().attacked,
        vec![(soldier, false), (soldier, false), (soldier, false)]
    );
}

#[test]
fn test_weapon_cooldown_limits_fire_rate() {
    let mut app = create_soldier_app();
    spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(3.0, 0.0, 0.0));

    // 0.5с между выстрелами, 60 тиков = 1с → выстрелы на тиках 1, ~31, ~61
    ticks(&mut app, 60);

    let shots = drain::<WeaponFired>(&mut app).len();
    assert!((2..=3).contains(&shots), "shots = {}", shots);
    assert_eq!(app.world().resource::<Notifications>().attacked.len(), 60);
}

#[test]
fn test_patrol_advances_through_waypoints() {
    let mut app = create_soldier_app();
    let path = app
        .world_mut()
        .spawn(PatrolPath::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]))
        .id();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::new(1.0, 0.0, 0.0), PatrolRoute::new(path));

    run_fixed_tick(&mut app);

    // Ближайшая нода 0 уже в радиусе 2 → сразу следующая
    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
    assert_eq!(posture(&app, soldier), Some(Posture::Walk));
    assert_eq!(app.world().get::<PatrolRoute>(soldier).map(|r| r.destination_index()), Some(1));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(10.0, 0.0, 0.0)));

    // 3.5 м/с: 7 м до радиуса ноды 1 за 2с
    ticks(&mut app, 180);
    assert_eq!(app.world().get::<PatrolRoute>(soldier).map(|r| r.destination_index()), Some(2));
    assert!(app.world().get::<SoldierAnimation>(soldier).is_some_and(|a| a.move_speed > 0.0));
}

#[test]
fn test_missing_patrol_path_holds_position() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::new(4.0, 0.0, 4.0), PatrolRoute::unassigned());

    ticks(&mut app, 10);

    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(4.0, 0.0, 4.0)));
    assert_eq!(
        app.world().get::<Transform>(soldier).map(|t| t.translation),
        Some(Vec3::new(4.0, 0.0, 4.0))
    );
}

#[test]
fn test_polling_alone_never_leaves_patrol() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Attack));

    // Цель видна и в range, но detected edge уже был: Patrol не покидаем
    app.world_mut().entity_mut(soldier).insert(AIState::Patrol);
    ticks(&mut app, 5);

    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
    assert!(app.world().get::<DetectionModule>(soldier).is_some_and(|d| d.is_seeing_target()));
}

#[test]
fn test_target_lost_after_timeout_returns_to_patrol() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let player = spawn_player(&mut app, Vec3::new(15.0, 0.0, 0.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Follow));

    // Цель ушла далеко: known target остаётся 4с (stale), потом Lost
    app.world_mut().entity_mut(player).insert(Transform::from_xyz(0.0, 0.0, 100.0));
    ticks(&mut app, 200);
    assert_eq!(state(&app, soldier), Some(AIState::Follow));
    assert_eq!(
        app.world().get::<DetectionModule>(soldier).and_then(|d| d.last_known_position()),
        Some(Vec3::new(15.0, 0.0, 0.0))
    );

    ticks(&mut app, 60);
    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
    assert_eq!(posture(&app, soldier), Some(Posture::Walk));
}

#[test]
fn test_dead_target_is_lost_immediately() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let player = spawn_player(&mut app, Vec3::new(12.0, 0.0, 0.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Follow));

    app.world_mut().despawn(player);
    run_fixed_tick(&mut app);

    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
}

#[test]
fn test_wall_blocks_detection() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(12.0, 0.0, 0.0));
    app.world_mut().spawn((
        Transform::from_xyz(6.0, 0.0, 0.0),
        Obstacle::cuboid(Vec3::new(0.5, 3.0, 5.0)),
    ));

    ticks(&mut app, 5);

    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
}

#[test]
fn test_own_geometry_does_not_block_detection() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    spawn_player(&mut app, Vec3::new(12.0, 0.0, 0.0));
    app.world_mut().spawn((
        Transform::from_xyz(0.0, 0.0, 0.0),
        Obstacle::sphere(0.8),
        OwnedBy(soldier),
    ));

    run_fixed_tick(&mut app);

    assert_eq!(state(&app, soldier), Some(AIState::Follow));
}

#[test]
fn test_player_damage_force_acquires_and_cues_once_per_tick() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    // Вне detection range: увидеть нельзя, только "подстрелили отсюда"
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 50.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Patrol));

    for _ in 0..3 {
        app.world_mut().send_event(ProjectileHit { shooter: player, target: soldier, damage: 10 });
    }
    run_fixed_tick(&mut app);

    assert_eq!(drain::<DamageCue>(&mut app).len(), 1);
    assert_eq!(app.world().resource::<Notifications>().damaged.len(), 3);
    assert_eq!(app.world().get::<Health>(soldier).map(|h| h.current), Some(70));

    // Тот же тик: forced acquire → detected → Follow к позиции стрелявшего
    assert_eq!(state(&app, soldier), Some(AIState::Follow));
    assert_eq!(nav_destination(&app, soldier), Some(Vec3::new(0.0, 0.0, 50.0)));

    let animation = app.world().get::<SoldierAnimation>(soldier).copied();
    assert!(animation.is_some_and(|a| a.flinch));
    assert!(app.world().get::<SoldierStatus>(soldier).is_some_and(|s| s.last_time_damaged > 0.0));

    // Флаг не утекает в следующий тик
    app.world_mut().send_event(ProjectileHit { shooter: player, target: soldier, damage: 10 });
    run_fixed_tick(&mut app);
    assert_eq!(drain::<DamageCue>(&mut app).len(), 1);

    run_fixed_tick(&mut app);
    assert!(app.world().get::<SoldierAnimation>(soldier).is_some_and(|a| !a.flinch));
}

#[test]
fn test_non_player_damage_is_not_a_lead() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let stray = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 50.0)).id();

    run_fixed_tick(&mut app);
    app.world_mut().send_event(ProjectileHit { shooter: stray, target: soldier, damage: 10 });
    run_fixed_tick(&mut app);

    // Health всё равно теряет HP, но реакции нет
    assert_eq!(app.world().get::<Health>(soldier).map(|h| h.current), Some(90));
    assert!(drain::<DamageCue>(&mut app).is_empty());
    assert!(app.world().resource::<Notifications>().damaged.is_empty());
    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
}

#[test]
fn test_player_without_actor_is_not_acquired() {
    let mut app = create_soldier_app();
    let soldier = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    // Player без Actor: detection его не видит, значит и захватывать нечего
    let phantom = app.world_mut().spawn((Player, Transform::from_xyz(0.0, 0.0, 50.0))).id();

    run_fixed_tick(&mut app);
    app.world_mut().send_event(ProjectileHit { shooter: phantom, target: soldier, damage: 10 });
    run_fixed_tick(&mut app);

    assert_eq!(app.world().get::<Health>(soldier).map(|h| h.current), Some(90));
    assert!(drain::<DamageCue>(&mut app).is_empty());
    assert!(app.world().resource::<Notifications>().damaged.is_empty());
    assert!(app.world().get::<DetectionModule>(soldier).is_some_and(|d| d.known_target().is_none()));
    assert_eq!(state(&app, soldier), Some(AIState::Patrol));
}

#[test]
fn test_death_unregisters_and_despawns_immediately() {
    let mut app = create_soldier_app();
    let victim = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let survivor = spawn_soldier(&mut app, &tuning(), Vec3::new(0.0, 0.0, -5.0), PatrolRoute::unassigned());
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 50.0));

    run_fixed_tick(&mut app);
    assert_eq!(app.world().resource::<Roster>().remaining(), 2);

    app.world_mut().send_event(ProjectileHit { shooter: player, target: victim, damage: 500 });
    run_fixed_tick(&mut app);

    let roster = app.world().resource::<Roster>();
    assert_eq!(roster.remaining(), 1);
    assert_eq!(roster.total_spawned(), 2);
    assert!(roster.contains(survivor));

    assert_eq!(
        drain::<SoldierRemoved>(&mut app),
        vec![SoldierRemoved { soldier: victim, remaining: 1 }]
    );
    assert_eq!(app.world().resource::<Notifications>().died, vec![victim]);
    assert!(app.world().get_entity(victim).is_err());
}

#[test]
fn test_corpse_lingers_for_death_duration() {
    let mut app = create_soldier_app();
    let mut slow_tuning = tuning();
    slow_tuning.soldier.death_duration = 1.0;
    let soldier = spawn_soldier(&mut app, &slow_tuning, Vec3::ZERO, PatrolRoute::unassigned());
    let player = spawn_player(&mut app, Vec3::new(3.0, 0.0, 0.0));

    run_fixed_tick(&mut app);
    assert_eq!(state(&app, soldier), Some(AIState::Attack));

    app.world_mut().send_event(ProjectileHit { shooter: player, target: soldier, damage: 500 });
    run_fixed_tick(&mut app);
    drain::<WeaponFired>(&mut app);

    assert!(app.world().get::<Dead>(soldier).is_some());
    assert_eq!(posture(&app, soldier), Some(Posture::Dead));
    assert!(app.world().get::<NavAgent>(soldier).is_some_and(|nav| !nav.is_enabled()));
    assert_eq!(app.world().resource::<Roster>().remaining(), 0);

    // Мёртвый не стреляет и не получает повторный Died
    app.world_mut().send_event(ProjectileHit { shooter: player, target: soldier, damage: 10 });
    ticks(&mut app, 30);
    assert!(drain::<WeaponFired>(&mut app).is_empty());
    assert_eq!(app.world().resource::<Notifications>().died, vec![soldier]);
    assert!(app.world().get_entity(soldier).is_ok());

    ticks(&mut app, 35);
    assert!(app.world().get_entity(soldier).is_err());
}

#[test]
fn test_missing_dependency_fails_setup_without_affecting_roster() {
    let mut app = create_soldier_app();
    let healthy = spawn_soldier(&mut app, &tuning(), Vec3::ZERO, PatrolRoute::unassigned());
    let broken = app
        .world_mut()
        .spawn((
            Soldier::default(),
            Actor { faction_id: 1 },
            Transform::from_xyz(5.0, 0.0, 0.0),
            DetectionModule::default(),
            NavAgent::default(),
        ))
        .id();
    spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));

    ticks(&mut app, 3);

    assert_eq!(
        drain::<SoldierSetupFailed>(&mut app),
        vec![SoldierSetupFailed { soldier: broken, error: SetupError::MissingWeapon }]
    );
    assert!(app.world().get::<SetupFailed>(broken).is_some());
    assert_eq!(state(&app, broken), None);

    let roster = app.world().resource::<Roster>();
    assert_eq!(roster.remaining(), 1);
    assert!(roster.contains(healthy));
    assert!(!roster.contains(broken));

    assert_eq!(state(&app, healthy), Some(AIState::Attack));
}
