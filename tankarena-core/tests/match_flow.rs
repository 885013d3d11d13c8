use tankarena_core::ai::planar_distance;
use tankarena_core::{
    MatchConfig, MatchStatus, Outcome, PlayerInput, RecordingSink, RenderKey, SceneAssets,
    TankId, TickClock, World, WorldSnapshot,
};
use test_log::test;

const FRAME: f32 = 1.0 / 60.0;

fn new_world(config: MatchConfig) -> World<RecordingSink> {
    World::new(config, SceneAssets::default(), RecordingSink::new(), 0.0).unwrap()
}

fn run(world: &mut World<RecordingSink>, ticks: usize, input: &PlayerInput) {
    let mut clock = TickClock::new(0.0, FRAME);
    for _ in 0..ticks {
        clock = clock.advanced(FRAME);
        world.step(clock, input);
    }
}

fn enemy_distance(world: &World<RecordingSink>) -> f32 {
    planar_distance(
        world.player().hull().position(),
        world.enemies()[0].hull().position(),
    )
}

#[test]
fn distant_enemy_closes_in_on_first_tick() {
    let mut world = new_world(MatchConfig::default());
    assert_eq!(enemy_distance(&world), 120.0);

    world.step(TickClock::new(16.0, FRAME), &PlayerInput::idle());
    assert!(enemy_distance(&world) < 120.0);
}

#[test]
fn enemy_settles_near_keep_distance() {
    let mut config = MatchConfig::default();
    config.ballistics.damage = 0.0;
    let mut world = new_world(config);
    run(&mut world, 1200, &PlayerInput::idle());
    let distance = enemy_distance(&world);
    assert!(distance < 40.0, "enemy stayed at {distance}");
    assert!(distance > 20.0, "enemy rammed to {distance}");
}

#[test]
fn respawn_budget_of_one_allows_exactly_one_respawn() {
    let mut config = MatchConfig::default();
    config.rules.respawn_budget = 1;
    let mut world = new_world(config);
    let enemy = TankId::Enemy(0);

    world.tank_mut(enemy).unwrap().remove_health(100.0);
    let first = world.step(TickClock::new(16.0, FRAME), &PlayerInput::idle());
    assert_eq!(first.respawned, vec![enemy]);
    assert_eq!(world.match_state().respawn_budget(), 0);
    assert_eq!(world.tank(enemy).unwrap().health(), 100.0);

    world.tank_mut(enemy).unwrap().remove_health(100.0);
    let second = world.step(TickClock::new(32.0, FRAME), &PlayerInput::idle());
    assert!(second.respawned.is_empty());
    assert_eq!(second.outcome, Some(Outcome::Victory));
    assert_eq!(
        world.match_state().status(),
        MatchStatus::Terminated(Outcome::Victory)
    );
}

#[test]
fn render_registry_matches_world_every_tick() {
    let mut config = MatchConfig::default();
    config.arena.enemy_spawns[0].position.z = -45.0;
    let mut world = new_world(config);
    let hold_fire = PlayerInput {
        fire: true,
        turret_pitch_delta: -0.1,
        ..PlayerInput::idle()
    };

    let mut clock = TickClock::new(0.0, FRAME);
    let mut shells_seen = 0;
    for _ in 0..1800 {
        clock = clock.advanced(FRAME);
        let report = world.step(clock, &hold_fire);
        shells_seen += report.fired.len();

        let live = world.sink().live_keys();
        let expected =
            world.obstacles().len() + 3 * world.tank_ids().len() + world.projectile_count();
        assert_eq!(live.len(), expected);
        for (handle, _) in world.projectiles() {
            assert!(live.contains(&RenderKey::Projectile(handle)));
        }
        for key in &live {
            assert!(world.body(*key).is_some(), "{key:?} is registered but gone");
        }
        if world.match_state().is_terminated() {
            break;
        }
    }
    assert!(shells_seen > 0);
}

#[test]
fn identical_inputs_replay_identically() {
    let input = PlayerInput {
        forward: true,
        turn_left: true,
        fire: true,
        turret_yaw_delta: 0.2,
        ..PlayerInput::idle()
    };
    let mut a = new_world(MatchConfig::default());
    let mut b = new_world(MatchConfig::default());
    run(&mut a, 600, &input);
    run(&mut b, 600, &input);
    assert_eq!(a.snapshot().to_json().unwrap(), b.snapshot().to_json().unwrap());
}

#[test]
fn snapshot_survives_json() {
    let mut world = new_world(MatchConfig::default());
    run(&mut world, 150, &PlayerInput::idle());
    let snapshot = world.snapshot();
    let parsed = WorldSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(parsed.tick, 150);
    assert_eq!(parsed.match_state, snapshot.match_state);
    assert_eq!(parsed.tanks.len(), 2);
    assert_eq!(parsed.projectiles.len(), snapshot.projectiles.len());
    assert_eq!(parsed.tank(TankId::Player).map(|tank| tank.health), Some(100.0));
}

#[test]
fn scattered_arena_loads_from_json() {
    let config = MatchConfig::from_json_str(
        r#"{
            "arena": {
                "scatter": { "seed": 3, "count": 6, "extent": 40.0, "half_size": 1.5, "clearance": 10.0 }
            },
            "rules": { "respawn_budget": 0 }
        }"#,
    )
    .unwrap();
    let world = new_world(config);
    assert_eq!(world.obstacles().len(), 2 + 6);
    assert_eq!(world.match_state().respawn_budget(), 0);
}
