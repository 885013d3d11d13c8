use crate::ai::{AiView, think};
use crate::arena::{Arena, Handle};
use crate::body::RigidBody;
use crate::collision::point_hits_hull;
use crate::config::{ConfigError, MatchConfig};
use crate::input::{PlayerInput, TickClock};
use crate::layout::obstacle_bodies;
use crate::match_state::{MatchState, Outcome};
use crate::movement::{Maneuver, try_maneuver};
use crate::projectile::Projectile;
use crate::render::{RenderKey, RenderSink, SceneAssets, TankAssets};
use crate::snapshot::{ProjectileSnapshot, TankSnapshot, WorldSnapshot};
use crate::tank::{SpawnPose, Tank, TankId, TankPart};
use log::{debug, info};

/// A rejected player move is undone rather than bounced.
const PLAYER_PUSH_BACK: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ShotEntry {
    pub projectile: Projectile,
    pub owner: TankId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile: Handle,
    pub owner: TankId,
    pub target: TankId,
}

/// What happened during one call to [`World::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub fired: Vec<(TankId, Handle)>,
    pub hits: Vec<Hit>,
    pub respawned: Vec<TankId>,
    pub outcome: Option<Outcome>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
            && self.hits.is_empty()
            && self.respawned.is_empty()
            && self.outcome.is_none()
    }
}

/// Owns every tank, obstacle and projectile of a match and drives them one
/// tick at a time. The render sink is told about each drawable exactly once
/// when it appears and once when it goes away.
pub struct World<S: RenderSink> {
    tick: u64,
    config: MatchConfig,
    assets: SceneAssets,
    sink: S,
    player: Tank,
    enemies: Vec<Tank>,
    obstacles: Vec<RigidBody>,
    projectiles: Arena<ShotEntry>,
    match_state: MatchState,
}

impl<S: RenderSink> World<S> {
    pub fn new(
        config: MatchConfig,
        assets: SceneAssets,
        sink: S,
        now_ms: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = spawn_tank(&config, config.arena.player_spawn, now_ms);
        let enemies = config
            .arena
            .enemy_spawns
            .iter()
            .map(|spawn| spawn_tank(&config, *spawn, now_ms))
            .collect();
        let obstacles = obstacle_bodies(&config.arena);
        let match_state = MatchState::new(&config.rules);

        let mut world = Self {
            tick: 0,
            config,
            assets,
            sink,
            player,
            enemies,
            obstacles,
            projectiles: Arena::new(),
            match_state,
        };

        for index in 0..world.obstacles.len() {
            world
                .sink
                .register_instance(RenderKey::Obstacle(index), world.assets.obstacle);
        }
        for id in world.tank_ids() {
            world.register_tank(id);
        }
        Ok(world)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn player(&self) -> &Tank {
        &self.player
    }

    pub fn enemies(&self) -> &[Tank] {
        &self.enemies
    }

    pub fn obstacles(&self) -> &[RigidBody] {
        &self.obstacles
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (Handle, &ShotEntry)> {
        self.projectiles.iter()
    }

    pub fn projectile(&self, handle: Handle) -> Option<&ShotEntry> {
        self.projectiles.get(handle)
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Player first, then enemies in spawn order.
    pub fn tank_ids(&self) -> Vec<TankId> {
        std::iter::once(TankId::Player)
            .chain((0..self.enemies.len()).map(TankId::Enemy))
            .collect()
    }

    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        match id {
            TankId::Player => Some(&self.player),
            TankId::Enemy(index) => self.enemies.get(index),
        }
    }

    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        match id {
            TankId::Player => Some(&mut self.player),
            TankId::Enemy(index) => self.enemies.get_mut(index),
        }
    }

    /// Finished pose of a registered drawable.
    pub fn body(&self, key: RenderKey) -> Option<&RigidBody> {
        match key {
            RenderKey::Obstacle(index) => self.obstacles.get(index),
            RenderKey::Tank(id, part) => self.tank(id).map(|tank| tank.part(part)),
            RenderKey::Projectile(handle) => self
                .projectiles
                .get(handle)
                .map(|entry| entry.projectile.body()),
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let tanks = self
            .tank_ids()
            .into_iter()
            .filter_map(|id| {
                self.tank(id).map(|tank| TankSnapshot {
                    id,
                    position: tank.hull().position(),
                    body_yaw: tank.body_yaw(),
                    turret_yaw: tank.turret_yaw(),
                    turret_pitch: tank.turret_pitch(),
                    health: tank.health(),
                })
            })
            .collect();
        let projectiles = self
            .projectiles
            .iter()
            .map(|(handle, entry)| ProjectileSnapshot {
                handle,
                owner: entry.owner,
                position: entry.projectile.position(),
                time_alive: entry.projectile.time_alive(),
            })
            .collect();
        WorldSnapshot {
            tick: self.tick,
            match_state: self.match_state,
            tanks,
            projectiles,
        }
    }

    /// Runs one simulation tick: player input, enemy AI in spawn order,
    /// projectile flight, hits and ground contact, then deaths. Does nothing
    /// once the match has terminated.
    pub fn step(&mut self, clock: TickClock, input: &PlayerInput) -> TickReport {
        let mut report = TickReport::default();
        if self.match_state.is_terminated() {
            return report;
        }
        self.tick += 1;

        self.drive_player(clock, input, &mut report);
        self.drive_enemies(clock, &mut report);

        let ballistics = self.config.ballistics;
        for (_, entry) in self.projectiles.iter_mut() {
            entry.projectile.advance(clock.elapsed_secs, &ballistics);
        }
        self.resolve_projectiles(&mut report);
        self.resolve_deaths(clock, &mut report);
        report
    }

    /// Unregisters everything still on screen and hands the sink back.
    pub fn dispose(mut self) -> S {
        for handle in self.projectiles.handles() {
            self.despawn_projectile(handle);
        }
        for id in self.tank_ids() {
            self.unregister_tank(id);
        }
        for index in 0..self.obstacles.len() {
            self.sink.unregister_instance(RenderKey::Obstacle(index));
        }
        self.sink
    }

    fn drive_player(&mut self, clock: TickClock, input: &PlayerInput, report: &mut TickReport) {
        let tuning = self.config.tank;
        let blockers: Vec<RigidBody> = self
            .obstacles
            .iter()
            .copied()
            .chain(self.enemies.iter().map(|enemy| *enemy.hull()))
            .collect();

        let turn = input.turn();
        if turn != 0.0 {
            let maneuver = Maneuver::Rotate(turn * tuning.turn_rate);
            try_maneuver(&mut self.player, maneuver, &blockers, PLAYER_PUSH_BACK);
        }
        let drive = input.drive();
        if drive != 0.0 {
            let maneuver = Maneuver::Advance(drive * tuning.move_rate);
            try_maneuver(&mut self.player, maneuver, &blockers, PLAYER_PUSH_BACK);
        }

        if input.turret_yaw_delta != 0.0 || input.turret_pitch_delta != 0.0 {
            let yaw = self.player.turret_yaw() + input.turret_yaw_delta;
            let pitch = (self.player.turret_pitch() + input.turret_pitch_delta)
                .clamp(tuning.min_pitch, tuning.max_pitch);
            self.player.aim_turret(pitch, yaw);
        }

        if input.fire {
            if let Some(shot) = self.player.fire(clock.now_ms) {
                let handle = self.spawn_projectile(shot, TankId::Player);
                report.fired.push((TankId::Player, handle));
            }
        }
    }

    fn drive_enemies(&mut self, clock: TickClock, report: &mut TickReport) {
        let player_hull = *self.player.hull();
        let player_health = self.player.health();

        for index in 0..self.enemies.len() {
            let blockers: Vec<RigidBody> = self
                .obstacles
                .iter()
                .copied()
                .chain(
                    self.enemies
                        .iter()
                        .enumerate()
                        .filter(|(other, _)| *other != index)
                        .map(|(_, enemy)| *enemy.hull()),
                )
                .chain(std::iter::once(player_hull))
                .collect();
            let view = AiView {
                player_hull: &player_hull,
                player_health,
                blockers: &blockers,
            };

            let decision = think(&mut self.enemies[index], &view, &self.config, clock.now_ms);
            if let Some(shot) = decision.shot {
                let id = TankId::Enemy(index);
                let handle = self.spawn_projectile(shot, id);
                report.fired.push((id, handle));
            }
        }
    }

    fn resolve_projectiles(&mut self, report: &mut TickReport) {
        let ballistics = self.config.ballistics;

        for handle in self.projectiles.handles() {
            let Some(entry) = self.projectiles.get(handle) else {
                continue;
            };
            if entry.projectile.below_ground(&ballistics) {
                self.despawn_projectile(handle);
                continue;
            }

            let point = entry.projectile.position();
            let owner = entry.owner;
            let target = self.tank_ids().into_iter().find(|id| {
                *id != owner
                    && self.tank(*id).is_some_and(|tank| {
                        point_hits_hull(
                            point,
                            tank.hull(),
                            ballistics.hit_sample_offset,
                            ballistics.hit_radius,
                        )
                    })
            });
            let Some(target) = target else {
                continue;
            };

            if let Some(tank) = self.tank_mut(target) {
                tank.remove_health(ballistics.damage);
            }
            debug!("{:?} hit {:?} for {}", owner, target, ballistics.damage);
            report.hits.push(Hit {
                projectile: handle,
                owner,
                target,
            });
            self.despawn_projectile(handle);
        }
    }

    fn resolve_deaths(&mut self, clock: TickClock, report: &mut TickReport) {
        if self.player.is_destroyed() {
            self.match_state.terminate(Outcome::Defeat);
            report.outcome = self.match_state.outcome();
            return;
        }

        for index in 0..self.enemies.len() {
            if !self.enemies[index].is_destroyed() {
                continue;
            }
            if self.match_state.consume_respawn(self.config.rules.kill_score) {
                self.respawn_enemy(index, clock.now_ms);
                report.respawned.push(TankId::Enemy(index));
            } else {
                self.match_state.terminate(Outcome::Victory);
                report.outcome = self.match_state.outcome();
                return;
            }
        }
    }

    fn respawn_enemy(&mut self, index: usize, now_ms: f64) {
        let id = TankId::Enemy(index);
        let Some(spawn) = self.config.arena.enemy_spawns.get(index).copied() else {
            return;
        };
        self.unregister_tank(id);
        self.enemies[index] = spawn_tank(&self.config, spawn, now_ms);
        self.register_tank(id);
        info!(
            "{:?} respawned, {} respawns left, score {}",
            id,
            self.match_state.respawn_budget(),
            self.match_state.score()
        );
    }

    fn spawn_projectile(&mut self, projectile: Projectile, owner: TankId) -> Handle {
        debug!(
            "{:?} fired at yaw {} pitch {}",
            owner,
            projectile.launch_yaw(),
            projectile.launch_pitch()
        );
        let handle = self.projectiles.insert(ShotEntry { projectile, owner });
        self.sink
            .register_instance(RenderKey::Projectile(handle), self.assets.projectile);
        handle
    }

    fn despawn_projectile(&mut self, handle: Handle) {
        if self.projectiles.remove(handle).is_some() {
            self.sink.unregister_instance(RenderKey::Projectile(handle));
        }
    }

    fn tank_assets(&self, id: TankId) -> TankAssets {
        match id {
            TankId::Player => self.assets.player,
            TankId::Enemy(_) => self.assets.enemy,
        }
    }

    fn register_tank(&mut self, id: TankId) {
        let assets = self.tank_assets(id);
        for part in TankPart::ALL {
            self.sink
                .register_instance(RenderKey::Tank(id, part), assets.for_part(part));
        }
    }

    fn unregister_tank(&mut self, id: TankId) {
        for part in TankPart::ALL {
            self.sink.unregister_instance(RenderKey::Tank(id, part));
        }
    }
}

fn spawn_tank(config: &MatchConfig, spawn: SpawnPose, now_ms: f64) -> Tank {
    Tank::new(
        spawn,
        config.tank.max_health,
        config.tank.fire_interval_ms,
        now_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;
    use glam::Vec3;
    use test_log::test;

    const FRAME: f32 = 1.0 / 60.0;

    fn world_with(config: MatchConfig) -> World<RecordingSink> {
        World::new(config, SceneAssets::default(), RecordingSink::new(), 0.0).unwrap()
    }

    fn stationary_config() -> MatchConfig {
        let mut config = MatchConfig::default();
        config.tank.move_rate = 0.0;
        config.tank.turn_rate = 0.0;
        config
    }

    fn fire_input() -> PlayerInput {
        PlayerInput {
            fire: true,
            ..PlayerInput::idle()
        }
    }

    #[test]
    fn construction_registers_everything_once() {
        let world = world_with(MatchConfig::default());
        let live = world.sink().live_keys();
        assert_eq!(live.len(), 2 + 3 * 2);
        assert!(live.contains(&RenderKey::Obstacle(1)));
        assert!(live.contains(&RenderKey::Tank(TankId::Enemy(0), TankPart::Cannon)));
        for key in live {
            assert_eq!(world.sink().registrations_of(key), 1);
            assert!(world.body(key).is_some());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = MatchConfig::default();
        config.ballistics.speed = -1.0;
        assert!(World::new(config, SceneAssets::default(), RecordingSink::new(), 0.0).is_err());
    }

    #[test]
    fn body_lookup_returns_finished_pose() {
        let world = world_with(MatchConfig::default());
        let hull = world.body(RenderKey::Tank(TankId::Player, TankPart::Hull));
        assert_eq!(hull, Some(world.player().hull()));
        assert!(world.body(RenderKey::Obstacle(9)).is_none());
    }

    #[test]
    fn player_fire_respects_cooldown() {
        let mut world = world_with(MatchConfig::default());
        let early = world.step(TickClock::new(1000.0, FRAME), &fire_input());
        assert!(early.fired.is_empty());

        let ready = world.step(TickClock::new(2000.0, FRAME), &fire_input());
        assert_eq!(ready.fired.len(), 1);
        assert_eq!(ready.fired[0].0, TankId::Player);

        let again = world.step(TickClock::new(2500.0, FRAME), &fire_input());
        assert!(again.fired.is_empty());
        assert_eq!(world.projectile_count(), 1);
    }

    #[test]
    fn grounded_projectile_is_unregistered_once() {
        let mut world = world_with(MatchConfig::default());
        let report = world.step(TickClock::new(2000.0, FRAME), &fire_input());
        let (_, handle) = report.fired[0];
        let key = RenderKey::Projectile(handle);
        assert_eq!(world.sink().registrations_of(key), 1);

        let mut clock = TickClock::new(2000.0, FRAME);
        for _ in 0..60 {
            clock = clock.advanced(0.1);
            world.step(clock, &PlayerInput::idle());
        }
        assert!(world.projectile(handle).is_none());
        assert!(world.body(key).is_none());
        assert_eq!(world.sink().unregistrations_of(key), 1);
    }

    #[test]
    fn shell_damages_enemy_in_front() {
        let mut config = stationary_config();
        config.arena.enemy_spawns = vec![SpawnPose::new(Vec3::new(0.0, 0.5, -8.0), 0.0)];
        config.arena.obstacles.clear();
        let mut world = world_with(config);

        let mut clock = TickClock::new(2000.0, FRAME);
        let first = world.step(clock, &fire_input());
        let (_, shell) = first.fired[0];

        let mut hit = None;
        for _ in 0..120 {
            clock = clock.advanced(FRAME);
            let report = world.step(clock, &PlayerInput::idle());
            if let Some(found) = report.hits.iter().find(|hit| hit.projectile == shell) {
                hit = Some(*found);
                break;
            }
        }

        let hit = hit.expect("shell should reach the enemy");
        assert_eq!(hit.owner, TankId::Player);
        assert_eq!(hit.target, TankId::Enemy(0));
        assert_eq!(world.tank(TankId::Enemy(0)).map(Tank::health), Some(80.0));
        assert!(world.projectile(shell).is_none());
        assert_eq!(world.sink().unregistrations_of(RenderKey::Projectile(shell)), 1);
    }

    #[test]
    fn enemy_death_consumes_budget_then_ends_match() {
        let mut config = MatchConfig::default();
        config.rules.respawn_budget = 1;
        let spawn = config.arena.enemy_spawns[0];
        let mut world = world_with(config);
        let enemy = TankId::Enemy(0);

        world.tank_mut(enemy).unwrap().remove_health(100.0);
        let report = world.step(TickClock::new(100.0, FRAME), &PlayerInput::idle());
        assert_eq!(report.respawned, vec![enemy]);
        assert_eq!(world.match_state().respawn_budget(), 0);
        assert_eq!(world.match_state().score(), 100.0);
        let respawned = world.tank(enemy).unwrap();
        assert_eq!(respawned.health(), 100.0);
        assert_eq!(respawned.hull().position(), spawn.position);
        assert_eq!(respawned.body_yaw(), spawn.yaw);

        let hull = RenderKey::Tank(enemy, TankPart::Hull);
        assert_eq!(world.sink().registrations_of(hull), 2);
        assert_eq!(world.sink().unregistrations_of(hull), 1);

        world.tank_mut(enemy).unwrap().remove_health(100.0);
        let report = world.step(TickClock::new(200.0, FRAME), &PlayerInput::idle());
        assert_eq!(report.outcome, Some(Outcome::Victory));
        assert!(world.match_state().is_terminated());
        assert_eq!(world.match_state().score(), 100.0);
    }

    #[test]
    fn overkill_is_counted_once() {
        let mut world = world_with(MatchConfig::default());
        let enemy = TankId::Enemy(0);
        world.tank_mut(enemy).unwrap().remove_health(100.0);
        world.tank_mut(enemy).unwrap().remove_health(60.0);
        let report = world.step(TickClock::new(100.0, FRAME), &PlayerInput::idle());
        assert_eq!(report.respawned, vec![enemy]);
        assert_eq!(world.match_state().score(), 100.0);
        assert_eq!(world.match_state().respawn_budget(), 2);
    }

    #[test]
    fn player_death_is_a_defeat() {
        let mut world = world_with(MatchConfig::default());
        world.tank_mut(TankId::Player).unwrap().remove_health(100.0);
        world.tank_mut(TankId::Enemy(0)).unwrap().remove_health(100.0);
        let report = world.step(TickClock::new(100.0, FRAME), &PlayerInput::idle());
        assert_eq!(report.outcome, Some(Outcome::Defeat));
        assert!(report.respawned.is_empty());
    }

    #[test]
    fn terminated_world_is_frozen() {
        let mut world = world_with(MatchConfig::default());
        world.tank_mut(TankId::Player).unwrap().remove_health(100.0);
        world.step(TickClock::new(100.0, FRAME), &PlayerInput::idle());
        let before = world.snapshot();
        let events = world.sink().events.len();

        let forward = PlayerInput {
            forward: true,
            fire: true,
            ..PlayerInput::idle()
        };
        let report = world.step(TickClock::new(10_000.0, FRAME), &forward);
        assert!(report.is_empty());
        assert_eq!(world.snapshot(), before);
        assert_eq!(world.sink().events.len(), events);
    }

    #[test]
    fn player_move_into_crate_is_reverted() {
        let mut config = MatchConfig::default();
        config.arena.obstacles = vec![crate::layout::ObstacleSpec::crate_at(Vec3::new(
            0.0, 1.0, -3.1,
        ))];
        let mut world = world_with(config);
        let forward = PlayerInput {
            forward: true,
            ..PlayerInput::idle()
        };
        world.step(TickClock::new(16.0, FRAME), &forward);
        assert_eq!(world.player().hull().position(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn player_pitch_is_clamped() {
        let mut world = world_with(MatchConfig::default());
        let raise = PlayerInput {
            turret_pitch_delta: -100.0,
            turret_yaw_delta: 3.0,
            ..PlayerInput::idle()
        };
        world.step(TickClock::new(16.0, FRAME), &raise);
        assert_eq!(world.player().turret_pitch(), -45.0);
        assert_eq!(world.player().turret_yaw(), 3.0);
    }

    #[test]
    fn dispose_unregisters_every_live_key() {
        let mut world = world_with(MatchConfig::default());
        world.step(TickClock::new(2000.0, FRAME), &fire_input());
        let sink = world.dispose();
        assert!(sink.live_keys().is_empty());
    }
}
