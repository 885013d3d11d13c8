use crate::body::RigidBody;
use crate::config::MatchConfig;
use crate::movement::{Maneuver, try_maneuver};
use crate::projectile::{Projectile, launch_direction};
use crate::tank::Tank;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub keep_distance_base: f32,
    pub keep_distance_health_factor: f32,
    pub max_attack_range: f32,
    pub push_back_factor: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            keep_distance_base: 30.0,
            keep_distance_health_factor: 0.5,
            max_attack_range: 40.0,
            push_back_factor: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Positioning {
    Advance,
    Retreat,
}

/// What an AI tank can see of the world on its turn.
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    pub player_hull: &'a RigidBody,
    pub player_health: f32,
    pub blockers: &'a [RigidBody],
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiDecision {
    pub positioning: Positioning,
    pub turn: Maneuver,
    pub drive: Maneuver,
    pub blocked: bool,
    pub shot: Option<Projectile>,
}

pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Smallest absolute difference between two headings, in degrees.
pub fn heading_gap(a: f32, b: f32) -> f32 {
    ((b - a + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Hull yaw that points the hull's forward axis at `target`.
pub fn bearing_to(from: Vec3, target: Vec3) -> f32 {
    let dx = target.x - from.x;
    let dz = target.z - from.z;
    (-dx).atan2(-dz).to_degrees()
}

pub fn keep_distance(tuning: &AiTuning, player_health: f32, own_health: f32) -> f32 {
    tuning.keep_distance_base + tuning.keep_distance_health_factor * (player_health - own_health)
}

/// Launch elevation in degrees that lands a shot `distance` away on flat
/// ground, from `sin(2θ) = d·g / v²`. `None` when the target is out of reach.
pub fn firing_elevation(distance: f32, speed: f32, gravity: f32) -> Option<f32> {
    let sin_two_theta = distance * gravity / (speed * speed);
    let theta = sin_two_theta.asin().to_degrees() / 2.0;
    if theta.is_nan() { None } else { Some(theta) }
}

/// Runs one decision cycle for an AI tank: positioning, collision-checked
/// movement, turret tracking, elevation, and firing.
pub fn think(tank: &mut Tank, view: &AiView<'_>, config: &MatchConfig, now_ms: f64) -> AiDecision {
    let rates = &config.tank;
    let tuning = &config.ai;
    let target = view.player_hull.position();
    let distance = planar_distance(target, tank.hull().position());

    let positioning = if distance > keep_distance(tuning, view.player_health, tank.health()) {
        Positioning::Advance
    } else {
        Positioning::Retreat
    };

    let turn = match (positioning, turn_toward(tank, target, rates.turn_rate)) {
        (_, None) => rates.turn_rate,
        (Positioning::Advance, Some(step)) => step,
        (Positioning::Retreat, Some(step)) => -step,
    };
    let turn = Maneuver::Rotate(turn);
    let turn_stood = try_maneuver(tank, turn, view.blockers, tuning.push_back_factor);

    let forward_closes = {
        let stepped = tank.hull().position() + tank.forward() * rates.move_rate;
        planar_distance(target, stepped) < planar_distance(target, tank.hull().position())
    };
    let drive = match (positioning, forward_closes) {
        (Positioning::Advance, true) | (Positioning::Retreat, false) => {
            Maneuver::Advance(rates.move_rate)
        }
        _ => Maneuver::Advance(-rates.move_rate),
    };
    let drive_stood = try_maneuver(tank, drive, view.blockers, tuning.push_back_factor);

    let yaw = track_azimuth(tank, target, rates.turret_yaw_rate);
    let pitch = match firing_elevation(distance, config.ballistics.speed, config.ballistics.gravity)
    {
        Some(theta) => {
            let step = (-theta - tank.turret_pitch())
                .clamp(-rates.turret_pitch_rate, rates.turret_pitch_rate);
            tank.turret_pitch() + step
        }
        None => tank.turret_pitch(),
    };
    tank.aim_turret(pitch, yaw);

    let shot = if distance < tuning.max_attack_range {
        tank.fire(now_ms)
    } else {
        None
    };

    AiDecision {
        positioning,
        turn,
        drive,
        blocked: !(turn_stood && drive_stood),
        shot,
    }
}

/// Signed turn step that brings the hull heading closer to the bearing of
/// `target`, or `None` when both sides leave the same gap. Callers turn left
/// on a tie whichever way they are positioning.
fn turn_toward(tank: &Tank, target: Vec3, turn_rate: f32) -> Option<f32> {
    let bearing = bearing_to(tank.hull().position(), target);
    let left = heading_gap(tank.body_yaw() + turn_rate, bearing);
    let right = heading_gap(tank.body_yaw() - turn_rate, bearing);
    if right < left {
        Some(-turn_rate)
    } else if left < right {
        Some(turn_rate)
    } else {
        None
    }
}

/// Steps the turret azimuth by `rate` toward `target`, holding when neither
/// direction reduces the squared aim error.
fn track_azimuth(tank: &Tank, target: Vec3, rate: f32) -> f32 {
    let pivot = tank.turret().position();
    let aim_error = |yaw: f32| {
        let aim = pivot + launch_direction(yaw, 0.0);
        Vec2::new(aim.x - target.x, aim.z - target.z).length_squared()
    };

    let current = tank.turret_yaw();
    let now = aim_error(current);
    if aim_error(current + rate) < now {
        current + rate
    } else if aim_error(current - rate) < now {
        current - rate
    } else {
        current
    }
}
