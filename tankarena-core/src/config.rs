use crate::ai::AiTuning;
use crate::layout::{ObstacleSpec, ScatterSpec};
use crate::projectile::Ballistics;
use crate::tank::SpawnPose;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub const HULL_REST_HEIGHT: f32 = 0.5;

/// Per-tick rates are in world units or degrees per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    pub move_rate: f32,
    pub turn_rate: f32,
    pub turret_yaw_rate: f32,
    pub turret_pitch_rate: f32,
    pub fire_interval_ms: f64,
    pub max_health: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            move_rate: 0.15,
            turn_rate: 1.5,
            turret_yaw_rate: 0.5,
            turret_pitch_rate: 0.25,
            fire_interval_ms: 2000.0,
            max_health: 100.0,
            min_pitch: -45.0,
            max_pitch: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub respawn_budget: u32,
    pub kill_score: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            respawn_budget: 3,
            kill_score: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub player_spawn: SpawnPose,
    pub enemy_spawns: Vec<SpawnPose>,
    pub obstacles: Vec<ObstacleSpec>,
    pub scatter: Option<ScatterSpec>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player_spawn: SpawnPose::new(Vec3::new(0.0, HULL_REST_HEIGHT, 0.0), 0.0),
            enemy_spawns: vec![SpawnPose::new(Vec3::new(0.0, HULL_REST_HEIGHT, -120.0), 0.0)],
            obstacles: vec![
                ObstacleSpec::crate_at(Vec3::new(-5.0, 1.0, -10.0)),
                ObstacleSpec::crate_at(Vec3::new(5.0, 1.0, -10.0)),
            ],
            scatter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub tank: TankTuning,
    pub ballistics: Ballistics,
    pub ai: AiTuning,
    pub rules: RulesConfig,
    pub arena: ArenaConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(message) => write!(f, "failed to parse match config: {}", message),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {}: {}", field, reason),
        }
    }
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl MatchConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::from)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ballistics.speed > 0.0) {
            return Err(ConfigError::invalid("ballistics.speed", "must be positive"));
        }
        if self.ballistics.gravity < 0.0 {
            return Err(ConfigError::invalid("ballistics.gravity", "must not be negative"));
        }
        if self.tank.fire_interval_ms < 0.0 {
            return Err(ConfigError::invalid("tank.fire_interval_ms", "must not be negative"));
        }
        if !(self.tank.max_health > 0.0) {
            return Err(ConfigError::invalid("tank.max_health", "must be positive"));
        }
        let rates = [
            ("tank.move_rate", self.tank.move_rate),
            ("tank.turn_rate", self.tank.turn_rate),
            ("tank.turret_yaw_rate", self.tank.turret_yaw_rate),
            ("tank.turret_pitch_rate", self.tank.turret_pitch_rate),
        ];
        for (field, rate) in rates {
            if !(rate >= 0.0) || !rate.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite and not negative"));
            }
        }
        if !self.tank.min_pitch.is_finite() {
            return Err(ConfigError::invalid("tank.min_pitch", "must be finite"));
        }
        if !self.tank.max_pitch.is_finite() {
            return Err(ConfigError::invalid("tank.max_pitch", "must be finite"));
        }
        if self.tank.min_pitch > self.tank.max_pitch {
            return Err(ConfigError::invalid("tank.min_pitch", "must not exceed max_pitch"));
        }
        if self.arena.enemy_spawns.is_empty() {
            return Err(ConfigError::invalid("arena.enemy_spawns", "needs at least one spawn"));
        }
        if !(self.ai.push_back_factor > 0.0) {
            return Err(ConfigError::invalid("ai.push_back_factor", "must be positive"));
        }
        Ok(())
    }
}
