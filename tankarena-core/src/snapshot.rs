use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::match_state::MatchState;
use crate::tank::TankId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: TankId,
    pub position: Vec3,
    pub body_yaw: f32,
    pub turret_yaw: f32,
    pub turret_pitch: f32,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub handle: Handle,
    pub owner: TankId,
    pub position: Vec3,
    pub time_alive: f32,
}

/// Read-only copy of a world after a finished tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub match_state: MatchState,
    pub tanks: Vec<TankSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn tank(&self, id: TankId) -> Option<&TankSnapshot> {
        self.tanks.iter().find(|tank| tank.id == id)
    }
}
