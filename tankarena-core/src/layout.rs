use fastrand::Rng;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::RigidBody;
use crate::config::ArenaConfig;

const ATTEMPTS_PER_CRATE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl ObstacleSpec {
    /// A unit crate (half extent 1) centred at `position`.
    pub fn crate_at(position: Vec3) -> Self {
        Self {
            position,
            half_extents: Vec3::ONE,
        }
    }

    pub fn body(&self) -> RigidBody {
        RigidBody::axis_aligned(self.position, self.half_extents)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSpec {
    pub seed: u64,
    pub count: usize,
    pub extent: f32,
    pub half_size: f32,
    pub clearance: f32,
}

impl Default for ScatterSpec {
    fn default() -> Self {
        Self {
            seed: 7,
            count: 12,
            extent: 60.0,
            half_size: 1.0,
            clearance: 8.0,
        }
    }
}

/// Places up to `scatter.count` crates resting on the ground inside
/// `[-extent, extent]` on both planar axes. Candidates within `clearance` of
/// any spawn point are rejected; a bounded number of draws keeps crowded
/// arenas from looping forever, so fewer crates may come back.
pub fn scatter_obstacles(scatter: &ScatterSpec, spawn_points: &[Vec3]) -> Vec<ObstacleSpec> {
    let mut rng = Rng::with_seed(scatter.seed);
    let mut placed = Vec::with_capacity(scatter.count);
    let max_attempts = scatter.count.saturating_mul(ATTEMPTS_PER_CRATE);

    for _ in 0..max_attempts {
        if placed.len() == scatter.count {
            break;
        }
        let x = (rng.f32() * 2.0 - 1.0) * scatter.extent;
        let z = (rng.f32() * 2.0 - 1.0) * scatter.extent;
        let candidate = Vec2::new(x, z);

        let crowds_spawn = spawn_points
            .iter()
            .any(|spawn| candidate.distance(Vec2::new(spawn.x, spawn.z)) < scatter.clearance);
        if crowds_spawn {
            continue;
        }

        placed.push(ObstacleSpec {
            position: Vec3::new(x, scatter.half_size, z),
            half_extents: Vec3::splat(scatter.half_size),
        });
    }

    placed
}

/// Fixed obstacles followed by the scattered ones, in registration order.
pub fn obstacle_bodies(arena: &ArenaConfig) -> Vec<RigidBody> {
    let mut specs = arena.obstacles.clone();
    if let Some(scatter) = &arena.scatter {
        let spawns: Vec<Vec3> = std::iter::once(arena.player_spawn.position)
            .chain(arena.enemy_spawns.iter().map(|spawn| spawn.position))
            .collect();
        specs.extend(scatter_obstacles(scatter, &spawns));
    }
    specs.iter().map(ObstacleSpec::body).collect()
}
