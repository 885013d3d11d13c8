use crate::body::RigidBody;
use crate::projectile::{Projectile, launch_direction};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

pub const HULL_HALF_EXTENTS: Vec3 = Vec3::new(1.5, 0.5, 2.0);
pub const TURRET_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 0.75, 1.0);
pub const CANNON_HALF_EXTENTS: Vec3 = Vec3::new(0.1, 0.1, 1.0);
pub const TURRET_OFFSET: Vec3 = Vec3::new(0.0, 0.25, 0.0);
pub const CANNON_RISE: f32 = 0.325;
pub const CANNON_ARM: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl SpawnPose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Which tank this is. Enemy indices follow the configured spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TankId {
    Player,
    Enemy(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TankPart {
    Hull,
    Turret,
    Cannon,
}

impl TankPart {
    pub const ALL: [TankPart; 3] = [TankPart::Hull, TankPart::Turret, TankPart::Cannon];
}

/// Hull, turret and cannon moved in lock-step. Every pose mutation rebuilds
/// all three bodies, so no partially updated tank is ever observable.
///
/// `body_yaw` turns counter-clockwise seen from above, with forward along -Z
/// at zero. `turret_yaw` is a world-frame azimuth that turns clockwise, and
/// `turret_pitch` is negative when the cannon is raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    hull: RigidBody,
    turret: RigidBody,
    cannon: RigidBody,
    body_yaw: f32,
    turret_yaw: f32,
    turret_pitch: f32,
    health: f32,
    last_fire_ms: f64,
    fire_interval_ms: f64,
}

impl Tank {
    pub fn new(spawn: SpawnPose, health: f32, fire_interval_ms: f64, created_at_ms: f64) -> Self {
        let hull = RigidBody::with_yaw(spawn.position, spawn.yaw, HULL_HALF_EXTENTS);
        let mut tank = Self {
            hull,
            turret: hull,
            cannon: hull,
            body_yaw: spawn.yaw,
            turret_yaw: 0.0,
            turret_pitch: 0.0,
            health,
            last_fire_ms: created_at_ms,
            fire_interval_ms,
        };
        tank.rebuild(spawn.position);
        tank
    }

    pub fn hull(&self) -> &RigidBody {
        &self.hull
    }

    pub fn turret(&self) -> &RigidBody {
        &self.turret
    }

    pub fn cannon(&self) -> &RigidBody {
        &self.cannon
    }

    pub fn part(&self, part: TankPart) -> &RigidBody {
        match part {
            TankPart::Hull => &self.hull,
            TankPart::Turret => &self.turret,
            TankPart::Cannon => &self.cannon,
        }
    }

    pub fn body_yaw(&self) -> f32 {
        self.body_yaw
    }

    pub fn turret_yaw(&self) -> f32 {
        self.turret_yaw
    }

    pub fn turret_pitch(&self) -> f32 {
        self.turret_pitch
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn last_fire_ms(&self) -> f64 {
        self.last_fire_ms
    }

    pub fn forward(&self) -> Vec3 {
        heading_vector(self.body_yaw)
    }

    pub fn rotate_body(&mut self, delta_yaw: f32) {
        self.body_yaw += delta_yaw;
        self.rebuild(self.hull.position());
    }

    pub fn move_forward(&mut self, distance: f32) {
        let target = self.hull.position() + self.forward() * distance;
        self.rebuild(target);
    }

    pub fn move_backward(&mut self, distance: f32) {
        self.move_forward(-distance);
    }

    pub fn aim_turret(&mut self, pitch: f32, yaw: f32) {
        self.turret_pitch = pitch;
        self.turret_yaw = yaw;
        self.rebuild(self.hull.position());
    }

    /// Tip of the cannon, where new projectiles appear.
    pub fn muzzle(&self) -> Vec3 {
        self.cannon.position()
            + launch_direction(self.turret_yaw, self.turret_pitch) * CANNON_HALF_EXTENTS.z
    }

    /// Fires if the cooldown has elapsed since the last shot (or since spawn).
    pub fn fire(&mut self, now_ms: f64) -> Option<Projectile> {
        if now_ms - self.last_fire_ms < self.fire_interval_ms {
            return None;
        }
        self.last_fire_ms = now_ms;
        Some(Projectile::new(
            self.muzzle(),
            self.turret_yaw,
            self.turret_pitch,
        ))
    }

    pub fn remove_health(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    fn rebuild(&mut self, hull_position: Vec3) {
        self.hull.set_transform(
            Mat4::from_translation(hull_position)
                * Mat4::from_rotation_y(self.body_yaw.to_radians())
                * Mat4::from_scale(HULL_HALF_EXTENTS),
        );

        let turret_position = hull_position + TURRET_OFFSET;
        let turret_rotation = Mat4::from_rotation_y((-self.turret_yaw).to_radians());
        self.turret.set_transform(
            Mat4::from_translation(turret_position)
                * turret_rotation
                * Mat4::from_scale(TURRET_HALF_EXTENTS),
        );

        let cannon_position = turret_position
            + Vec3::Y * CANNON_RISE
            + launch_direction(self.turret_yaw, self.turret_pitch) * CANNON_ARM;
        self.cannon.set_transform(
            Mat4::from_translation(cannon_position)
                * turret_rotation
                * Mat4::from_rotation_x((-self.turret_pitch).to_radians())
                * Mat4::from_scale(CANNON_HALF_EXTENTS),
        );
    }
}

/// Forward direction of a hull at `yaw_degrees`.
pub fn heading_vector(yaw_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}
