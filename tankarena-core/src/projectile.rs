use crate::body::RigidBody;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

pub const PROJECTILE_HALF_EXTENT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ballistics {
    pub speed: f32,
    pub gravity: f32,
    pub ground_height: f32,
    pub damage: f32,
    pub hit_radius: f32,
    pub hit_sample_offset: f32,
}

impl Default for Ballistics {
    fn default() -> Self {
        Self {
            speed: 10.0,
            gravity: 1.0,
            ground_height: 0.0,
            damage: 20.0,
            hit_radius: 1.25,
            hit_sample_offset: 1.0,
        }
    }
}

/// Unit launch direction for a yaw/pitch pair in degrees. Pitch is negative
/// when aiming up.
pub fn launch_direction(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    Vec3::new(
        (-pitch).cos() * yaw.sin(),
        (-pitch).sin(),
        -(-pitch).cos() * yaw.cos(),
    )
}

/// A ballistic point mass. Its position is a closed-form function of the
/// launch parameters and `time_alive`, never integrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    origin: Vec3,
    launch_yaw: f32,
    launch_pitch: f32,
    time_alive: f32,
    body: RigidBody,
}

impl Projectile {
    pub fn new(origin: Vec3, launch_yaw: f32, launch_pitch: f32) -> Self {
        Self {
            origin,
            launch_yaw,
            launch_pitch,
            time_alive: 0.0,
            body: RigidBody::axis_aligned(origin, Vec3::splat(PROJECTILE_HALF_EXTENT)),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn launch_yaw(&self) -> f32 {
        self.launch_yaw
    }

    pub fn launch_pitch(&self) -> f32 {
        self.launch_pitch
    }

    pub fn time_alive(&self) -> f32 {
        self.time_alive
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn position_at(&self, t: f32, speed: f32, gravity: f32) -> Vec3 {
        let yaw = self.launch_yaw.to_radians();
        let pitch = self.launch_pitch.to_radians();
        Vec3::new(
            self.origin.x + (-pitch).cos() * yaw.sin() * speed * t,
            self.origin.y + speed * t * (-pitch).sin() - 0.5 * gravity * t * t,
            self.origin.z - (-pitch).cos() * yaw.cos() * speed * t,
        )
    }

    /// Adds `dt` seconds to the flight time and moves the visual body to the
    /// resulting position.
    pub fn advance(&mut self, dt: f32, ballistics: &Ballistics) -> Vec3 {
        self.time_alive += dt;
        let position = self.position_at(self.time_alive, ballistics.speed, ballistics.gravity);
        self.body.set_transform(
            Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(PROJECTILE_HALF_EXTENT)),
        );
        position
    }

    pub fn below_ground(&self, ballistics: &Ballistics) -> bool {
        self.position().y < ballistics.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_is_reproducible_from_time_alone() {
        let shot = Projectile::new(Vec3::new(1.0, 2.0, -3.0), 33.0, -12.0);
        let first = shot.position_at(2.75, 10.0, 1.0);
        let second = shot.position_at(2.75, 10.0, 1.0);
        assert_eq!(first.to_array(), second.to_array());
    }

    #[test]
    fn advancing_in_steps_matches_closed_form() {
        let ballistics = Ballistics::default();
        let mut shot = Projectile::new(Vec3::new(0.0, 2.0, 0.0), 20.0, -15.0);
        for _ in 0..4 {
            shot.advance(0.25, &ballistics);
        }
        let expected = shot.position_at(1.0, ballistics.speed, ballistics.gravity);
        assert_eq!(shot.position(), expected);
        assert_relative_eq!(shot.time_alive(), 1.0);
    }

    #[test]
    fn level_shot_only_falls() {
        let shot = Projectile::new(Vec3::new(0.0, 5.0, 0.0), 0.0, 0.0);
        let mut previous = shot.position_at(0.0, 10.0, 1.0).y;
        for step in 1..200 {
            let y = shot.position_at(step as f32 * 0.05, 10.0, 1.0).y;
            assert!(y <= previous);
            previous = y;
        }
    }

    #[test]
    fn zero_yaw_flies_toward_negative_z() {
        let shot = Projectile::new(Vec3::ZERO, 0.0, 0.0);
        let position = shot.position_at(1.0, 10.0, 0.0);
        assert_relative_eq!(position.x, 0.0);
        assert_relative_eq!(position.z, -10.0);
    }

    #[test]
    fn negative_pitch_climbs() {
        let shot = Projectile::new(Vec3::ZERO, 0.0, -30.0);
        let position = shot.position_at(0.5, 10.0, 1.0);
        assert!(position.y > 0.0);
    }

    #[test]
    fn launch_direction_matches_motion_law() {
        let shot = Projectile::new(Vec3::ZERO, 63.0, -21.0);
        let displaced = shot.position_at(1.0, 1.0, 0.0);
        let direction = launch_direction(63.0, -21.0);
        assert_relative_eq!(displaced.x, direction.x, epsilon = 1e-6);
        assert_relative_eq!(displaced.y, direction.y, epsilon = 1e-6);
        assert_relative_eq!(displaced.z, direction.z, epsilon = 1e-6);
    }

    #[test]
    fn lands_below_ground_threshold() {
        let ballistics = Ballistics::default();
        let mut shot = Projectile::new(Vec3::new(0.0, 0.5, 0.0), 0.0, 0.0);
        assert!(!shot.below_ground(&ballistics));
        shot.advance(2.0, &ballistics);
        assert!(shot.below_ground(&ballistics));
    }
}
