use crate::body::RigidBody;
use crate::collision::obb_overlap;
use crate::tank::Tank;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maneuver {
    Rotate(f32),
    Advance(f32),
}

impl Maneuver {
    pub fn apply(self, tank: &mut Tank) {
        match self {
            Maneuver::Rotate(delta) => tank.rotate_body(delta),
            Maneuver::Advance(distance) => tank.move_forward(distance),
        }
    }

    /// The opposite maneuver, `factor` times as large.
    pub fn countered(self, factor: f32) -> Self {
        match self {
            Maneuver::Rotate(delta) => Maneuver::Rotate(-delta * factor),
            Maneuver::Advance(distance) => Maneuver::Advance(-distance * factor),
        }
    }
}

pub fn hull_collides(tank: &Tank, blockers: &[RigidBody]) -> bool {
    blockers
        .iter()
        .any(|blocker| obb_overlap(tank.hull(), blocker))
}

/// Applies `maneuver`, then checks the hull against `blockers`. On contact the
/// tank is pushed back by the countered maneuver scaled by `push_back_factor`.
/// Returns true when the maneuver stood.
pub fn try_maneuver(
    tank: &mut Tank,
    maneuver: Maneuver,
    blockers: &[RigidBody],
    push_back_factor: f32,
) -> bool {
    maneuver.apply(tank);
    if !hull_collides(tank, blockers) {
        return true;
    }
    log::trace!("maneuver {:?} blocked, pushing back x{}", maneuver, push_back_factor);
    maneuver.countered(push_back_factor).apply(tank);
    false
}
