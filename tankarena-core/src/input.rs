use serde::{Deserialize, Serialize};

/// Player controls sampled once per tick by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
    /// Degrees added to the turret azimuth this tick.
    pub turret_yaw_delta: f32,
    /// Degrees added to the cannon pitch this tick, before clamping.
    pub turret_pitch_delta: f32,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Signed drive direction; backward wins when both keys are held.
    pub fn drive(&self) -> f32 {
        if self.backward {
            -1.0
        } else if self.forward {
            1.0
        } else {
            0.0
        }
    }

    /// Signed hull turn direction (positive is left); left wins when both
    /// keys are held.
    pub fn turn(&self) -> f32 {
        if self.turn_left {
            1.0
        } else if self.turn_right {
            -1.0
        } else {
            0.0
        }
    }
}

/// Time supplied by the driver for one tick. The core never reads a clock of
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    pub now_ms: f64,
    pub elapsed_secs: f32,
}

impl TickClock {
    pub fn new(now_ms: f64, elapsed_secs: f32) -> Self {
        Self {
            now_ms,
            elapsed_secs,
        }
    }

    /// The clock `elapsed_secs` later.
    pub fn advanced(self, elapsed_secs: f32) -> Self {
        Self {
            now_ms: self.now_ms + f64::from(elapsed_secs) * 1000.0,
            elapsed_secs,
        }
    }
}
