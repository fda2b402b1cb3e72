//! Rotation stepping for moving parts.
//!
//! Two flavours of multi-frame motion, both advanced explicitly by the
//! caller once per tick:
//!
//! - [`SmoothApproach`]: exponential slerp toward a target, snapping once
//!   the angular distance drops under an epsilon (doors, levers).
//! - [`TimedSwing`]: fixed-duration slerp from a start to an end
//!   orientation, parameterised by `t` in `[0, 1]` (gates).

use glam::{EulerRot, Quat};
use serde::{Deserialize, Serialize};

use crate::constants::motion;

/// Result of advancing an animation by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    InProgress,
    Done,
}

impl Progress {
    pub fn is_done(self) -> bool {
        self == Progress::Done
    }
}

/// Offset an orientation by euler angles (degrees) the way an editor would:
/// decompose into yaw/pitch/roll, add, recompose.
pub fn offset_euler(base: Quat, pitch_deg: f32, yaw_deg: f32, roll_deg: f32) -> Quat {
    let (yaw, pitch, roll) = base.to_euler(EulerRot::YXZ);
    Quat::from_euler(
        EulerRot::YXZ,
        yaw + yaw_deg.to_radians(),
        pitch + pitch_deg.to_radians(),
        roll + roll_deg.to_radians(),
    )
    .normalize()
}

/// Angular distance between two orientations in degrees.
pub fn angle_deg(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Exponential approach toward a target orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothApproach {
    /// Fraction of the remaining arc covered per second.
    pub rate: f32,
    /// Snap threshold in degrees.
    pub epsilon_deg: f32,
}

impl Default for SmoothApproach {
    fn default() -> Self {
        Self {
            rate: motion::SMOOTH_RATE,
            epsilon_deg: motion::ARRIVAL_EPSILON_DEG,
        }
    }
}

impl SmoothApproach {
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Move `current` toward `target`. Snaps and reports `Done` once within
    /// the epsilon.
    pub fn step(&self, current: &mut Quat, target: Quat, dt: f32) -> Progress {
        let s = (dt * self.rate).clamp(0.0, 1.0);
        *current = current.slerp(target, s).normalize();
        if angle_deg(*current, target) < self.epsilon_deg {
            *current = target;
            Progress::Done
        } else {
            Progress::InProgress
        }
    }
}

/// Fixed-duration swing between two orientations. Duration is `1 / rate`
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSwing {
    pub from: Quat,
    pub to: Quat,
    pub rate: f32,
    t: f32,
}

impl TimedSwing {
    pub fn new(from: Quat, to: Quat, rate: f32) -> Self {
        Self { from, to, rate, t: 0.0 }
    }

    /// Interpolation parameter in `[0, 1]`.
    pub fn t(&self) -> f32 {
        self.t
    }

    /// Advance by `dt` seconds and return the orientation for this tick.
    /// The final tick returns `to` exactly.
    pub fn advance(&mut self, dt: f32) -> (Quat, Progress) {
        self.t += dt.max(0.0) * self.rate;
        if self.t >= 1.0 || self.rate <= 0.0 {
            self.t = 1.0;
            (self.to, Progress::Done)
        } else {
            (self.from.slerp(self.to, self.t).normalize(), Progress::InProgress)
        }
    }
}
