//! Large gate swung open or shut by external triggers.
//!
//! Each request runs a fixed-duration swing from the gate's current
//! orientation. A request toward the state already reached, or already
//! being approached, is ignored; a request in the other direction replaces
//! the swing in flight.

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::constants::motion;
use crate::motion::{offset_euler, Progress, TimedSwing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    state: GateState,
    rotation: Quat,
    closed_rotation: Quat,
    open_rotation: Quat,
    rate: f32,
    swing: Option<(TimedSwing, GateState)>,
}

impl Gate {
    pub fn new(rotation: Quat) -> Self {
        Self::with_swing(rotation, motion::OPEN_ANGLE_DEG, motion::SMOOTH_RATE)
    }

    pub fn with_swing(rotation: Quat, open_angle_deg: f32, rate: f32) -> Self {
        Self {
            state: GateState::Closed,
            rotation,
            closed_rotation: rotation,
            open_rotation: offset_euler(rotation, 0.0, open_angle_deg, 0.0),
            rate,
            swing: None,
        }
    }

    /// Last committed resting state.
    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    pub fn in_transition(&self) -> bool {
        self.swing.is_some()
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Seconds a full swing takes.
    pub fn swing_duration(&self) -> f32 {
        if self.rate > 0.0 {
            1.0 / self.rate
        } else {
            0.0
        }
    }

    /// Returns true if a new swing started.
    pub fn open(&mut self) -> bool {
        self.request(GateState::Open)
    }

    /// Returns true if a new swing started.
    pub fn close(&mut self) -> bool {
        self.request(GateState::Closed)
    }

    fn request(&mut self, target: GateState) -> bool {
        let heading = self.swing.as_ref().map(|(_, s)| *s).unwrap_or(self.state);
        if heading == target {
            return false;
        }
        let to = match target {
            GateState::Open => self.open_rotation,
            GateState::Closed => self.closed_rotation,
        };
        self.swing = Some((TimedSwing::new(self.rotation, to, self.rate), target));
        true
    }

    pub fn advance(&mut self, dt: f32) -> Progress {
        let Some((swing, target)) = self.swing.as_mut() else {
            return Progress::Done;
        };
        let (rotation, progress) = swing.advance(dt);
        self.rotation = rotation;
        if progress.is_done() {
            self.state = *target;
            self.swing = None;
        }
        progress
    }
}
