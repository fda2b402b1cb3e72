//! Lever: a one-shot pull gated on a live fusebox.
//!
//! The lever eases toward its up or down orientation every tick. Pulling is
//! accepted once, from up, and only after the linked fusebox reports its
//! fuse placed. The caller turns on the indicator light and opens the gate.

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::constants::{motion, prompts};
use crate::interaction::Reach;
use crate::motion::{offset_euler, Progress, SmoothApproach};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverState {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverPull {
    OutOfReach,
    /// Fusebox has no fuse yet.
    NoPower,
    AlreadyPulled,
    Pulled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lever {
    state: LeverState,
    rotation: Quat,
    up_rotation: Quat,
    down_rotation: Quat,
    approach: SmoothApproach,
}

impl Lever {
    pub fn new(rotation: Quat) -> Self {
        Self::with_throw(rotation, motion::LEVER_ANGLE_DEG, motion::SMOOTH_RATE)
    }

    /// `angle_deg` is the forward tip around the lever's pitch axis.
    pub fn with_throw(rotation: Quat, angle_deg: f32, rate: f32) -> Self {
        Self {
            state: LeverState::Up,
            rotation,
            up_rotation: rotation,
            down_rotation: offset_euler(rotation, angle_deg, 0.0, 0.0),
            approach: SmoothApproach::new(rate),
        }
    }

    pub fn state(&self) -> LeverState {
        self.state
    }

    pub fn is_down(&self) -> bool {
        self.state == LeverState::Down
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn prompt(&self, reach: Reach, fuse_placed: bool) -> Option<&'static str> {
        if !reach.in_range || self.is_down() {
            return None;
        }
        if fuse_placed {
            Some(prompts::PULL_LEVER)
        } else {
            Some(prompts::LEVER_NO_FUSE)
        }
    }

    pub fn pull(&mut self, reach: Reach, fuse_placed: bool) -> LeverPull {
        if self.is_down() {
            return LeverPull::AlreadyPulled;
        }
        if !reach.in_range {
            return LeverPull::OutOfReach;
        }
        if !fuse_placed {
            return LeverPull::NoPower;
        }
        self.state = LeverState::Down;
        LeverPull::Pulled
    }

    pub fn advance(&mut self, dt: f32) -> Progress {
        let target = match self.state {
            LeverState::Up => self.up_rotation,
            LeverState::Down => self.down_rotation,
        };
        if self.rotation == target {
            return Progress::Done;
        }
        self.approach.step(&mut self.rotation, target, dt)
    }
}
