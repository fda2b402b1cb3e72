//! Door state machine.
//!
//! Doors cycle `Closed → Opening → Open → Closing → Closed`, driven only by
//! the toggle action. Toggling mid-swing reverses direction on the spot.
//! A locked door refuses to move until its key is in the inventory; the
//! first successful toggle past the lock reports the unlock exactly once.
//!
//! ```
//! use escape_logic::door::{Door, DoorToggle, MotionState};
//! use escape_logic::interaction::Reach;
//! use escape_logic::inventory::Inventory;
//! use glam::Quat;
//!
//! let mut inv = Inventory::new();
//! let mut door = Door::new(Quat::IDENTITY).with_lock("cellar");
//! assert_eq!(door.toggle(Reach::in_range(), &inv), DoorToggle::Locked);
//!
//! inv.add_key("cellar");
//! assert_eq!(
//!     door.toggle(Reach::in_range(), &inv),
//!     DoorToggle::Moving { state: MotionState::Opening, unlocked: true },
//! );
//! ```

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::constants::motion;
use crate::interaction::Reach;
use crate::inventory::Inventory;
use crate::motion::{offset_euler, Progress, SmoothApproach};

/// Motion state shared by swinging parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl MotionState {
    pub fn is_moving(self) -> bool {
        matches!(self, MotionState::Opening | MotionState::Closing)
    }

    /// The resting state this state ends in.
    pub fn terminal(self) -> MotionState {
        match self {
            MotionState::Opening | MotionState::Open => MotionState::Open,
            MotionState::Closing | MotionState::Closed => MotionState::Closed,
        }
    }

    /// State entered when toggled.
    pub fn toggled(self) -> MotionState {
        match self {
            MotionState::Closed => MotionState::Opening,
            MotionState::Opening => MotionState::Closing,
            MotionState::Open => MotionState::Closing,
            MotionState::Closing => MotionState::Opening,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLock {
    pub required_key: String,
    unlock_reported: bool,
}

impl DoorLock {
    pub fn new(required_key: impl Into<String>) -> Self {
        Self {
            required_key: required_key.into(),
            unlock_reported: false,
        }
    }
}

/// Outcome of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorToggle {
    /// Viewer too far away; nothing happened.
    OutOfReach,
    /// Required key missing; nothing moved.
    Locked,
    /// The door is now moving. `unlocked` is true on the first toggle that
    /// got past the lock.
    Moving { state: MotionState, unlocked: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    state: MotionState,
    rotation: Quat,
    closed_rotation: Quat,
    open_rotation: Quat,
    approach: SmoothApproach,
    lock: Option<DoorLock>,
}

impl Door {
    /// A closed, unlocked door resting at `rotation` that swings the
    /// default angle around its vertical axis.
    pub fn new(rotation: Quat) -> Self {
        Self::with_swing(rotation, motion::OPEN_ANGLE_DEG, motion::SMOOTH_RATE)
    }

    pub fn with_swing(rotation: Quat, open_angle_deg: f32, rate: f32) -> Self {
        Self {
            state: MotionState::Closed,
            rotation,
            closed_rotation: rotation,
            open_rotation: offset_euler(rotation, 0.0, open_angle_deg, 0.0),
            approach: SmoothApproach::new(rate),
            lock: None,
        }
    }

    pub fn with_lock(mut self, required_key: impl Into<String>) -> Self {
        self.lock = Some(DoorLock::new(required_key));
        self
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Still refusing to move: has a lock that no toggle has got past yet.
    pub fn is_locked(&self) -> bool {
        self.lock.as_ref().is_some_and(|l| !l.unlock_reported)
    }

    pub fn has_lock(&self) -> bool {
        self.lock.is_some()
    }

    pub fn required_key(&self) -> Option<&str> {
        self.lock.as_ref().map(|l| l.required_key.as_str())
    }

    pub fn toggle(&mut self, reach: Reach, inventory: &Inventory) -> DoorToggle {
        if !reach.in_range {
            return DoorToggle::OutOfReach;
        }

        let mut unlocked = false;
        if let Some(lock) = self.lock.as_mut() {
            if !inventory.has_key(&lock.required_key) {
                return DoorToggle::Locked;
            }
            if !lock.unlock_reported {
                lock.unlock_reported = true;
                unlocked = true;
            }
        }

        self.state = self.state.toggled();
        DoorToggle::Moving {
            state: self.state,
            unlocked,
        }
    }

    fn target(&self) -> Quat {
        match self.state {
            MotionState::Opening | MotionState::Open => self.open_rotation,
            MotionState::Closing | MotionState::Closed => self.closed_rotation,
        }
    }

    /// Advance the swing by `dt` seconds. Returns `Done` when resting.
    pub fn advance(&mut self, dt: f32) -> Progress {
        if !self.state.is_moving() {
            return Progress::Done;
        }
        let target = self.target();
        let progress = self.approach.step(&mut self.rotation, target, dt);
        if progress.is_done() {
            self.state = self.state.terminal();
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::angle_deg;

    fn settle(door: &mut Door) -> usize {
        let mut frames = 0;
        while !door.advance(1.0 / 60.0).is_done() {
            frames += 1;
            assert!(frames < 10_000);
        }
        frames
    }

    #[test]
    fn locked_door_never_moves_without_key() {
        let inv = Inventory::new();
        let mut door = Door::new(Quat::IDENTITY).with_lock("cellar");
        for _ in 0..50 {
            assert_eq!(door.toggle(Reach::in_range(), &inv), DoorToggle::Locked);
            assert_eq!(door.state(), MotionState::Closed);
        }
    }

    #[test]
    fn unlock_reported_once() {
        let mut inv = Inventory::new();
        inv.add_key("cellar");
        let mut door = Door::new(Quat::IDENTITY).with_lock("cellar");
        let mut unlock_count = 0;
        for _ in 0..6 {
            if let DoorToggle::Moving { unlocked: true, .. } = door.toggle(Reach::in_range(), &inv) {
                unlock_count += 1;
            }
            settle(&mut door);
        }
        assert_eq!(unlock_count, 1);
    }

    #[test]
    fn unlocked_after_first_keyed_toggle() {
        let mut inv = Inventory::new();
        let mut door = Door::new(Quat::IDENTITY).with_lock("cellar");
        assert!(door.is_locked());
        door.toggle(Reach::in_range(), &inv);
        assert!(door.is_locked());

        inv.add_key("cellar");
        door.toggle(Reach::in_range(), &inv);
        assert!(!door.is_locked());
        assert!(door.has_lock());
        assert_eq!(door.required_key(), Some("cellar"));
    }

    #[test]
    fn unlocked_door_never_locked() {
        let door = Door::new(Quat::IDENTITY);
        assert!(!door.is_locked());
        assert!(!door.has_lock());
    }

    #[test]
    fn toggle_from_rest_heads_to_opposite() {
        let inv = Inventory::new();
        let mut door = Door::new(Quat::IDENTITY);
        door.toggle(Reach::in_range(), &inv);
        assert_eq!(door.state(), MotionState::Opening);
        settle(&mut door);
        assert_eq!(door.state(), MotionState::Open);
        assert!((angle_deg(door.rotation(), Quat::IDENTITY) - 90.0).abs() < 0.01);

        door.toggle(Reach::in_range(), &inv);
        assert_eq!(door.state(), MotionState::Closing);
        settle(&mut door);
        assert_eq!(door.state(), MotionState::Closed);
        assert_eq!(door.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn toggle_mid_swing_reverses() {
        let inv = Inventory::new();
        let mut door = Door::new(Quat::IDENTITY);
        door.toggle(Reach::in_range(), &inv);
        for _ in 0..10 {
            door.advance(1.0 / 60.0);
        }
        assert_eq!(door.state(), MotionState::Opening);
        door.toggle(Reach::in_range(), &inv);
        assert_eq!(door.state(), MotionState::Closing);
        settle(&mut door);
        assert_eq!(door.state(), MotionState::Closed);
    }

    #[test]
    fn out_of_reach_ignored() {
        let inv = Inventory::new();
        let mut door = Door::new(Quat::IDENTITY);
        assert_eq!(door.toggle(Reach::out_of_range(), &inv), DoorToggle::OutOfReach);
        assert_eq!(door.state(), MotionState::Closed);
    }

    #[test]
    fn resting_door_reports_done() {
        let mut door = Door::new(Quat::IDENTITY);
        assert_eq!(door.advance(0.5), Progress::Done);
        assert_eq!(door.rotation(), Quat::IDENTITY);
    }
}
