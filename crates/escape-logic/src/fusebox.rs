//! Fusebox: accepts one specific fuse, once.
//!
//! While awaiting its fuse and in range, the box prompts either for the
//! missing fuse or for placing it. Placing is absorbing: the box reports
//! placed forever after and stops prompting.

use serde::{Deserialize, Serialize};

use crate::constants::prompts;
use crate::interaction::Reach;
use crate::inventory::Inventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuseboxState {
    AwaitingFuse,
    Placed,
}

/// Outcome of a place attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusePlacement {
    OutOfReach,
    /// The required fuse has not been collected.
    MissingFuse,
    AlreadyPlaced,
    /// Fuse placed. The caller lights the in-box fuse and retires the loose
    /// collectible.
    Placed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fusebox {
    pub required_fuse: String,
    state: FuseboxState,
}

impl Fusebox {
    pub fn new(required_fuse: impl Into<String>) -> Self {
        Self {
            required_fuse: required_fuse.into(),
            state: FuseboxState::AwaitingFuse,
        }
    }

    pub fn state(&self) -> FuseboxState {
        self.state
    }

    pub fn is_fuse_placed(&self) -> bool {
        self.state == FuseboxState::Placed
    }

    pub fn prompt(&self, reach: Reach, inventory: &Inventory) -> Option<&'static str> {
        if self.is_fuse_placed() || !reach.in_range {
            return None;
        }
        if inventory.has_fuse(&self.required_fuse) {
            Some(prompts::PLACE_FUSE)
        } else {
            Some(prompts::NEED_FUSE)
        }
    }

    pub fn place(&mut self, reach: Reach, inventory: &Inventory) -> FusePlacement {
        if self.is_fuse_placed() {
            return FusePlacement::AlreadyPlaced;
        }
        if !reach.in_range {
            return FusePlacement::OutOfReach;
        }
        if !inventory.has_fuse(&self.required_fuse) {
            return FusePlacement::MissingFuse;
        }
        self.state = FuseboxState::Placed;
        FusePlacement::Placed
    }
}
