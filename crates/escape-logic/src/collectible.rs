//! Pick-up items: keys, fuses and plain props.
//!
//! A collectible is taken when the viewer is in range, the item is the
//! outlined target, and the pickup action fires. Collection is one-way.
//! A collectible can also be switched off by another component (a fusebox
//! retiring the loose fuse it consumed); a disabled collectible ignores
//! pickup and shows no prompt.

use serde::{Deserialize, Serialize};

use crate::constants::prompts;
use crate::interaction::Reach;
use crate::inventory::{Inventory, ItemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleState {
    Available,
    Collected,
}

/// Outcome of a pickup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pickup {
    /// Out of range, not targeted, disabled or already taken.
    Ignored,
    /// Taken. `registered` is true if the id was new to the inventory.
    Collected { kind: ItemKind, id: String, registered: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: String,
    pub kind: ItemKind,
    state: CollectibleState,
    enabled: bool,
}

impl Collectible {
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            state: CollectibleState::Available,
            enabled: true,
        }
    }

    pub fn key(id: impl Into<String>) -> Self {
        Self::new(ItemKind::Key, id)
    }

    pub fn fuse(id: impl Into<String>) -> Self {
        Self::new(ItemKind::Fuse, id)
    }

    pub fn plain() -> Self {
        Self::new(ItemKind::Plain, "")
    }

    pub fn state(&self) -> CollectibleState {
        self.state
    }

    pub fn is_collected(&self) -> bool {
        self.state == CollectibleState::Collected
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    fn can_pick_up(&self, reach: Reach) -> bool {
        self.enabled && !self.is_collected() && reach.in_range && reach.highlighted
    }

    pub fn prompt(&self, reach: Reach) -> Option<&'static str> {
        self.can_pick_up(reach).then_some(prompts::PICK_UP)
    }

    pub fn collect(&mut self, reach: Reach, inventory: &mut Inventory) -> Pickup {
        if !self.can_pick_up(reach) {
            return Pickup::Ignored;
        }
        self.state = CollectibleState::Collected;
        let registered = inventory.add(self.kind, &self.id);
        Pickup::Collected {
            kind: self.kind,
            id: self.id.clone(),
            registered,
        }
    }
}
