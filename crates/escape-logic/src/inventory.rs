//! Collected keys and fuses.
//!
//! The inventory is owned by whoever runs the level and handed by reference
//! to the interactables that gate on it. Inserts are idempotent and nothing
//! is ever removed; an empty identifier is a legal query that never matches.
//!
//! ```
//! use escape_logic::inventory::Inventory;
//!
//! let mut inv = Inventory::new();
//! inv.add_fuse("F1");
//! inv.add_fuse("F1");
//! assert!(inv.has_fuse("F1"));
//! assert_eq!(inv.fuse_count(), 1);
//! assert!(!inv.has_key("F1"));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// What kind of item a collectible registers as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Picked up but not tracked.
    #[default]
    Plain,
    Key,
    Fuse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    keys: HashSet<String>,
    fuses: HashSet<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not already held.
    pub fn add_key(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.is_empty() {
            return false;
        }
        self.keys.insert(id)
    }

    /// Returns true if the fuse was not already held.
    pub fn add_fuse(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.is_empty() {
            return false;
        }
        self.fuses.insert(id)
    }

    /// Register an item by kind. Plain items are not tracked.
    pub fn add(&mut self, kind: ItemKind, id: &str) -> bool {
        match kind {
            ItemKind::Plain => false,
            ItemKind::Key => self.add_key(id),
            ItemKind::Fuse => self.add_fuse(id),
        }
    }

    pub fn has_key(&self, id: &str) -> bool {
        self.keys.contains(id)
    }

    pub fn has_fuse(&self, id: &str) -> bool {
        self.fuses.contains(id)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn fuse_count(&self) -> usize {
        self.fuses.len()
    }
}
