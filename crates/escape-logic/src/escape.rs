//! The escape vehicle: prompts when the player is close, reports an escape
//! attempt on interact. Repeatable.

use serde::{Deserialize, Serialize};

use crate::constants::prompts;
use crate::interaction::Reach;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapePoint {
    attempts: u32,
}

impl EscapePoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn prompt(&self, reach: Reach) -> Option<&'static str> {
        reach.in_range.then_some(prompts::ESCAPE)
    }

    /// Returns true if the attempt counted.
    pub fn attempt(&mut self, reach: Reach) -> bool {
        if !reach.in_range {
            return false;
        }
        self.attempts += 1;
        true
    }
}
