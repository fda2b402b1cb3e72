//! Shared interaction vocabulary: actions, reach, and target selection.
//!
//! A frame's interaction pass computes every interactable's distance to the
//! viewer once, picks a single target, and dispatches the frame's
//! edge-triggered actions to that target only.

use serde::{Deserialize, Serialize};

/// Discrete player actions. Each fires once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Pickup,
    Toggle,
    Place,
    Pull,
    Escape,
}

/// Physical keys the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    E,
    P,
    Escape,
    PrimaryClick,
}

/// Actions a key press can mean. The target decides which one applies.
pub fn actions_for_key(key: Key) -> &'static [Action] {
    match key {
        Key::E => &[Action::Pickup, Action::Toggle, Action::Escape],
        Key::P => &[Action::Place, Action::Pull],
        Key::Escape | Key::PrimaryClick => &[],
    }
}

/// How the viewer relates to an interactable this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reach {
    /// Within the interactable's threshold distance.
    pub in_range: bool,
    /// Currently the outlined object.
    pub highlighted: bool,
}

impl Reach {
    pub fn new(in_range: bool, highlighted: bool) -> Self {
        Self {
            in_range,
            highlighted,
        }
    }

    pub fn in_range() -> Self {
        Self::new(true, false)
    }

    pub fn targeted() -> Self {
        Self::new(true, true)
    }

    pub fn out_of_range() -> Self {
        Self::new(false, false)
    }
}

/// An interactable eligible to receive this frame's actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<Id> {
    pub id: Id,
    pub distance: f32,
    pub range: f32,
    pub highlighted: bool,
}

/// Pick the interaction target among candidates.
///
/// Out-of-range candidates are ignored. A highlighted candidate wins;
/// otherwise the nearest wins, ties going to the smaller id.
pub fn select_target<Id: Ord + Copy>(candidates: &[Candidate<Id>]) -> Option<Id> {
    let in_range = candidates.iter().filter(|c| c.distance <= c.range);

    let mut best: Option<&Candidate<Id>> = None;
    for c in in_range {
        best = match best {
            None => Some(c),
            Some(b) => {
                let better = match (c.highlighted, b.highlighted) {
                    (true, false) => true,
                    (false, true) => false,
                    _ => match c.distance.total_cmp(&b.distance) {
                        std::cmp::Ordering::Less => true,
                        std::cmp::Ordering::Greater => false,
                        std::cmp::Ordering::Equal => c.id < b.id,
                    },
                };
                if better {
                    Some(c)
                } else {
                    Some(b)
                }
            }
        };
    }
    best.map(|c| c.id)
}
