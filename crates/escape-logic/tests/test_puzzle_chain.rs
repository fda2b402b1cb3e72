//! Integration tests for the fuse → fusebox → lever → gate chain.
//!
//! Exercises the rules directly, the way the engine wires them, without any
//! world or host.

use escape_logic::collectible::{Collectible, Pickup};
use escape_logic::constants::prompts;
use escape_logic::door::{Door, DoorToggle, MotionState};
use escape_logic::fusebox::{FusePlacement, Fusebox};
use escape_logic::gate::{Gate, GateState};
use escape_logic::interaction::Reach;
use escape_logic::inventory::Inventory;
use escape_logic::lever::{Lever, LeverPull};
use glam::Quat;

const DT: f32 = 1.0 / 60.0;

// ── Helpers ────────────────────────────────────────────────────────────

struct Chain {
    inventory: Inventory,
    fuse: Collectible,
    fusebox: Fusebox,
    lever: Lever,
    gate: Gate,
    gate_open_calls: u32,
}

impl Chain {
    fn new() -> Self {
        Self {
            inventory: Inventory::new(),
            fuse: Collectible::fuse("F1"),
            fusebox: Fusebox::new("F1"),
            lever: Lever::new(Quat::IDENTITY),
            gate: Gate::new(Quat::IDENTITY),
            gate_open_calls: 0,
        }
    }

    fn place(&mut self) -> FusePlacement {
        let result = self.fusebox.place(Reach::in_range(), &self.inventory);
        if result == FusePlacement::Placed {
            self.fuse.disable();
        }
        result
    }

    fn pull(&mut self) -> LeverPull {
        let result = self
            .lever
            .pull(Reach::in_range(), self.fusebox.is_fuse_placed());
        if result == LeverPull::Pulled {
            self.gate_open_calls += 1;
            self.gate.open();
        }
        result
    }
}

// ── Chain tests ────────────────────────────────────────────────────────

#[test]
fn full_walkthrough_opens_gate() {
    let mut c = Chain::new();

    assert_eq!(
        c.fusebox.prompt(Reach::in_range(), &c.inventory),
        Some(prompts::NEED_FUSE)
    );

    let pickup = c.fuse.collect(Reach::targeted(), &mut c.inventory);
    assert!(matches!(pickup, Pickup::Collected { registered: true, .. }));

    assert_eq!(
        c.fusebox.prompt(Reach::in_range(), &c.inventory),
        Some(prompts::PLACE_FUSE)
    );
    assert_eq!(
        c.lever.prompt(Reach::in_range(), c.fusebox.is_fuse_placed()),
        Some(prompts::LEVER_NO_FUSE)
    );

    assert_eq!(c.place(), FusePlacement::Placed);
    assert!(c.fusebox.is_fuse_placed());
    assert!(!c.fuse.is_enabled());

    assert_eq!(
        c.lever.prompt(Reach::in_range(), c.fusebox.is_fuse_placed()),
        Some(prompts::PULL_LEVER)
    );
    assert_eq!(c.pull(), LeverPull::Pulled);

    let mut elapsed = 0.0;
    while !c.gate.advance(DT).is_done() {
        elapsed += DT;
        assert!(elapsed < 5.0, "gate never finished");
    }
    assert_eq!(c.gate.state(), GateState::Open);
    assert!(elapsed <= c.gate.swing_duration() + DT);
}

#[test]
fn lever_before_fuse_is_rejected_then_fires_once() {
    let mut c = Chain::new();
    assert_eq!(c.pull(), LeverPull::NoPower);
    assert_eq!(c.gate_open_calls, 0);

    c.fuse.collect(Reach::targeted(), &mut c.inventory);
    c.place();

    assert_eq!(c.pull(), LeverPull::Pulled);
    for _ in 0..4 {
        assert_eq!(c.pull(), LeverPull::AlreadyPulled);
    }
    assert_eq!(c.gate_open_calls, 1);
}

#[test]
fn fuse_placed_stays_placed() {
    let mut c = Chain::new();
    assert!(!c.fusebox.is_fuse_placed());
    c.fuse.collect(Reach::targeted(), &mut c.inventory);
    assert_eq!(c.place(), FusePlacement::Placed);
    for _ in 0..3 {
        assert_eq!(c.place(), FusePlacement::AlreadyPlaced);
        assert!(c.fusebox.is_fuse_placed());
    }
}

#[test]
fn key_pickup_unlocks_door() {
    let mut inv = Inventory::new();
    let mut key = Collectible::key("cellar");
    let mut door = Door::new(Quat::IDENTITY).with_lock("cellar");

    for _ in 0..10 {
        assert_eq!(door.toggle(Reach::in_range(), &inv), DoorToggle::Locked);
    }
    assert_eq!(door.state(), MotionState::Closed);

    key.collect(Reach::targeted(), &mut inv);
    assert_eq!(
        door.toggle(Reach::in_range(), &inv),
        DoorToggle::Moving {
            state: MotionState::Opening,
            unlocked: true
        }
    );
    while !door.advance(DT).is_done() {}
    assert_eq!(door.state(), MotionState::Open);

    assert_eq!(
        door.toggle(Reach::in_range(), &inv),
        DoorToggle::Moving {
            state: MotionState::Closing,
            unlocked: false
        }
    );
}
