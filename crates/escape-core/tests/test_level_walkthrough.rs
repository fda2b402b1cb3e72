//! Integration tests for a full level run through `LevelEngine`.
//!
//! Exercises: outline highlight → pickup → locked door → fuse → fusebox
//! → lever → gate → escape → end scene, against a recording host.

use escape_core::bake::BakeError;
use escape_core::prelude::*;
use escape_logic::constants::prompts;
use escape_logic::door::{Door, MotionState};
use escape_logic::fusebox::Fusebox;
use escape_logic::gate::{Gate, GateState};
use escape_logic::lever::Lever;
use escape_logic::outline::OutlineTarget;

const LEVEL_JSON: &str = include_str!("../../../data/level.json");
const DT: f32 = 1.0 / 60.0;

// ── Helpers ────────────────────────────────────────────────────────────

struct Run {
    engine: LevelEngine,
    host: RecordingHost,
}

impl Run {
    fn new() -> Self {
        let engine = LevelEngine::from_json(LEVEL_JSON).expect("level loads");
        let host = RecordingHost::new(engine.collider_world());
        Self { engine, host }
    }

    /// One frame standing at `at`, looking at `look`.
    fn frame(&mut self, at: Vec3, look: Vec3, keys: &[Key]) {
        let mut frame = Frame::new(ViewerPose::looking_at(at, look));
        frame.pressed.extend_from_slice(keys);
        self.engine.update(DT, &frame, &mut self.host);
    }

    fn idle(&mut self, at: Vec3, look: Vec3, frames: usize) {
        for _ in 0..frames {
            self.frame(at, look, &[]);
        }
    }

    fn outlined(&self, name: &str) -> bool {
        self.engine
            .get::<OutlineTarget>(name)
            .map(|t| t.renderers.iter().any(|r| r.has_outline()))
            .unwrap_or(false)
    }
}

fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

// Stations used by the walkthrough.
const KEY: Vec3 = Vec3::new(0.0, 1.0, -5.0);
const DOOR: Vec3 = Vec3::new(0.0, 1.0, -10.0);
const FUSE: Vec3 = Vec3::new(8.0, 1.0, -14.0);
const FUSEBOX: Vec3 = Vec3::new(14.0, 1.0, -14.0);
const LEVER: Vec3 = Vec3::new(14.0, 1.0, -20.0);
const CAR: Vec3 = Vec3::new(0.0, 1.0, -40.0);

// ── Loading ────────────────────────────────────────────────────────────

#[test]
fn test_level_loads_and_hides_puzzle_outputs() {
    let mut run = Run::new();
    run.frame(v(0.0, 1.0, 0.0), v(0.0, 1.0, -1.0), &[]);

    assert!(!run.engine.is_active("fusebox-fuse"));
    assert!(!run.engine.is_active("gate-light"));
    assert_eq!(run.host.is_active("fusebox-fuse"), Some(false));
    assert_eq!(run.host.is_active("gate-light"), Some(false));
    assert!(run.engine.is_active("fuse"));
}

#[test]
fn test_invalid_level_reports_every_error() {
    let json = r#"{
        "name": "",
        "objects": [
            { "name": "a", "kind": "prop" },
            { "name": "a", "kind": "prop" },
            { "name": "lever", "kind": "lever" }
        ]
    }"#;
    match LevelEngine::from_json(json) {
        Err(EngineError::InvalidConfig(errors)) => assert!(errors.len() >= 4, "{errors:?}"),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("invalid level accepted"),
    }
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    assert!(matches!(
        LevelEngine::from_json("{ not json"),
        Err(EngineError::Json(_))
    ));
}

#[test]
fn test_meshes_prepared_once_on_first_frame() {
    let mut run = Run::new();
    run.idle(v(0.0, 1.0, 0.0), v(0.0, 1.0, -1.0), 3);

    let ids: Vec<u64> = run.host.uploaded_meshes.iter().map(|m| m.id.0).collect();
    assert_eq!(ids.len(), 3);
    for id in [1, 2, 3] {
        assert!(ids.contains(&id));
    }
    let car = run
        .host
        .uploaded_meshes
        .iter()
        .find(|m| m.id.0 == 3)
        .expect("car mesh");
    assert!(car.add_combined_submesh);
    assert!(car.smooth_normals.iter().all(|n| *n == Vec3::ZERO));
}

#[test]
fn test_outline_settings_pushed_once() {
    let mut run = Run::new();
    run.idle(v(0.0, 1.0, 0.0), v(0.0, 1.0, -1.0), 5);
    assert!(run.host.outline_settings.contains_key("fuse"));
    let settings = run.host.outline_settings["fuse"];
    assert_eq!(settings.fill_width, 4.0);
}

// ── Outline ────────────────────────────────────────────────────────────

#[test]
fn test_highlight_follows_gaze_with_single_edges() {
    let mut run = Run::new();
    let at = v(0.0, 1.0, 0.0);

    run.frame(at, KEY, &[]);
    assert_eq!(run.engine.highlighted().as_deref(), Some("front-key"));
    assert!(run.outlined("front-key"));

    // Looking away clears it.
    run.frame(at, v(10.0, 1.0, 10.0), &[]);
    assert_eq!(run.engine.highlighted(), None);
    assert!(!run.outlined("front-key"));

    // Back again, and held: stays highlighted.
    run.idle(at, KEY, 10);
    assert!(run.outlined("front-key"));
    let passes = &run.host.passes[&("front-key".to_string(), 0)];
    assert_eq!(
        passes.iter().filter(|p| p.starts_with("Outline")).count(),
        2,
        "outline passes added exactly once: {passes:?}"
    );
}

#[test]
fn test_non_outlined_hit_occludes() {
    let mut run = Run::new();
    // The door sphere sits in front of the car; doors have no outline.
    run.frame(v(0.0, 1.0, -7.0), CAR, &[]);
    assert_eq!(run.engine.highlighted(), None);
    assert!(!run.outlined("car"));
}

// ── Interaction ────────────────────────────────────────────────────────

#[test]
fn test_pickup_needs_range_and_outline() {
    let mut run = Run::new();

    // Outlined but too far.
    run.frame(v(0.0, 1.0, 0.0), KEY, &[Key::E]);
    assert!(run.engine.is_active("front-key"));
    assert_eq!(run.engine.prompt(), None);

    // In range and outlined.
    run.frame(v(0.0, 1.0, -3.0), KEY, &[]);
    assert_eq!(run.engine.prompt(), Some(prompts::PICK_UP));
    assert_eq!(run.host.prompt.as_deref(), Some(prompts::PICK_UP));

    run.frame(v(0.0, 1.0, -3.0), KEY, &[Key::E]);
    assert!(!run.engine.is_active("front-key"));
    assert!(run.engine.inventory.has_key("K1"));
    assert_eq!(run.host.is_active("front-key"), Some(false));
    assert_eq!(run.host.cue_count(Cue::ItemCollected), 1);
    assert_eq!(run.host.prompt, None);

    // Pressing again does nothing more.
    run.frame(v(0.0, 1.0, -3.0), KEY, &[Key::E]);
    assert_eq!(run.host.cue_count(Cue::ItemCollected), 1);
    assert_eq!(run.engine.inventory.key_count(), 1);
}

#[test]
fn test_locked_door_stays_shut_until_key() {
    let mut run = Run::new();
    let at_door = v(0.0, 1.0, -8.0);

    run.frame(at_door, DOOR, &[Key::E]);
    run.idle(at_door, DOOR, 30);
    assert_eq!(run.host.cue_count(Cue::DoorLocked), 1);
    let door: Door = run.engine.get("front-door").expect("door");
    assert_eq!(door.state(), MotionState::Closed);
    assert!(door.is_locked());

    run.frame(v(0.0, 1.0, -3.0), KEY, &[]);
    run.frame(v(0.0, 1.0, -3.0), KEY, &[Key::E]);

    run.frame(at_door, DOOR, &[Key::E]);
    assert_eq!(run.host.cue_count(Cue::DoorUnlocked), 1);
    assert_eq!(run.host.cue_count(Cue::DoorOpening), 1);
    run.idle(at_door, DOOR, 600);

    let door: Door = run.engine.get("front-door").expect("door");
    assert_eq!(door.state(), MotionState::Open);
    assert!(!door.is_locked());
    assert_eq!(run.host.rotations.get("front-door"), Some(&door.rotation()));

    // Closes again without needing the key re-checked.
    run.frame(at_door, DOOR, &[Key::E]);
    assert_eq!(run.host.cue_count(Cue::DoorClosing), 1);
    assert_eq!(run.host.cue_count(Cue::DoorUnlocked), 1);
}

#[test]
fn test_door_out_of_range_ignores_key() {
    let mut run = Run::new();
    run.frame(v(0.0, 1.0, -7.0), DOOR, &[Key::E]);
    assert!(run.host.cues.is_empty());
}

#[test]
fn test_lever_without_fuse_has_no_power() {
    let mut run = Run::new();
    let at_lever = v(14.0, 1.0, -18.5);
    run.frame(at_lever, LEVER, &[Key::P]);
    run.idle(at_lever, LEVER, 60);

    let lever: Lever = run.engine.get("lever").expect("lever");
    assert!(!lever.is_down());
    let gate: Gate = run.engine.get("gate").expect("gate");
    assert_eq!(gate.state(), GateState::Closed);
    assert_eq!(run.host.cue_count(Cue::GateMoving), 0);
}

#[test]
fn test_fusebox_asks_for_fuse() {
    let mut run = Run::new();
    run.frame(v(14.0, 1.0, -12.0), FUSEBOX, &[Key::P]);
    assert_eq!(run.engine.prompt(), Some(prompts::NEED_FUSE));
    let fusebox: Fusebox = run.engine.get("fusebox").expect("fusebox");
    assert!(!fusebox.is_fuse_placed());
}

// ── Full run ───────────────────────────────────────────────────────────

#[test]
fn test_full_walkthrough_reaches_end_scene() {
    let mut run = Run::new();

    // Fuse.
    let at_fuse = v(8.0, 1.0, -12.0);
    run.frame(at_fuse, FUSE, &[]);
    assert_eq!(run.engine.prompt(), Some(prompts::PICK_UP));
    run.frame(at_fuse, FUSE, &[Key::E]);
    assert!(run.engine.inventory.has_fuse("F1"));

    // Fusebox.
    let at_box = v(14.0, 1.0, -12.0);
    run.frame(at_box, FUSEBOX, &[]);
    assert_eq!(run.engine.prompt(), Some(prompts::PLACE_FUSE));
    run.frame(at_box, FUSEBOX, &[Key::P]);
    let fusebox: Fusebox = run.engine.get("fusebox").expect("fusebox");
    assert!(fusebox.is_fuse_placed());
    assert!(run.engine.is_active("fusebox-fuse"));
    assert_eq!(run.host.is_active("fusebox-fuse"), Some(true));
    assert_eq!(run.engine.prompt(), None);

    // Placing twice does nothing.
    run.frame(at_box, FUSEBOX, &[Key::P]);
    assert_eq!(run.host.cue_count(Cue::FusePlaced), 1);

    // Lever.
    let at_lever = v(14.0, 1.0, -18.5);
    run.frame(at_lever, LEVER, &[]);
    assert_eq!(run.engine.prompt(), Some(prompts::PULL_LEVER));
    run.frame(at_lever, LEVER, &[Key::P]);
    assert_eq!(run.host.cue_count(Cue::LeverPulled), 1);
    assert_eq!(run.host.cue_count(Cue::GateMoving), 1);
    assert!(run.engine.is_active("gate-light"));

    run.frame(at_lever, LEVER, &[Key::P]);
    assert_eq!(run.host.cue_count(Cue::LeverPulled), 1);

    run.idle(at_lever, LEVER, 600);
    let lever: Lever = run.engine.get("lever").expect("lever");
    assert!(lever.is_down());
    let gate: Gate = run.engine.get("gate").expect("gate");
    assert_eq!(gate.state(), GateState::Open);
    assert!(!gate.in_transition());

    // Escape.
    let at_car = v(0.0, 1.0, -37.5);
    run.frame(at_car, CAR, &[]);
    assert_eq!(run.engine.prompt(), Some(prompts::ESCAPE));
    assert!(run.host.loaded_scenes.is_empty());
    run.frame(at_car, CAR, &[Key::E]);
    assert_eq!(run.host.loaded_scenes, vec![3]);
}

// ── Bakes ──────────────────────────────────────────────────────────────

#[test]
fn test_bake_round_trip_through_engine() {
    let run = Run::new();
    let mut buffer = Vec::new();
    run.engine.save_normals(&mut buffer).expect("save");

    let mut fresh = Run::new();
    fresh.engine.load_normals(&buffer[..]).expect("load");
    fresh.idle(v(0.0, 1.0, 0.0), v(0.0, 1.0, -1.0), 1);
    assert_eq!(fresh.host.uploaded_meshes.len(), 3);
}

#[test]
fn test_corrupt_bake_rejected() {
    let mut run = Run::new();
    let err = run.engine.load_normals(&[0xFFu8; 3][..]).expect_err("corrupt");
    assert!(matches!(err, EngineError::Bake(BakeError::Bincode(_))));
}
