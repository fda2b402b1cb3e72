//! Escape Game Headless Harness
//!
//! Plays the shipped level data through the engine with a recording host.
//! Runs entirely in-process: no renderer, no audio, no physics engine.
//!
//! Usage:
//!   cargo run -p escape-simtest
//!   cargo run -p escape-simtest -- --verbose
//!   cargo run -p escape-simtest -- --seed 7

use escape_core::prelude::*;
use escape_logic::config::{validate_config, LevelConfig, SceneConfig, SceneFlow};
use escape_logic::constants::scenes;
use escape_logic::door::{Door, MotionState};
use escape_logic::gate::{Gate, GateState};
use escape_logic::lever::Lever;
use escape_logic::outline::OutlineTarget;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Level data (same JSON the engine tests use) ─────────────────────────
const LEVEL_JSON: &str = include_str!("../../../data/level.json");
const WALKTHROUGH_JSON: &str = include_str!("../../../data/walkthrough.json");

const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Deserialize)]
struct Step {
    label: String,
    at: [f32; 3],
    look: [f32; 3],
    keys: Vec<Key>,
    prompt: Option<String>,
    /// Idle frames after the step, for animations to finish.
    #[serde(default)]
    settle: usize,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    println!("=== Escape Game Harness (seed {}) ===\n", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut results = Vec::new();

    // 1. Level data validation
    results.extend(validate_level_data(verbose));

    // 2. Outline detection under random gaze
    results.extend(validate_outline(&mut rng, verbose));

    // 3. Scripted walkthrough with jittered stances
    results.extend(validate_walkthrough(&mut rng, verbose));

    // 4. Normal bakes
    results.extend(validate_bakes(verbose));

    // 5. Scene flow
    results.extend(validate_scene_flow(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_engine() -> Result<(LevelEngine, RecordingHost), EngineError> {
    let engine = LevelEngine::from_json(LEVEL_JSON)?;
    let host = RecordingHost::new(engine.collider_world());
    Ok((engine, host))
}

fn failure(name: &str, e: impl std::fmt::Display) -> Vec<TestResult> {
    vec![TestResult {
        name: name.into(),
        passed: false,
        detail: e.to_string(),
    }]
}

// ── 1. Level Data ───────────────────────────────────────────────────────

fn validate_level_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Level Data ---");
    let mut results = Vec::new();

    let level = match LevelConfig::from_json(LEVEL_JSON) {
        Ok(l) => l,
        Err(e) => return failure("level_parse", format!("JSON parse error: {}", e)),
    };

    let errors = validate_config(&level);
    results.push(TestResult {
        name: "level_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!("`{}` has {} objects, no errors", level.name, level.objects.len())
        } else {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    // Every outlined object must be reachable by the sphere cast
    let outlined: Vec<_> = level.objects.iter().filter(|o| o.outline.is_some()).collect();
    results.push(TestResult {
        name: "level_outlined_have_colliders".into(),
        passed: outlined.iter().all(|o| o.collider.is_some()),
        detail: format!("{} outlined objects", outlined.len()),
    });

    // The puzzle chain is present
    let labels: Vec<&str> = level.objects.iter().map(|o| o.kind.label()).collect();
    let has = |label: &str| labels.contains(&label);
    results.push(TestResult {
        name: "level_puzzle_chain".into(),
        passed: has("fusebox") && has("lever") && has("gate") && has("escape"),
        detail: format!(
            "fusebox={} lever={} gate={} escape={}",
            has("fusebox"),
            has("lever"),
            has("gate"),
            has("escape")
        ),
    });

    results.push(TestResult {
        name: "level_scene_index".into(),
        passed: level.scene.index == scenes::GAME,
        detail: format!("scene {}", level.scene.index),
    });

    if verbose {
        println!("  Objects:");
        for o in &level.objects {
            println!("    {:14} {:12} {:?}", o.name, o.kind.label(), o.position);
        }
    }

    results
}

// ── 2. Outline Detection ────────────────────────────────────────────────

fn validate_outline(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Outline Detection ---");
    let mut results = Vec::new();

    let (mut engine, mut host) = match load_engine() {
        Ok(pair) => pair,
        Err(e) => return failure("outline_load", e),
    };
    let names: Vec<String> = engine
        .world
        .query::<(&Name, &OutlineTarget)>()
        .iter()
        .map(|(_, (n, _))| n.0.clone())
        .collect();

    let mut max_outlined = 0;
    let mut mismatches = 0;
    let mut highlights = 0;
    for _ in 0..2000 {
        let at = Vec3::new(
            rng.gen_range(-4.0..18.0),
            1.0,
            rng.gen_range(-38.0..2.0),
        );
        let forward = Vec3::new(rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0));
        engine.update(DT, &Frame::new(ViewerPose::new(at, forward)), &mut host);

        let outlined: Vec<&String> = names
            .iter()
            .filter(|n| {
                engine
                    .get::<OutlineTarget>(n)
                    .is_some_and(|t| t.renderers.iter().any(|r| r.has_outline()))
            })
            .collect();
        max_outlined = max_outlined.max(outlined.len());
        if outlined.first().map(|n| n.as_str()) != engine.highlighted().as_deref() {
            mismatches += 1;
        }
        if !outlined.is_empty() {
            highlights += 1;
        }
    }

    results.push(TestResult {
        name: "outline_single_highlight".into(),
        passed: max_outlined <= 1,
        detail: format!("at most {} objects outlined at once", max_outlined),
    });
    results.push(TestResult {
        name: "outline_matches_detector".into(),
        passed: mismatches == 0,
        detail: format!("{} frames where passes and detector disagreed", mismatches),
    });
    results.push(TestResult {
        name: "outline_something_seen".into(),
        passed: highlights > 0,
        detail: format!("{} of 2000 random frames highlighted an object", highlights),
    });

    // Held gaze: outline passes are added once, not per frame.
    let at = Vec3::new(0.0, 1.0, 0.0);
    for _ in 0..60 {
        let pose = ViewerPose::looking_at(at, Vec3::new(0.0, 1.0, -5.0));
        engine.update(DT, &Frame::new(pose), &mut host);
    }
    let key_passes = host
        .passes
        .get(&("front-key".to_string(), 0))
        .map(|p| p.len())
        .unwrap_or(0);
    results.push(TestResult {
        name: "outline_held_gaze_stable".into(),
        passed: key_passes == 3,
        detail: format!("key renderer has {} passes", key_passes),
    });

    if verbose {
        println!("  {} outlinable objects: {}", names.len(), names.join(", "));
    }

    results
}

// ── 3. Walkthrough ──────────────────────────────────────────────────────

fn validate_walkthrough(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Walkthrough ---");
    let mut results = Vec::new();

    let steps: Vec<Step> = match serde_json::from_str(WALKTHROUGH_JSON) {
        Ok(s) => s,
        Err(e) => return failure("walkthrough_parse", e),
    };
    let (mut engine, mut host) = match load_engine() {
        Ok(pair) => pair,
        Err(e) => return failure("walkthrough_load", e),
    };

    for step in &steps {
        let jitter = Vec3::new(rng.gen_range(-0.2..0.2), 0.0, 0.0);
        let at = Vec3::from_array(step.at) + jitter;
        let look = Vec3::from_array(step.look);

        let mut frame = Frame::new(ViewerPose::looking_at(at, look));
        frame.pressed.extend(step.keys.iter().copied());
        engine.update(DT, &frame, &mut host);

        let prompt = engine.prompt().map(str::to_string);
        results.push(TestResult {
            name: format!("walk_{}", step.label.replace(' ', "_")),
            passed: prompt == step.prompt,
            detail: format!("prompt {:?}, expected {:?}", prompt, step.prompt),
        });

        for _ in 0..step.settle {
            engine.update(DT, &Frame::new(ViewerPose::looking_at(at, look)), &mut host);
        }
        if verbose {
            println!("  {:18} target={:?}", step.label, engine.target());
        }
    }

    let door_state = engine.get::<Door>("front-door").map(|d| d.state());
    results.push(TestResult {
        name: "walk_door_open".into(),
        passed: door_state == Some(MotionState::Open) && host.cue_count(Cue::DoorLocked) == 1,
        detail: format!(
            "door {:?}, locked cue x{}",
            door_state,
            host.cue_count(Cue::DoorLocked)
        ),
    });

    let lever_down = engine.get::<Lever>("lever").is_some_and(|l| l.is_down());
    let gate_state = engine.get::<Gate>("gate").map(|g| g.state());
    results.push(TestResult {
        name: "walk_gate_open".into(),
        passed: lever_down && gate_state == Some(GateState::Open),
        detail: format!("lever down={} gate {:?}", lever_down, gate_state),
    });

    results.push(TestResult {
        name: "walk_outputs_switched_on".into(),
        passed: engine.is_active("fusebox-fuse") && engine.is_active("gate-light"),
        detail: format!(
            "fusebox-fuse={} gate-light={}",
            engine.is_active("fusebox-fuse"),
            engine.is_active("gate-light")
        ),
    });

    results.push(TestResult {
        name: "walk_one_shot_cues".into(),
        passed: host.cue_count(Cue::FusePlaced) == 1
            && host.cue_count(Cue::LeverPulled) == 1
            && host.cue_count(Cue::GateMoving) == 1,
        detail: format!(
            "fuse x{} lever x{} gate x{}",
            host.cue_count(Cue::FusePlaced),
            host.cue_count(Cue::LeverPulled),
            host.cue_count(Cue::GateMoving)
        ),
    });

    results.push(TestResult {
        name: "walk_end_scene_loaded".into(),
        passed: host.loaded_scenes == vec![scenes::END],
        detail: format!("loaded {:?}", host.loaded_scenes),
    });

    results
}

// ── 4. Normal Bakes ─────────────────────────────────────────────────────

fn validate_bakes(_verbose: bool) -> Vec<TestResult> {
    println!("--- Normal Bakes ---");
    let mut results = Vec::new();

    let (engine, _) = match load_engine() {
        Ok(pair) => pair,
        Err(e) => return failure("bake_load", e),
    };
    let mut buffer = Vec::new();
    if let Err(e) = engine.save_normals(&mut buffer) {
        return failure("bake_save", e);
    }
    results.push(TestResult {
        name: "bake_written".into(),
        passed: !buffer.is_empty(),
        detail: format!("{} bytes", buffer.len()),
    });

    let (mut fresh, mut host) = match load_engine() {
        Ok(pair) => pair,
        Err(e) => return failure("bake_reload", e),
    };
    let loaded = fresh.load_normals(&buffer[..]);
    results.push(TestResult {
        name: "bake_loaded".into(),
        passed: loaded.is_ok(),
        detail: match &loaded {
            Ok(()) => "bake accepted".into(),
            Err(e) => e.to_string(),
        },
    });

    let pose = ViewerPose::new(Vec3::ZERO, Vec3::NEG_Z);
    fresh.update(DT, &Frame::new(pose), &mut host);
    fresh.update(DT, &Frame::new(pose), &mut host);
    results.push(TestResult {
        name: "bake_meshes_uploaded_once".into(),
        passed: host.uploaded_meshes.len() == 3,
        detail: format!("{} uploads over 2 frames", host.uploaded_meshes.len()),
    });

    let truncated = fresh.load_normals(&buffer[..buffer.len() / 2]);
    results.push(TestResult {
        name: "bake_truncated_rejected".into(),
        passed: truncated.is_err(),
        detail: "half a bake file is refused".into(),
    });

    results
}

// ── 5. Scene Flow ───────────────────────────────────────────────────────

fn scene_engine(index: u32, flow: SceneFlow) -> Result<LevelEngine, EngineError> {
    LevelEngine::from_config(LevelConfig {
        name: format!("scene-{}", index),
        scene: SceneConfig { index, flow },
        detection: Default::default(),
        meshes: Vec::new(),
        objects: Vec::new(),
    })
}

fn validate_scene_flow(_verbose: bool) -> Vec<TestResult> {
    println!("--- Scene Flow ---");
    let mut results = Vec::new();
    let pose = ViewerPose::new(Vec3::ZERO, Vec3::NEG_Z);

    // Title: click fades, then loads the next scene after the delay
    let mut title = match scene_engine(0, SceneFlow::Title { delay: scenes::TRANSITION_DELAY_SECS }) {
        Ok(e) => e,
        Err(e) => return failure("scene_title_load", e),
    };
    let mut host = RecordingHost::default();
    title.update(DT, &Frame::new(pose).press(Key::PrimaryClick), &mut host);
    let faded = host.transitions == 1 && host.loaded_scenes.is_empty();
    for _ in 0..90 {
        title.update(DT, &Frame::new(pose), &mut host);
    }
    results.push(TestResult {
        name: "scene_title_click".into(),
        passed: faded && host.loaded_scenes == vec![1],
        detail: format!("transitions={} loaded={:?}", host.transitions, host.loaded_scenes),
    });

    let mut host = RecordingHost::default();
    title.update(DT, &Frame::new(pose).press(Key::Escape), &mut host);
    results.push(TestResult {
        name: "scene_title_escape_quits".into(),
        passed: host.quit,
        detail: format!("quit={}", host.quit),
    });

    // Intro: switches to the game scene after its frame count
    let mut intro = match scene_engine(
        1,
        SceneFlow::Intro {
            frames: scenes::INTRO_FRAMES,
            target: scenes::GAME,
        },
    ) {
        Ok(e) => e,
        Err(e) => return failure("scene_intro_load", e),
    };
    let mut host = RecordingHost::default();
    let mut switched_at = None;
    for frame in 1..=scenes::INTRO_FRAMES + 10 {
        intro.update(DT, &Frame::new(pose), &mut host);
        if switched_at.is_none() && !host.loaded_scenes.is_empty() {
            switched_at = Some(frame);
        }
    }
    results.push(TestResult {
        name: "scene_intro_timed".into(),
        passed: switched_at == Some(scenes::INTRO_FRAMES + 1) && host.loaded_scenes == vec![scenes::GAME],
        detail: format!("switched at frame {:?} to {:?}", switched_at, host.loaded_scenes),
    });

    results
}
