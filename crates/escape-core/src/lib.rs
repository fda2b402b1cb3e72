//! Escape Core - level engine for the escape game
//!
//! Runs one scene of the game: spawns the level's objects from JSON, then
//! each frame decides what the viewer is looking at and standing near,
//! routes key presses to a single target and animates whatever moves.
//!
//! # Architecture
//!
//! The engine uses an Entity Component System (ECS) via `hecs`:
//! - **Entities**: Scene objects (doors, fuses, the fusebox, the lever, ...)
//! - **Components**: `escape_logic` state machines plus engine-side data
//!   (`Name`, `Transform`, `Active`, `Interactable`, links)
//! - **Systems**: Outline, interaction, animation and scene flow
//!
//! Rendering, audio, physics and scene loading belong to the host, reached
//! through the traits in [`host`].
//!
//! # Example
//!
//! ```rust,no_run
//! use escape_core::prelude::*;
//!
//! let json = std::fs::read_to_string("data/level.json").unwrap();
//! let mut engine = LevelEngine::from_json(&json).unwrap();
//! let mut host = RecordingHost::new(engine.collider_world());
//!
//! loop {
//!     let pose = ViewerPose::new(Vec3::ZERO, Vec3::NEG_Z);
//!     engine.update(1.0 / 60.0, &Frame::new(pose), &mut host);
//! }
//! ```

pub mod bake;
pub mod components;
pub mod engine;
pub mod error;
pub mod host;
pub mod level;
pub mod spatial;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::LevelEngine;
    pub use crate::error::EngineError;
    pub use crate::host::{Cue, Frame, Host, Presentation, RecordingHost, SceneService, SpatialQuery, ViewerPose};
    pub use escape_logic::interaction::Key;
    pub use glam::{Quat, Vec3};
}
