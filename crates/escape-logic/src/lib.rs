//! Pure interaction logic for the escape game.
//!
//! This crate holds the puzzle and interaction rules independent of any
//! ECS, renderer, physics or input backend. Types take plain data and
//! return outcomes, so the rules are unit-testable and the engine crate
//! only has to wire them to the world.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collectible`] | Keys, fuses and props picked up when outlined and in range |
//! | [`config`] | Level JSON model and startup validation |
//! | [`constants`] | Ranges, motion rates, outline defaults, scene indices, prompts |
//! | [`door`] | Lockable door toggle state machine |
//! | [`escape`] | Escape vehicle prompt and interact |
//! | [`fusebox`] | One-shot fuse placement gated on the inventory |
//! | [`gate`] | Fixed-duration gate swing triggered externally |
//! | [`interaction`] | Actions, key bindings, reach, single-target selection |
//! | [`inventory`] | Collected key and fuse identifiers |
//! | [`lever`] | One-shot lever pull gated on a live fusebox |
//! | [`motion`] | Slerp stepping for doors, levers and gates |
//! | [`outline`] | Look-at detection, single highlight, outline passes |
//! | [`scene`] | Title, timed intro and end-trigger scene flow |
//! | [`smoothing`] | Smoothed normals per shared mesh, bakes |

pub mod collectible;
pub mod config;
pub mod constants;
pub mod door;
pub mod escape;
pub mod fusebox;
pub mod gate;
pub mod interaction;
pub mod inventory;
pub mod lever;
pub mod motion;
pub mod outline;
pub mod scene;
pub mod smoothing;
