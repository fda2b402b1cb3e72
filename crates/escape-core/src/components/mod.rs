//! Component definitions for the level world.
//!
//! Components are data attached to entities. The interaction rules live in
//! `escape_logic` types (`Door`, `Lever`, ...) which are stored directly as
//! components; these are the engine-side extras.

mod common;
mod puzzle;

pub use common::*;
pub use puzzle::*;
