//! Systems that run on the level world each frame.

mod animation;
mod interaction;
mod outline;
mod scene;

pub use animation::*;
pub use interaction::*;
pub use outline::*;
pub use scene::*;
