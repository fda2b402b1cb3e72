//! Cross-object wiring for the fuse/lever/gate puzzle and outline meshes.

use escape_logic::smoothing::{MeshId, NormalBake};
use hecs::Entity;

/// What a fusebox touches once its fuse is in.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuseboxLinks {
    /// Model switched on inside the box.
    pub fuse_in_box: Option<Entity>,
    /// Loose fuse collectible retired after placement.
    pub source_fuse: Option<Entity>,
}

/// A lever's required fusebox and gate, plus its optional light.
#[derive(Debug, Clone, Copy)]
pub struct LeverLinks {
    pub fusebox: Entity,
    pub gate: Entity,
    pub light: Option<Entity>,
}

/// Meshes drawn by an outlined object.
#[derive(Debug, Clone, Default)]
pub struct OutlineMeshes {
    pub meshes: Vec<MeshId>,
    /// Present when the object asked for precomputed normals.
    pub bake: Option<NormalBake>,
}
