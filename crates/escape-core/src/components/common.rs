//! Components shared by every scene object.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::host::ColliderId;

/// Scene object name, unique per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Build from euler degrees (pitch, yaw, roll).
    pub fn from_euler_deg(position: Vec3, euler: Vec3) -> Self {
        let rotation = Quat::from_euler(
            glam::EulerRot::YXZ,
            euler.y.to_radians(),
            euler.x.to_radians(),
            euler.z.to_radians(),
        );
        Self { position, rotation }
    }
}

/// Whether the object takes part in the scene (rendered, hit, interactive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Active(pub bool);

/// Proximity-gated interaction threshold. Disabled interactables are
/// skipped by target selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub range: f32,
    pub enabled: bool,
}

impl Interactable {
    pub fn new(range: f32) -> Self {
        Self {
            range,
            enabled: true,
        }
    }
}

/// Sphere the host's spatial query knows this object by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub id: ColliderId,
    pub radius: f32,
}
