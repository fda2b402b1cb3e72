//! Level description and startup validation.
//!
//! A level is a JSON document listing scene objects, their interaction
//! role, and cross references by object name. Every tunable has a default
//! so a minimal level only names what differs. [`validate_config`] reports
//! every problem at once; a level with errors must not be started.
//!
//! ```
//! use escape_logic::config::{validate_config, LevelConfig};
//!
//! let level = LevelConfig::from_json(r#"{
//!     "name": "shed",
//!     "objects": [
//!         { "name": "box", "kind": "fusebox", "required_fuse": "F1" },
//!         { "name": "gate", "kind": "gate" },
//!         { "name": "lever", "kind": "lever", "fusebox": "box", "gate": "gate" }
//!     ]
//! }"#).unwrap();
//! assert!(validate_config(&level).is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{motion, outline, ranges};
use crate::inventory::ItemKind;
use crate::outline::OutlineStyle;
use crate::smoothing::{MeshData, MeshId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub meshes: Vec<MeshData>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectConfig> {
        self.objects.iter().find(|o| o.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Build index of this scene.
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub flow: SceneFlow,
}

/// How the scene hands over to the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneFlow {
    /// A playable level; leaves through end triggers.
    #[default]
    Level,
    /// Click to continue, Escape to quit.
    Title {
        #[serde(default = "default_transition_delay")]
        delay: f32,
    },
    /// Switches on its own after a frame count.
    Intro {
        #[serde(default = "default_intro_frames")]
        frames: u32,
        #[serde(default = "default_game_scene")]
        target: u32,
    },
}

fn default_transition_delay() -> f32 {
    crate::constants::scenes::TRANSITION_DELAY_SECS
}
fn default_intro_frames() -> u32 {
    crate::constants::scenes::INTRO_FRAMES
}
fn default_game_scene() -> u32 {
    crate::constants::scenes::GAME
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub ray_length: f32,
    pub spherecast_radius: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ray_length: outline::RAY_LENGTH,
            spherecast_radius: outline::SPHERECAST_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in degrees: pitch, yaw, roll.
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Sphere collider radius for the spatial query.
    #[serde(default)]
    pub collider: Option<f32>,
    #[serde(default)]
    pub outline: Option<OutlineConfig>,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineConfig {
    #[serde(default)]
    pub style: OutlineStyle,
    /// Material passes per renderer.
    #[serde(default)]
    pub renderers: Vec<Vec<String>>,
    /// Meshes drawn by this object's renderers.
    #[serde(default)]
    pub meshes: Vec<MeshId>,
    /// Bake smooth normals for this object's meshes up front.
    #[serde(default)]
    pub precompute: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectKind {
    /// Passive object: lights, fuse models, scenery.
    Prop,
    Collectible {
        item: ItemKind,
        #[serde(default)]
        id: String,
        #[serde(default = "default_pickup_range")]
        range: f32,
    },
    Door {
        #[serde(default)]
        required_key: Option<String>,
        #[serde(default = "default_door_range")]
        range: f32,
        #[serde(default = "default_open_angle")]
        open_angle: f32,
        #[serde(default = "default_rate")]
        rate: f32,
    },
    Fusebox {
        required_fuse: String,
        #[serde(default = "default_fusebox_range")]
        range: f32,
        /// Object switched on once the fuse is in.
        #[serde(default)]
        fuse_in_box: Option<String>,
        /// Loose fuse collectible retired once the fuse is in.
        #[serde(default)]
        source_fuse: Option<String>,
    },
    Lever {
        #[serde(default = "default_lever_range")]
        range: f32,
        #[serde(default = "default_lever_angle")]
        angle: f32,
        #[serde(default = "default_rate")]
        rate: f32,
        #[serde(default)]
        fusebox: Option<String>,
        #[serde(default)]
        gate: Option<String>,
        #[serde(default)]
        light: Option<String>,
    },
    Gate {
        #[serde(default = "default_open_angle")]
        open_angle: f32,
        #[serde(default = "default_rate")]
        rate: f32,
    },
    Escape {
        #[serde(default = "default_escape_range")]
        range: f32,
    },
    EndTrigger {
        radius: f32,
        #[serde(default = "default_end_scene")]
        target: u32,
    },
}

fn default_pickup_range() -> f32 {
    ranges::PICKUP
}
fn default_door_range() -> f32 {
    ranges::DOOR
}
fn default_fusebox_range() -> f32 {
    ranges::FUSEBOX
}
fn default_lever_range() -> f32 {
    ranges::LEVER
}
fn default_escape_range() -> f32 {
    ranges::ESCAPE
}
fn default_open_angle() -> f32 {
    motion::OPEN_ANGLE_DEG
}
fn default_lever_angle() -> f32 {
    motion::LEVER_ANGLE_DEG
}
fn default_rate() -> f32 {
    motion::SMOOTH_RATE
}
fn default_end_scene() -> u32 {
    crate::constants::scenes::END
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Prop => "prop",
            ObjectKind::Collectible { .. } => "collectible",
            ObjectKind::Door { .. } => "door",
            ObjectKind::Fusebox { .. } => "fusebox",
            ObjectKind::Lever { .. } => "lever",
            ObjectKind::Gate { .. } => "gate",
            ObjectKind::Escape { .. } => "escape",
            ObjectKind::EndTrigger { .. } => "end_trigger",
        }
    }

    /// Interaction threshold, for kinds that have one.
    pub fn range(&self) -> Option<f32> {
        match self {
            ObjectKind::Collectible { range, .. }
            | ObjectKind::Door { range, .. }
            | ObjectKind::Fusebox { range, .. }
            | ObjectKind::Lever { range, .. }
            | ObjectKind::Escape { range } => Some(*range),
            ObjectKind::EndTrigger { radius, .. } => Some(*radius),
            ObjectKind::Prop | ObjectKind::Gate { .. } => None,
        }
    }

    fn rate(&self) -> Option<f32> {
        match self {
            ObjectKind::Door { rate, .. }
            | ObjectKind::Lever { rate, .. }
            | ObjectKind::Gate { rate, .. } => Some(*rate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level name is empty")]
    EmptyLevelName,
    #[error("object name is empty")]
    EmptyObjectName,
    #[error("object name `{0}` is used more than once")]
    DuplicateName(String),
    #[error("`{object}` has no `{field}` set")]
    MissingLink { object: String, field: &'static str },
    #[error("`{object}`.{field} refers to unknown object `{target}`")]
    UnknownReference {
        object: String,
        field: &'static str,
        target: String,
    },
    #[error("`{object}`.{field} must refer to a {expected}, `{target}` is not one")]
    WrongReferenceKind {
        object: String,
        field: &'static str,
        target: String,
        expected: &'static str,
    },
    #[error("`{0}` needs a positive interaction range")]
    NonPositiveRange(String),
    #[error("`{0}` needs a positive motion rate")]
    NonPositiveRate(String),
    #[error("`{0}` is a key or fuse without an id")]
    MissingItemId(String),
    #[error("door `{0}` requires a key with an empty id")]
    MissingKeyId(String),
    #[error("fusebox `{0}` has no required fuse id")]
    MissingFuseId(String),
    #[error("`{0}` has an outline width outside 0..=10")]
    OutlineWidthOutOfRange(String),
    #[error("`{0}` is outlined but has no collider")]
    OutlineWithoutCollider(String),
    #[error("`{0}` has a non-positive collider radius")]
    NonPositiveCollider(String),
    #[error("`{object}` draws unknown mesh {mesh}")]
    UnknownMesh { object: String, mesh: u64 },
    #[error("detection ray length and sphere-cast radius must be positive")]
    InvalidDetection,
}

/// Validate a level, returning all errors found.
pub fn validate_config(level: &LevelConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if level.name.trim().is_empty() {
        errors.push(ConfigError::EmptyLevelName);
    }
    if level.detection.ray_length <= 0.0 || level.detection.spherecast_radius <= 0.0 {
        errors.push(ConfigError::InvalidDetection);
    }

    let mut kinds: HashMap<&str, &ObjectKind> = HashMap::new();
    let mut seen = HashSet::new();
    for obj in &level.objects {
        if obj.name.trim().is_empty() {
            errors.push(ConfigError::EmptyObjectName);
        } else if !seen.insert(obj.name.as_str()) {
            errors.push(ConfigError::DuplicateName(obj.name.clone()));
        }
        kinds.entry(obj.name.as_str()).or_insert(&obj.kind);
    }

    let meshes: HashSet<MeshId> = level.meshes.iter().map(|m| m.id).collect();

    for obj in &level.objects {
        check_object(obj, &kinds, &meshes, &mut errors);
    }

    errors
}

fn check_object(
    obj: &ObjectConfig,
    kinds: &HashMap<&str, &ObjectKind>,
    meshes: &HashSet<MeshId>,
    errors: &mut Vec<ConfigError>,
) {
    let name = &obj.name;

    if obj.kind.range().is_some_and(|r| r <= 0.0) {
        errors.push(ConfigError::NonPositiveRange(name.clone()));
    }
    if obj.kind.rate().is_some_and(|r| r <= 0.0) {
        errors.push(ConfigError::NonPositiveRate(name.clone()));
    }
    if obj.collider.is_some_and(|r| r <= 0.0) {
        errors.push(ConfigError::NonPositiveCollider(name.clone()));
    }

    if let Some(outline) = &obj.outline {
        if !(0.0..=outline::MAX_WIDTH).contains(&outline.style.width) {
            errors.push(ConfigError::OutlineWidthOutOfRange(name.clone()));
        }
        if obj.collider.is_none() {
            errors.push(ConfigError::OutlineWithoutCollider(name.clone()));
        }
        for mesh in &outline.meshes {
            if !meshes.contains(mesh) {
                errors.push(ConfigError::UnknownMesh {
                    object: name.clone(),
                    mesh: mesh.0,
                });
            }
        }
    }

    match &obj.kind {
        ObjectKind::Collectible { item, id, .. } => {
            if *item != ItemKind::Plain && id.trim().is_empty() {
                errors.push(ConfigError::MissingItemId(name.clone()));
            }
        }
        ObjectKind::Door { required_key, .. } => {
            if required_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                errors.push(ConfigError::MissingKeyId(name.clone()));
            }
        }
        ObjectKind::Fusebox {
            required_fuse,
            fuse_in_box,
            source_fuse,
            ..
        } => {
            if required_fuse.trim().is_empty() {
                errors.push(ConfigError::MissingFuseId(name.clone()));
            }
            check_ref(errors, kinds, name, "fuse_in_box", fuse_in_box, None);
            check_ref(errors, kinds, name, "source_fuse", source_fuse, Some("collectible"));
        }
        ObjectKind::Lever {
            fusebox,
            gate,
            light,
            ..
        } => {
            check_ref(errors, kinds, name, "fusebox", fusebox, Some("fusebox"));
            check_ref(errors, kinds, name, "gate", gate, Some("gate"));
            check_ref(errors, kinds, name, "light", light, None);
            if fusebox.is_none() {
                errors.push(ConfigError::MissingLink {
                    object: name.clone(),
                    field: "fusebox",
                });
            }
            if gate.is_none() {
                errors.push(ConfigError::MissingLink {
                    object: name.clone(),
                    field: "gate",
                });
            }
        }
        _ => {}
    }
}

/// An optional reference must resolve, and to the expected kind if given.
fn check_ref(
    errors: &mut Vec<ConfigError>,
    kinds: &HashMap<&str, &ObjectKind>,
    object: &str,
    field: &'static str,
    target: &Option<String>,
    expected: Option<&'static str>,
) {
    let Some(target) = target else { return };
    match kinds.get(target.as_str()) {
        None => errors.push(ConfigError::UnknownReference {
            object: object.to_string(),
            field,
            target: target.clone(),
        }),
        Some(kind) => {
            if let Some(expected) = expected {
                if kind.label() != expected {
                    errors.push(ConfigError::WrongReferenceKind {
                        object: object.to_string(),
                        field,
                        target: target.clone(),
                        expected,
                    });
                }
            }
        }
    }
}
