//! Host-side collaborators.
//!
//! The engine never renders, plays audio, raycasts or loads scenes itself.
//! The host implements these traits; every presentation and scene method
//! has a no-op default, so a host without, say, audio simply skips cues.

use escape_logic::interaction::Key;
use escape_logic::outline::{PassSettings, RayHit};
use escape_logic::smoothing::PreparedMesh;
use glam::{Quat, Vec3};

/// Identity of a collider in the host's spatial query.
pub type ColliderId = u64;

/// Viewer position and look direction, sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl ViewerPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    /// Pose at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }
}

/// One frame of host input.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub pose: ViewerPose,
    /// Keys pressed this frame (edge-triggered, not held).
    pub pressed: Vec<Key>,
}

impl Frame {
    pub fn new(pose: ViewerPose) -> Self {
        Self {
            pose,
            pressed: Vec::new(),
        }
    }

    pub fn press(mut self, key: Key) -> Self {
        self.pressed.push(key);
        self
    }
}

/// Named audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    DoorLocked,
    DoorUnlocked,
    DoorOpening,
    DoorClosing,
    ItemCollected,
    FusePlaced,
    LeverPulled,
    GateMoving,
}

/// Thick-ray hit test against scene geometry.
pub trait SpatialQuery {
    /// All colliders a sphere of `radius` swept from `origin` along
    /// `direction` touches within `max_distance`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
    ) -> Vec<RayHit<ColliderId>>;
}

/// Prompt text, audio, visibility and render state.
pub trait Presentation {
    fn show_prompt(&mut self, _text: &str) {}
    fn hide_prompt(&mut self) {}
    fn play_cue(&mut self, _cue: Cue, _source: &str) {}
    fn set_active(&mut self, _object: &str, _active: bool) {}
    fn set_rotation(&mut self, _object: &str, _rotation: Quat) {}
    /// Replace one renderer's material pass list.
    fn set_render_passes(&mut self, _object: &str, _renderer: usize, _passes: &[String]) {}
    fn set_outline_settings(&mut self, _object: &str, _settings: &PassSettings) {}
    fn upload_smooth_normals(&mut self, _mesh: &PreparedMesh) {}
}

/// Scene loading.
pub trait SceneService {
    fn play_transition(&mut self) {}
    fn load_scene(&mut self, _index: u32) {}
    fn quit(&mut self) {}
}

/// Everything the engine needs from its host.
pub trait Host: SpatialQuery + Presentation + SceneService {}

impl<T: SpatialQuery + Presentation + SceneService> Host for T {}

/// A host that records every call; backed by an in-memory sphere world.
/// Used by the headless harness and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub spatial: crate::spatial::SphereWorld,
    pub prompt: Option<String>,
    pub prompt_changes: usize,
    pub cues: Vec<(Cue, String)>,
    pub active: std::collections::HashMap<String, bool>,
    pub passes: std::collections::HashMap<(String, usize), Vec<String>>,
    pub outline_settings: std::collections::HashMap<String, PassSettings>,
    pub uploaded_meshes: Vec<PreparedMesh>,
    pub rotations: std::collections::HashMap<String, Quat>,
    pub transitions: usize,
    pub loaded_scenes: Vec<u32>,
    pub quit: bool,
}

impl RecordingHost {
    pub fn new(spatial: crate::spatial::SphereWorld) -> Self {
        Self {
            spatial,
            ..Self::default()
        }
    }

    pub fn cue_count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|(c, _)| *c == cue).count()
    }

    pub fn is_active(&self, object: &str) -> Option<bool> {
        self.active.get(object).copied()
    }
}

impl SpatialQuery for RecordingHost {
    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
    ) -> Vec<RayHit<ColliderId>> {
        self.spatial.sphere_cast(origin, direction, radius, max_distance)
    }
}

impl Presentation for RecordingHost {
    fn show_prompt(&mut self, text: &str) {
        self.prompt = Some(text.to_string());
        self.prompt_changes += 1;
    }

    fn hide_prompt(&mut self) {
        self.prompt = None;
        self.prompt_changes += 1;
    }

    fn play_cue(&mut self, cue: Cue, source: &str) {
        self.cues.push((cue, source.to_string()));
    }

    fn set_active(&mut self, object: &str, active: bool) {
        self.active.insert(object.to_string(), active);
    }

    fn set_rotation(&mut self, object: &str, rotation: Quat) {
        self.rotations.insert(object.to_string(), rotation);
    }

    fn set_render_passes(&mut self, object: &str, renderer: usize, passes: &[String]) {
        self.passes
            .insert((object.to_string(), renderer), passes.to_vec());
    }

    fn set_outline_settings(&mut self, object: &str, settings: &PassSettings) {
        self.outline_settings.insert(object.to_string(), *settings);
    }

    fn upload_smooth_normals(&mut self, mesh: &PreparedMesh) {
        self.uploaded_meshes.push(mesh.clone());
    }
}

impl SceneService for RecordingHost {
    fn play_transition(&mut self) {
        self.transitions += 1;
    }

    fn load_scene(&mut self, index: u32) {
        self.loaded_scenes.push(index);
    }

    fn quit(&mut self) {
        self.quit = true;
    }
}
