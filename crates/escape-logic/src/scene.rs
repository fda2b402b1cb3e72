//! Scene navigation: title screen, timed intro, end-game trigger.
//!
//! None of these load anything themselves. They emit [`SceneCommand`]s for
//! the host's scene service.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::scenes;
use crate::interaction::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// Start the fade-out animation.
    PlayTransition,
    Load(u32),
    Quit,
}

/// Fade-out then load, after a fixed delay. Requests made while a
/// transition is running are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTransition {
    delay: f32,
    pending: Option<(u32, f32)>,
}

impl Default for SceneTransition {
    fn default() -> Self {
        Self::new(scenes::TRANSITION_DELAY_SECS)
    }
}

impl SceneTransition {
    pub fn new(delay: f32) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `PlayTransition` if the request was accepted.
    pub fn request(&mut self, target: u32) -> Option<SceneCommand> {
        if self.pending.is_some() {
            return None;
        }
        self.pending = Some((target, self.delay));
        Some(SceneCommand::PlayTransition)
    }

    /// Returns `Load` once the delay has run out.
    pub fn advance(&mut self, dt: f32) -> Option<SceneCommand> {
        let (target, remaining) = self.pending.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        let target = *target;
        self.pending = None;
        Some(SceneCommand::Load(target))
    }
}

/// Title/menu scene: click to continue to the next scene, Escape to quit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleScreen {
    pub scene_index: u32,
    transition: SceneTransition,
}

impl TitleScreen {
    pub fn new(scene_index: u32) -> Self {
        Self {
            scene_index,
            transition: SceneTransition::default(),
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.transition = SceneTransition::new(delay);
        self
    }

    pub fn on_key(&mut self, key: Key) -> Option<SceneCommand> {
        match key {
            Key::PrimaryClick => self.transition.request(self.scene_index.saturating_add(1)),
            Key::Escape => Some(SceneCommand::Quit),
            Key::E | Key::P => None,
        }
    }

    pub fn advance(&mut self, dt: f32) -> Option<SceneCommand> {
        self.transition.advance(dt)
    }
}

/// Intro that switches scene after a number of frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedSwitch {
    pub frames: u32,
    pub target: u32,
    elapsed: u32,
    fired: bool,
}

impl Default for TimedSwitch {
    fn default() -> Self {
        Self::new(scenes::INTRO_FRAMES, scenes::GAME)
    }
}

impl TimedSwitch {
    pub fn new(frames: u32, target: u32) -> Self {
        Self {
            frames,
            target,
            elapsed: 0,
            fired: false,
        }
    }

    /// Count one frame. Fires once, on the first frame past the threshold.
    pub fn tick(&mut self) -> Option<SceneCommand> {
        if self.fired {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed > self.frames {
            self.fired = true;
            Some(SceneCommand::Load(self.target))
        } else {
            None
        }
    }
}

/// Spherical trigger volume that ends the game on interact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndTrigger {
    pub center: Vec3,
    pub radius: f32,
    pub target: u32,
}

impl EndTrigger {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            target: scenes::END,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance(point) <= self.radius
    }

    pub fn on_interact(&self, player: Vec3) -> Option<SceneCommand> {
        self.contains(player).then_some(SceneCommand::Load(self.target))
    }
}
