//! Scene director - drives the scene's hand-over to the next one.

use escape_logic::config::{SceneConfig, SceneFlow};
use escape_logic::interaction::Key;
use escape_logic::scene::{EndTrigger, SceneCommand, TimedSwitch, TitleScreen};
use hecs::World;

use crate::components::Active;
use crate::host::{Frame, SceneService};

/// Per-scene flow state.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneDirector {
    /// Playable level: pressing E inside an active end trigger leaves.
    Level,
    Title(TitleScreen),
    Intro(TimedSwitch),
}

impl SceneDirector {
    pub fn from_config(scene: &SceneConfig) -> Self {
        match scene.flow {
            SceneFlow::Level => SceneDirector::Level,
            SceneFlow::Title { delay } => {
                SceneDirector::Title(TitleScreen::new(scene.index).with_delay(delay))
            }
            SceneFlow::Intro { frames, target } => {
                SceneDirector::Intro(TimedSwitch::new(frames, target))
            }
        }
    }

    pub fn update<S: SceneService + ?Sized>(
        &mut self,
        world: &World,
        dt: f32,
        frame: &Frame,
        host: &mut S,
    ) {
        match self {
            SceneDirector::Level => {
                if !frame.pressed.contains(&Key::E) {
                    return;
                }
                let mut query = world.query::<(&EndTrigger, &Active)>();
                let command = query
                    .iter()
                    .filter(|(_, (_, active))| active.0)
                    .find_map(|(_, (trigger, _))| trigger.on_interact(frame.pose.position));
                if let Some(command) = command {
                    apply(command, host);
                }
            }
            SceneDirector::Title(title) => {
                for key in &frame.pressed {
                    if let Some(command) = title.on_key(*key) {
                        apply(command, host);
                    }
                }
                if let Some(command) = title.advance(dt) {
                    apply(command, host);
                }
            }
            SceneDirector::Intro(intro) => {
                if let Some(command) = intro.tick() {
                    apply(command, host);
                }
            }
        }
    }
}

fn apply<S: SceneService + ?Sized>(command: SceneCommand, host: &mut S) {
    log::info!("scene command {:?}", command);
    match command {
        SceneCommand::PlayTransition => host.play_transition(),
        SceneCommand::Load(index) => host.load_scene(index),
        SceneCommand::Quit => host.quit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{RecordingHost, ViewerPose};
    use glam::Vec3;

    fn frame_at(position: Vec3) -> Frame {
        Frame::new(ViewerPose::new(position, Vec3::NEG_Z))
    }

    #[test]
    fn title_click_fades_then_loads_next() {
        let scene = SceneConfig {
            index: 0,
            flow: SceneFlow::Title { delay: 1.0 },
        };
        let mut director = SceneDirector::from_config(&scene);
        let world = World::new();
        let mut host = RecordingHost::default();

        director.update(&world, 0.1, &frame_at(Vec3::ZERO).press(Key::PrimaryClick), &mut host);
        assert_eq!(host.transitions, 1);
        assert!(host.loaded_scenes.is_empty());

        for _ in 0..10 {
            director.update(&world, 0.1, &frame_at(Vec3::ZERO), &mut host);
        }
        assert_eq!(host.loaded_scenes, vec![1]);
    }

    #[test]
    fn title_escape_quits() {
        let scene = SceneConfig {
            index: 0,
            flow: SceneFlow::Title { delay: 1.0 },
        };
        let mut director = SceneDirector::from_config(&scene);
        let mut host = RecordingHost::default();
        director.update(&World::new(), 0.1, &frame_at(Vec3::ZERO).press(Key::Escape), &mut host);
        assert!(host.quit);
    }

    #[test]
    fn intro_switches_after_frame_count() {
        let scene = SceneConfig {
            index: 1,
            flow: SceneFlow::Intro { frames: 3, target: 2 },
        };
        let mut director = SceneDirector::from_config(&scene);
        let world = World::new();
        let mut host = RecordingHost::default();
        for _ in 0..3 {
            director.update(&world, 0.016, &frame_at(Vec3::ZERO), &mut host);
        }
        assert!(host.loaded_scenes.is_empty());
        for _ in 0..5 {
            director.update(&world, 0.016, &frame_at(Vec3::ZERO), &mut host);
        }
        assert_eq!(host.loaded_scenes, vec![2]);
    }

    #[test]
    fn end_trigger_needs_e_inside_radius() {
        let mut world = World::new();
        let mut trigger = EndTrigger::new(Vec3::new(10.0, 0.0, 0.0), 2.0);
        trigger.target = 3;
        world.spawn((trigger, Active(true)));

        let mut director = SceneDirector::Level;
        let mut host = RecordingHost::default();

        director.update(&world, 0.016, &frame_at(Vec3::new(9.0, 0.0, 0.0)), &mut host);
        director.update(&world, 0.016, &frame_at(Vec3::ZERO).press(Key::E), &mut host);
        assert!(host.loaded_scenes.is_empty());

        director.update(&world, 0.016, &frame_at(Vec3::new(9.0, 0.0, 0.0)).press(Key::E), &mut host);
        assert_eq!(host.loaded_scenes, vec![3]);
    }
}
