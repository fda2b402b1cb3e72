//! Level engine - main entry point for running a scene

use std::collections::HashMap;
use std::io::{Read, Write};

use escape_logic::config::{validate_config, DetectionConfig, LevelConfig};
use escape_logic::inventory::Inventory;
use escape_logic::outline::OutlineDetector;
use escape_logic::smoothing::{MeshData, MeshId, NormalBake, NormalCache};
use hecs::{Component, Entity, World};

use crate::bake::{load_bake, save_bake};
use crate::components::*;
use crate::error::EngineError;
use crate::host::{Frame, Host};
use crate::level::{collider_world, spawn_level, LevelIndex};
use crate::spatial::SphereWorld;
use crate::systems::*;

/// Runs one scene: owns the world, the inventory and per-frame state.
pub struct LevelEngine {
    /// ECS world containing every scene object
    pub world: World,
    /// Keys and fuses collected so far
    pub inventory: Inventory,
    /// Frames processed since load
    pub frame_count: u64,

    name: String,
    index: LevelIndex,
    colliders: SphereWorld,
    detection: DetectionConfig,
    meshes: HashMap<MeshId, MeshData>,
    detector: OutlineDetector<Entity>,
    normal_cache: NormalCache,
    loaded_bake: Option<NormalBake>,
    scene: SceneDirector,
    target: Option<Entity>,
    prompt: Option<&'static str>,
    started: bool,
}

impl LevelEngine {
    /// Validate and spawn a level. Every config problem is reported at once.
    pub fn from_config(config: LevelConfig) -> Result<Self, EngineError> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            for e in &errors {
                log::error!("level `{}`: {}", config.name, e);
            }
            return Err(EngineError::InvalidConfig(errors));
        }

        let mut world = World::new();
        let index = spawn_level(&mut world, &config)?;
        log::info!(
            "loaded level `{}` (scene {}) with {} objects",
            config.name,
            config.scene.index,
            index.by_name.len()
        );

        Ok(Self {
            world,
            inventory: Inventory::default(),
            frame_count: 0,
            colliders: collider_world(&config),
            detection: config.detection,
            scene: SceneDirector::from_config(&config.scene),
            meshes: config.meshes.into_iter().map(|m| (m.id, m)).collect(),
            name: config.name,
            index,
            detector: OutlineDetector::new(),
            normal_cache: NormalCache::new(),
            loaded_bake: None,
            target: None,
            prompt: None,
            started: false,
        })
    }

    /// Parse, validate and spawn a level from JSON.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Self::from_config(LevelConfig::from_json(json)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sphere colliders for the level's objects, keyed by the ids the
    /// engine expects back from `sphere_cast`.
    pub fn collider_world(&self) -> SphereWorld {
        self.colliders.clone()
    }

    /// Precompute smooth normals for every outlined mesh of the level.
    pub fn bake_normals(&self) -> NormalBake {
        let mut ids: Vec<MeshId> = self
            .world
            .query::<&OutlineMeshes>()
            .iter()
            .flat_map(|(_, m)| m.meshes.clone())
            .collect();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        NormalBake::bake(ids.iter().filter_map(|id| self.meshes.get(id)))
    }

    /// Write this level's normal bake.
    pub fn save_normals<W: Write>(&self, writer: W) -> Result<(), EngineError> {
        save_bake(writer, &self.bake_normals())?;
        Ok(())
    }

    /// Use a previously saved bake for meshes prepared from now on.
    pub fn load_normals<R: Read>(&mut self, reader: R) -> Result<(), EngineError> {
        let bake = load_bake(reader)?;
        log::info!("loaded normal bake for {} meshes", bake.keys.len());
        self.loaded_bake = Some(bake);
        Ok(())
    }

    /// Run one frame: outline, interaction, animation, then scene flow.
    pub fn update<H: Host + ?Sized>(&mut self, delta_seconds: f32, frame: &Frame, host: &mut H) {
        if !self.started {
            self.start(host);
        }

        outline_style_system(&mut self.world, host);
        let highlighted = outline_detection_system(
            &mut self.world,
            &self.index,
            &mut self.detector,
            &self.detection,
            &frame.pose,
            host,
        );

        self.target = select_interaction_target(&self.world, frame.pose.position, highlighted);
        let prompt = interaction_system(
            &mut self.world,
            &mut self.inventory,
            frame,
            self.target,
            highlighted,
            host,
        );
        if prompt != self.prompt {
            match prompt {
                Some(text) => host.show_prompt(text),
                None => host.hide_prompt(),
            }
            self.prompt = prompt;
        }

        animation_system(&mut self.world, delta_seconds, host);
        self.scene.update(&self.world, delta_seconds, frame, host);

        self.frame_count += 1;
    }

    fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        outline_setup_system(
            &mut self.world,
            &self.meshes,
            &mut self.normal_cache,
            self.loaded_bake.as_ref(),
            host,
        );
        for (_, (name, active)) in self.world.query_mut::<(&Name, &Active)>() {
            if !active.0 {
                host.set_active(name.as_str(), false);
            }
        }
        self.started = true;
    }

    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.index.entity(name)
    }

    /// Copy of a named object's component, if it has one.
    pub fn get<T: Component + Clone>(&self, name: &str) -> Option<T> {
        let entity = self.entity(name)?;
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.get::<Active>(name).map(|a| a.0).unwrap_or(false)
    }

    /// Name of the outlined object, if any.
    pub fn highlighted(&self) -> Option<String> {
        self.detector
            .current()
            .and_then(|e| self.world.get::<&Name>(e).ok().map(|n| n.0.clone()))
    }

    /// Name of this frame's interaction target, if any.
    pub fn target(&self) -> Option<String> {
        self.target
            .and_then(|e| self.world.get::<&Name>(e).ok().map(|n| n.0.clone()))
    }

    /// Prompt currently on screen.
    pub fn prompt(&self) -> Option<&'static str> {
        self.prompt
    }
}
