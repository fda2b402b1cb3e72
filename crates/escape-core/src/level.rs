//! Level spawning - turns a validated `LevelConfig` into world entities.

use std::collections::HashMap;

use escape_logic::collectible::Collectible;
use escape_logic::config::{ConfigError, LevelConfig, ObjectConfig, ObjectKind};
use escape_logic::door::Door;
use escape_logic::escape::EscapePoint;
use escape_logic::fusebox::Fusebox;
use escape_logic::gate::Gate;
use escape_logic::lever::Lever;
use escape_logic::outline::{MaterialSet, OutlineTarget};
use escape_logic::scene::EndTrigger;
use escape_logic::smoothing::{MeshData, MeshId, NormalBake};
use hecs::{Entity, EntityBuilder, World};

use crate::components::*;
use crate::error::EngineError;
use crate::host::ColliderId;
use crate::spatial::SphereWorld;

/// Lookups from config names and collider ids to entities.
#[derive(Debug, Clone, Default)]
pub struct LevelIndex {
    pub by_name: HashMap<String, Entity>,
    pub by_collider: HashMap<ColliderId, Entity>,
}

impl LevelIndex {
    pub fn entity(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }

    pub fn collider_owner(&self, id: ColliderId) -> Option<Entity> {
        self.by_collider.get(&id).copied()
    }
}

/// Collider ids are assigned in object order, starting at 1, to objects
/// that declare a collider.
fn collider_ids(level: &LevelConfig) -> impl Iterator<Item = (ColliderId, &ObjectConfig, f32)> {
    level
        .objects
        .iter()
        .filter_map(|o| o.collider.map(|r| (o, r)))
        .enumerate()
        .map(|(i, (o, r))| (i as ColliderId + 1, o, r))
}

/// Sphere colliders matching the ids the engine will use for this level.
pub fn collider_world(level: &LevelConfig) -> SphereWorld {
    let mut world = SphereWorld::new();
    for (id, obj, radius) in collider_ids(level) {
        world.insert(id, obj.position, radius);
    }
    world
}

/// Spawn every object of the level. The config must already be valid.
pub fn spawn_level(world: &mut World, level: &LevelConfig) -> Result<LevelIndex, EngineError> {
    let meshes: HashMap<MeshId, &MeshData> = level.meshes.iter().map(|m| (m.id, m)).collect();
    let colliders: HashMap<&str, (ColliderId, f32)> = collider_ids(level)
        .map(|(id, obj, r)| (obj.name.as_str(), (id, r)))
        .collect();

    let mut index = LevelIndex::default();

    for obj in &level.objects {
        let mut builder = EntityBuilder::new();
        let transform = Transform::from_euler_deg(obj.position, obj.rotation);
        builder.add(Name(obj.name.clone()));
        builder.add(transform);
        builder.add(Active(obj.active));

        if let Some(&(id, radius)) = colliders.get(obj.name.as_str()) {
            builder.add(Collider { id, radius });
        }

        if let Some(outline) = &obj.outline {
            let renderers = outline
                .renderers
                .iter()
                .map(|passes| MaterialSet::new(passes.iter().cloned()))
                .collect();
            builder.add(OutlineTarget::new(renderers, outline.style));
            let bake = outline.precompute.then(|| {
                NormalBake::bake(outline.meshes.iter().filter_map(|id| meshes.get(id).copied()))
            });
            builder.add(OutlineMeshes {
                meshes: outline.meshes.clone(),
                bake,
            });
        }

        add_kind(&mut builder, obj, transform);

        let entity = world.spawn(builder.build());
        index.by_name.insert(obj.name.clone(), entity);
        if let Some(&(id, _)) = colliders.get(obj.name.as_str()) {
            index.by_collider.insert(id, entity);
        }
    }

    link_objects(world, level, &index)?;
    Ok(index)
}

fn add_kind(builder: &mut EntityBuilder, obj: &ObjectConfig, transform: Transform) {
    match &obj.kind {
        ObjectKind::Prop => {}
        ObjectKind::Collectible { item, id, range } => {
            builder.add(Collectible::new(*item, id.clone()));
            builder.add(Interactable::new(*range));
        }
        ObjectKind::Door {
            required_key,
            range,
            open_angle,
            rate,
        } => {
            let mut door = Door::with_swing(transform.rotation, *open_angle, *rate);
            if let Some(key) = required_key {
                door = door.with_lock(key.clone());
            }
            builder.add(door);
            builder.add(Interactable::new(*range));
        }
        ObjectKind::Fusebox {
            required_fuse,
            range,
            ..
        } => {
            builder.add(Fusebox::new(required_fuse.clone()));
            builder.add(Interactable::new(*range));
        }
        ObjectKind::Lever {
            range, angle, rate, ..
        } => {
            builder.add(Lever::with_throw(transform.rotation, *angle, *rate));
            builder.add(Interactable::new(*range));
        }
        ObjectKind::Gate { open_angle, rate } => {
            builder.add(Gate::with_swing(transform.rotation, *open_angle, *rate));
        }
        ObjectKind::Escape { range } => {
            builder.add(EscapePoint::new());
            builder.add(Interactable::new(*range));
        }
        ObjectKind::EndTrigger { radius, target } => {
            let mut trigger = EndTrigger::new(obj.position, *radius);
            trigger.target = *target;
            builder.add(trigger);
        }
    }
}

fn resolve(index: &LevelIndex, name: &Option<String>) -> Option<Entity> {
    name.as_deref().and_then(|n| index.entity(n))
}

fn missing(object: &str, field: &'static str) -> EngineError {
    EngineError::InvalidConfig(vec![ConfigError::MissingLink {
        object: object.to_string(),
        field,
    }])
}

/// Attach fusebox and lever links. Objects switched on by the puzzle start
/// switched off.
fn link_objects(world: &mut World, level: &LevelConfig, index: &LevelIndex) -> Result<(), EngineError> {
    let mut start_inactive = Vec::new();

    for obj in &level.objects {
        let Some(entity) = index.entity(&obj.name) else {
            continue;
        };
        match &obj.kind {
            ObjectKind::Fusebox {
                fuse_in_box,
                source_fuse,
                ..
            } => {
                let links = FuseboxLinks {
                    fuse_in_box: resolve(index, fuse_in_box),
                    source_fuse: resolve(index, source_fuse),
                };
                start_inactive.extend(links.fuse_in_box);
                if world.insert_one(entity, links).is_err() {
                    log::warn!("fusebox `{}` vanished before linking", obj.name);
                }
            }
            ObjectKind::Lever {
                fusebox,
                gate,
                light,
                ..
            } => {
                let links = LeverLinks {
                    fusebox: resolve(index, fusebox).ok_or_else(|| missing(&obj.name, "fusebox"))?,
                    gate: resolve(index, gate).ok_or_else(|| missing(&obj.name, "gate"))?,
                    light: resolve(index, light),
                };
                start_inactive.extend(links.light);
                if world.insert_one(entity, links).is_err() {
                    log::warn!("lever `{}` vanished before linking", obj.name);
                }
            }
            _ => {}
        }
    }

    for entity in start_inactive {
        if let Ok(mut active) = world.get::<&mut Active>(entity) {
            active.0 = false;
        }
    }
    Ok(())
}
