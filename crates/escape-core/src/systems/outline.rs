//! Outline systems - mesh preparation, styling and look-at highlighting.

use std::collections::HashMap;

use escape_logic::config::DetectionConfig;
use escape_logic::outline::{nearest_hit, Highlightable, OutlineDetector, OutlineTarget};
use escape_logic::smoothing::{MeshData, MeshId, NormalBake, NormalCache};
use hecs::{Entity, World};

use crate::components::{Active, Name, OutlineMeshes};
use crate::host::{Host, Presentation, ViewerPose};
use crate::level::LevelIndex;

fn push_passes<P: Presentation + ?Sized>(host: &mut P, name: &Name, target: &OutlineTarget) {
    for (i, renderer) in target.renderers.iter().enumerate() {
        host.set_render_passes(name.as_str(), i, &renderer.passes);
    }
}

/// First-frame setup: start every target un-highlighted and upload smoothed
/// normals for each distinct mesh not seen before.
pub fn outline_setup_system<P: Presentation + ?Sized>(
    world: &mut World,
    meshes: &HashMap<MeshId, MeshData>,
    cache: &mut NormalCache,
    loaded_bake: Option<&NormalBake>,
    host: &mut P,
) {
    for (_, (name, target, outline_meshes)) in
        world.query_mut::<(&Name, &mut OutlineTarget, Option<&OutlineMeshes>)>()
    {
        target.disable_highlight();
        push_passes(host, name, target);

        let Some(outline_meshes) = outline_meshes else {
            continue;
        };
        let bake = outline_meshes.bake.as_ref().or(loaded_bake);
        for id in &outline_meshes.meshes {
            let Some(mesh) = meshes.get(id) else {
                log::warn!("`{}` draws mesh {} which the level does not define", name, id.0);
                continue;
            };
            if let Some(prepared) = cache.prepare(mesh, bake) {
                host.upload_smooth_normals(&prepared);
            }
        }
    }
    log::debug!("prepared smooth normals for {} meshes", cache.len());
}

/// Push outline pass settings for targets whose style changed.
pub fn outline_style_system<P: Presentation + ?Sized>(world: &mut World, host: &mut P) {
    for (_, (name, target)) in world.query_mut::<(&Name, &mut OutlineTarget)>() {
        if let Some(settings) = target.refresh_settings() {
            host.set_outline_settings(name.as_str(), &settings);
        }
    }
}

fn set_highlight<P: Presentation + ?Sized>(world: &mut World, entity: Entity, on: bool, host: &mut P) {
    let Ok((name, target)) = world.query_one_mut::<(&Name, &mut OutlineTarget)>(entity) else {
        return;
    };
    if on {
        target.enable_highlight();
    } else {
        target.disable_highlight();
    }
    push_passes(host, name, target);
}

/// Sphere-cast from the viewer and keep exactly the looked-at outline target
/// highlighted. Returns the highlighted entity.
///
/// Hits on inactive objects are discarded. The nearest remaining hit wins,
/// even if it cannot be outlined (walls occlude).
pub fn outline_detection_system<H: Host + ?Sized>(
    world: &mut World,
    index: &LevelIndex,
    detector: &mut OutlineDetector<Entity>,
    detection: &DetectionConfig,
    pose: &ViewerPose,
    host: &mut H,
) -> Option<Entity> {
    let hits: Vec<_> = host
        .sphere_cast(
            pose.position,
            pose.forward,
            detection.spherecast_radius,
            detection.ray_length,
        )
        .into_iter()
        .filter(|hit| match index.collider_owner(hit.id) {
            Some(owner) => world.get::<&Active>(owner).map(|a| a.0).unwrap_or(false),
            None => true,
        })
        .collect();

    let hit_owner = nearest_hit(&hits).and_then(|hit| index.collider_owner(hit.id));
    if let Some(owner) = hit_owner {
        if let Ok(name) = world.get::<&Name>(owner) {
            log::debug!("sphere-cast hit {}", *name);
        }
    }

    let candidate = hit_owner.filter(|e| world.get::<&OutlineTarget>(*e).is_ok());
    let change = detector.observe(candidate);
    if let Some(off) = change.disable {
        set_highlight(world, off, false, host);
    }
    if let Some(on) = change.enable {
        set_highlight(world, on, true, host);
    }
    detector.current()
}
