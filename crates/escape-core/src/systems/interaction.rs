//! Interaction system - one proximity pass, one target, one dispatch.
//!
//! Each frame computes the viewer's distance to every live interactable
//! once, picks a single target, routes the frame's key presses to it, and
//! then shows that target's prompt.

use escape_logic::collectible::{Collectible, Pickup};
use escape_logic::door::{Door, DoorToggle, MotionState};
use escape_logic::escape::EscapePoint;
use escape_logic::fusebox::{FusePlacement, Fusebox};
use escape_logic::gate::Gate;
use escape_logic::interaction::{actions_for_key, select_target, Action, Candidate, Reach};
use escape_logic::inventory::Inventory;
use escape_logic::lever::{Lever, LeverPull};
use hecs::{Entity, World};

use crate::components::{Active, FuseboxLinks, Interactable, LeverLinks, Name, Transform};
use crate::host::{Cue, Frame, Presentation};

/// Did the target accept the action?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Handled,
    NotApplicable,
}

fn name_of(world: &World, entity: Entity) -> String {
    world
        .get::<&Name>(entity)
        .map(|n| n.0.clone())
        .unwrap_or_default()
}

fn set_active<P: Presentation + ?Sized>(world: &mut World, entity: Entity, on: bool, host: &mut P) {
    if let Ok(mut active) = world.get::<&mut Active>(entity) {
        active.0 = on;
    }
    host.set_active(&name_of(world, entity), on);
}

/// Pick this frame's interaction target.
///
/// Collectibles only count while outlined, since they can't be picked up
/// otherwise.
pub fn select_interaction_target(
    world: &World,
    viewer: glam::Vec3,
    highlighted: Option<Entity>,
) -> Option<Entity> {
    let mut candidates = Vec::new();
    let mut query = world.query::<(&Transform, &Interactable, &Active, Option<&Collectible>)>();
    for (entity, (transform, interactable, active, collectible)) in query.iter() {
        if !active.0 || !interactable.enabled {
            continue;
        }
        let is_highlighted = highlighted == Some(entity);
        if collectible.is_some() && !is_highlighted {
            continue;
        }
        candidates.push(Candidate {
            id: entity,
            distance: transform.position.distance(viewer),
            range: interactable.range,
            highlighted: is_highlighted,
        });
    }
    select_target(&candidates)
}

/// Route key presses to the target, then refresh the prompt. Returns the
/// prompt to display.
pub fn interaction_system<P: Presentation + ?Sized>(
    world: &mut World,
    inventory: &mut Inventory,
    frame: &Frame,
    target: Option<Entity>,
    highlighted: Option<Entity>,
    host: &mut P,
) -> Option<&'static str> {
    let target = target?;
    let reach = Reach::new(true, highlighted == Some(target));

    for key in &frame.pressed {
        for action in actions_for_key(*key) {
            if dispatch(world, inventory, target, *action, reach, host) == Dispatch::Handled {
                break;
            }
        }
    }

    prompt_for(world, inventory, target, reach)
}

fn dispatch<P: Presentation + ?Sized>(
    world: &mut World,
    inventory: &mut Inventory,
    target: Entity,
    action: Action,
    reach: Reach,
    host: &mut P,
) -> Dispatch {
    match action {
        Action::Pickup => pickup(world, inventory, target, reach, host),
        Action::Toggle => toggle_door(world, inventory, target, reach, host),
        Action::Place => place_fuse(world, inventory, target, reach, host),
        Action::Pull => pull_lever(world, target, reach, host),
        Action::Escape => escape(world, target, reach),
    }
}

fn pickup<P: Presentation + ?Sized>(
    world: &mut World,
    inventory: &mut Inventory,
    target: Entity,
    reach: Reach,
    host: &mut P,
) -> Dispatch {
    let Ok((name, collectible, active)) =
        world.query_one_mut::<(&Name, &mut Collectible, &mut Active)>(target)
    else {
        return Dispatch::NotApplicable;
    };
    if let Pickup::Collected { kind, id, .. } = collectible.collect(reach, inventory) {
        active.0 = false;
        host.set_active(name.as_str(), false);
        host.play_cue(Cue::ItemCollected, name.as_str());
        log::info!("{} has been collected ({:?} `{}`)", name, kind, id);
    }
    Dispatch::Handled
}

fn toggle_door<P: Presentation + ?Sized>(
    world: &mut World,
    inventory: &Inventory,
    target: Entity,
    reach: Reach,
    host: &mut P,
) -> Dispatch {
    let Ok((name, door)) = world.query_one_mut::<(&Name, &mut Door)>(target) else {
        return Dispatch::NotApplicable;
    };
    match door.toggle(reach, inventory) {
        DoorToggle::OutOfReach => {}
        DoorToggle::Locked => {
            host.play_cue(Cue::DoorLocked, name.as_str());
            log::info!(
                "door `{}` is locked, needs key `{}`",
                name,
                door.required_key().unwrap_or_default()
            );
        }
        DoorToggle::Moving { state, unlocked } => {
            if unlocked {
                host.play_cue(Cue::DoorUnlocked, name.as_str());
                log::info!("door `{}` unlocked", name);
            }
            let cue = match state {
                MotionState::Opening | MotionState::Open => Cue::DoorOpening,
                MotionState::Closing | MotionState::Closed => Cue::DoorClosing,
            };
            host.play_cue(cue, name.as_str());
            log::debug!("door `{}` now {:?}", name, state);
        }
    }
    Dispatch::Handled
}

fn place_fuse<P: Presentation + ?Sized>(
    world: &mut World,
    inventory: &Inventory,
    target: Entity,
    reach: Reach,
    host: &mut P,
) -> Dispatch {
    let Ok((name, fusebox, interactable, links)) = world
        .query_one_mut::<(&Name, &mut Fusebox, &mut Interactable, Option<&FuseboxLinks>)>(target)
    else {
        return Dispatch::NotApplicable;
    };
    let links = links.copied().unwrap_or_default();
    let name = name.0.clone();

    match fusebox.place(reach, inventory) {
        FusePlacement::Placed => {
            interactable.enabled = false;
            host.play_cue(Cue::FusePlaced, &name);
            log::info!("Fuse placed in fusebox `{}`", name);

            match links.fuse_in_box {
                Some(model) => set_active(world, model, true, host),
                None => log::warn!("fusebox `{}` has no in-box fuse to light", name),
            }
            if let Some(source) = links.source_fuse {
                if let Ok(mut collectible) = world.get::<&mut Collectible>(source) {
                    collectible.disable();
                }
            }
        }
        FusePlacement::MissingFuse => log::debug!("fusebox `{}` still needs a fuse", name),
        FusePlacement::AlreadyPlaced | FusePlacement::OutOfReach => {}
    }
    Dispatch::Handled
}

fn pull_lever<P: Presentation + ?Sized>(
    world: &mut World,
    target: Entity,
    reach: Reach,
    host: &mut P,
) -> Dispatch {
    let Ok(links) = world.get::<&LeverLinks>(target).map(|l| *l) else {
        return Dispatch::NotApplicable;
    };
    let fuse_placed = world
        .get::<&Fusebox>(links.fusebox)
        .map(|f| f.is_fuse_placed())
        .unwrap_or(false);

    let Ok((name, lever, interactable)) =
        world.query_one_mut::<(&Name, &mut Lever, &mut Interactable)>(target)
    else {
        return Dispatch::NotApplicable;
    };
    let name = name.0.clone();

    match lever.pull(reach, fuse_placed) {
        LeverPull::Pulled => {
            interactable.enabled = false;
            host.play_cue(Cue::LeverPulled, &name);
            log::info!("Lever `{}` pulled down", name);

            if let Some(light) = links.light {
                set_active(world, light, true, host);
            }
            let gate_name = name_of(world, links.gate);
            if let Ok(mut gate) = world.get::<&mut Gate>(links.gate) {
                if gate.open() {
                    host.play_cue(Cue::GateMoving, &gate_name);
                    log::info!("gate `{}` opening", gate_name);
                }
            }
        }
        LeverPull::NoPower => log::debug!("lever `{}` has no power", name),
        LeverPull::AlreadyPulled | LeverPull::OutOfReach => {}
    }
    Dispatch::Handled
}

fn escape(world: &mut World, target: Entity, reach: Reach) -> Dispatch {
    let Ok((name, point)) = world.query_one_mut::<(&Name, &mut EscapePoint)>(target) else {
        return Dispatch::NotApplicable;
    };
    if point.attempt(reach) {
        log::info!("Player pressed E to escape via `{}`", name);
    }
    Dispatch::Handled
}

/// Prompt for the target after this frame's actions.
fn prompt_for(
    world: &World,
    inventory: &Inventory,
    target: Entity,
    reach: Reach,
) -> Option<&'static str> {
    if let Ok(collectible) = world.get::<&Collectible>(target) {
        return collectible.prompt(reach);
    }
    if let Ok(fusebox) = world.get::<&Fusebox>(target) {
        return fusebox.prompt(reach, inventory);
    }
    if let Ok(lever) = world.get::<&Lever>(target) {
        let fuse_placed = world
            .get::<&LeverLinks>(target)
            .ok()
            .and_then(|links| world.get::<&Fusebox>(links.fusebox).ok().map(|f| f.is_fuse_placed()))
            .unwrap_or(false);
        return lever.prompt(reach, fuse_placed);
    }
    if let Ok(point) = world.get::<&EscapePoint>(target) {
        return point.prompt(reach);
    }
    None
}
