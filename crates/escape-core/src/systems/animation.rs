//! Animation system - advances doors, levers and gates each frame.

use escape_logic::door::Door;
use escape_logic::gate::Gate;
use escape_logic::lever::Lever;
use hecs::World;

use crate::components::{Name, Transform};
use crate::host::Presentation;

/// Step every moving object by `dt` seconds and push new rotations to the
/// host. Resting objects are left alone.
pub fn animation_system<P: Presentation + ?Sized>(world: &mut World, dt: f32, host: &mut P) {
    for (_, (name, door, transform)) in world.query_mut::<(&Name, &mut Door, &mut Transform)>() {
        if !door.state().is_moving() {
            continue;
        }
        let done = door.advance(dt).is_done();
        transform.rotation = door.rotation();
        host.set_rotation(name.as_str(), transform.rotation);
        if done {
            log::debug!("door `{}` came to rest {:?}", name, door.state());
        }
    }

    for (_, (name, lever, transform)) in world.query_mut::<(&Name, &mut Lever, &mut Transform)>() {
        let before = lever.rotation();
        lever.advance(dt);
        if lever.rotation() != before {
            transform.rotation = lever.rotation();
            host.set_rotation(name.as_str(), transform.rotation);
        }
    }

    for (_, (name, gate, transform)) in world.query_mut::<(&Name, &mut Gate, &mut Transform)>() {
        if !gate.in_transition() {
            continue;
        }
        let done = gate.advance(dt).is_done();
        transform.rotation = gate.rotation();
        host.set_rotation(name.as_str(), transform.rotation);
        if done {
            log::info!("gate `{}` is now {:?}", name, gate.state());
        }
    }
}
