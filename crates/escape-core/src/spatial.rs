//! In-memory spatial query over sphere colliders.
//!
//! Good enough for headless runs: every collider is a sphere, and a sphere
//! cast is a ray test against each sphere inflated by the cast radius.

use escape_logic::outline::RayHit;
use glam::Vec3;

use crate::host::{ColliderId, SpatialQuery};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub id: ColliderId,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    colliders: Vec<SphereCollider>,
}

impl SphereWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ColliderId, center: Vec3, radius: f32) {
        self.colliders.retain(|c| c.id != id);
        self.colliders.push(SphereCollider { id, center, radius });
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

/// Distance along a unit `dir` from `origin` to the first point of a sphere,
/// or 0 if the origin is already inside.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(dir);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}

impl SpatialQuery for SphereWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        radius: f32,
        max_distance: f32,
    ) -> Vec<RayHit<ColliderId>> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Vec::new();
        }
        self.colliders
            .iter()
            .filter_map(|c| {
                let t = ray_sphere(origin, dir, c.center, c.radius + radius)?;
                (t <= max_distance).then_some(RayHit {
                    id: c.id,
                    distance: t,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_sphere_ahead() {
        let mut world = SphereWorld::new();
        world.insert(1, Vec3::new(0.0, 0.0, -5.0), 0.5);
        let hits = world.sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 0.0, 100.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 4.5).abs() < 1e-5);
    }

    #[test]
    fn thickness_widens_hit() {
        let mut world = SphereWorld::new();
        world.insert(1, Vec3::new(1.2, 0.0, -5.0), 0.5);
        assert!(world.sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 0.0, 100.0).is_empty());
        assert_eq!(world.sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 1.0, 100.0).len(), 1);
    }

    #[test]
    fn behind_and_far_are_missed() {
        let mut world = SphereWorld::new();
        world.insert(1, Vec3::new(0.0, 0.0, 5.0), 0.5);
        world.insert(2, Vec3::new(0.0, 0.0, -200.0), 0.5);
        assert!(world.sphere_cast(Vec3::ZERO, Vec3::NEG_Z, 0.5, 100.0).is_empty());
    }

    #[test]
    fn inside_sphere_hits_at_zero() {
        let mut world = SphereWorld::new();
        world.insert(3, Vec3::ZERO, 2.0);
        let hits = world.sphere_cast(Vec3::X, Vec3::Z, 0.0, 10.0);
        assert_eq!(hits[0].distance, 0.0);
    }
}
