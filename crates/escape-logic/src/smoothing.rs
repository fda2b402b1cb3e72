//! Smoothed normals for outline extrusion.
//!
//! The fill pass pushes vertices out along a normal. Hard-edged meshes carry
//! several normals per corner, which would tear the outline, so every group
//! of coincident vertices gets the normalised average of its normals.
//!
//! Meshes are shared between instances, so preparation runs once per
//! distinct [`MeshId`] across the whole level. A bake can precompute the
//! result for the meshes of one target.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identity of a shared mesh asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    #[default]
    Static,
    /// Deformed at runtime; smoothing is not precomputed.
    Skinned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub id: MeshId,
    #[serde(default)]
    pub kind: MeshKind,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    #[serde(default = "default_submeshes")]
    pub submesh_count: usize,
    /// Materials on the renderer drawing this mesh.
    #[serde(default = "default_submeshes")]
    pub material_count: usize,
}

fn default_submeshes() -> usize {
    1
}

impl MeshData {
    pub fn new(id: MeshId, vertices: Vec<Vec3>, normals: Vec<Vec3>) -> Self {
        Self {
            id,
            kind: MeshKind::Static,
            vertices,
            normals,
            submesh_count: 1,
            material_count: 1,
        }
    }
}

/// Hashable key for an exact vertex position. `-0.0` folds into `0.0`.
fn position_key(v: Vec3) -> [u32; 3] {
    [(v.x + 0.0).to_bits(), (v.y + 0.0).to_bits(), (v.z + 0.0).to_bits()]
}

/// Average the normals of coincident vertices.
///
/// Output has one normal per input normal. Vertices with a unique position
/// keep their normal untouched.
pub fn smooth_normals(vertices: &[Vec3], normals: &[Vec3]) -> Vec<Vec3> {
    let mut smoothed = normals.to_vec();
    let mut groups: HashMap<[u32; 3], Vec<usize>> = HashMap::new();
    for (i, v) in vertices.iter().enumerate().take(normals.len()) {
        groups.entry(position_key(*v)).or_default().push(i);
    }

    for indices in groups.values().filter(|g| g.len() > 1) {
        let sum: Vec3 = indices.iter().map(|&i| normals[i]).sum();
        let avg = sum.normalize_or_zero();
        for &i in indices {
            smoothed[i] = avg;
        }
    }
    smoothed
}

/// Whether a mesh needs an extra submesh spanning all triangles so the
/// outline passes draw over every part. Single-submesh meshes already do;
/// meshes with more submeshes than materials can't take another.
pub fn needs_combined_submesh(submesh_count: usize, material_count: usize) -> bool {
    !(submesh_count == 1 || submesh_count > material_count)
}

/// What to upload for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMesh {
    pub id: MeshId,
    /// Per-vertex smoothing channel (zeros for skinned meshes).
    pub smooth_normals: Vec<Vec3>,
    pub add_combined_submesh: bool,
}

/// Precomputed smooth normals for a set of meshes, in key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalBake {
    pub keys: Vec<MeshId>,
    pub values: Vec<Vec<Vec3>>,
}

impl NormalBake {
    /// Bake the distinct static meshes among `meshes`.
    pub fn bake<'a>(meshes: impl IntoIterator<Item = &'a MeshData>) -> Self {
        let mut seen = HashSet::new();
        let mut bake = Self::default();
        for mesh in meshes {
            if mesh.kind == MeshKind::Skinned || !seen.insert(mesh.id) {
                continue;
            }
            bake.keys.push(mesh.id);
            bake.values.push(smooth_normals(&mesh.vertices, &mesh.normals));
        }
        bake
    }

    /// A bake is only trusted when keys and values line up.
    pub fn is_consistent(&self) -> bool {
        self.keys.len() == self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, id: MeshId) -> Option<&[Vec3]> {
        let i = self.keys.iter().position(|k| *k == id)?;
        self.values.get(i).map(Vec::as_slice)
    }
}

/// Level-wide registry of meshes already prepared.
#[derive(Debug, Clone, Default)]
pub struct NormalCache {
    registered: HashSet<MeshId>,
}

impl NormalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Prepare a mesh the first time it is seen; `None` afterwards. Baked
    /// normals are used when available and of the right length.
    pub fn prepare(&mut self, mesh: &MeshData, bake: Option<&NormalBake>) -> Option<PreparedMesh> {
        if !self.registered.insert(mesh.id) {
            return None;
        }

        let smooth = match mesh.kind {
            MeshKind::Skinned => vec![Vec3::ZERO; mesh.vertices.len()],
            MeshKind::Static => bake
                .filter(|b| b.is_consistent())
                .and_then(|b| b.get(mesh.id))
                .filter(|n| n.len() == mesh.normals.len())
                .map(<[Vec3]>::to_vec)
                .unwrap_or_else(|| smooth_normals(&mesh.vertices, &mesh.normals)),
        };

        Some(PreparedMesh {
            id: mesh.id,
            smooth_normals: smooth,
            add_combined_submesh: needs_combined_submesh(mesh.submesh_count, mesh.material_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two faces of a cube meeting at one corner, duplicated vertices.
    fn corner_mesh(id: u64) -> MeshData {
        let corner = Vec3::new(1.0, 1.0, 1.0);
        MeshData::new(
            MeshId(id),
            vec![corner, corner, Vec3::new(0.0, 1.0, 0.0)],
            vec![Vec3::X, Vec3::Y, Vec3::Y],
        )
    }

    #[test]
    fn coincident_vertices_share_normal() {
        let mesh = corner_mesh(1);
        let n = smooth_normals(&mesh.vertices, &mesh.normals);
        let expected = (Vec3::X + Vec3::Y).normalize();
        assert!((n[0] - expected).length() < 1e-6);
        assert_eq!(n[0], n[1]);
        assert_eq!(n[2], Vec3::Y);
    }

    #[test]
    fn negative_zero_groups_with_zero() {
        let v = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(-0.0, 0.0, 0.0)];
        let n = smooth_normals(&v, &[Vec3::X, Vec3::Z]);
        assert_eq!(n[0], n[1]);
    }

    #[test]
    fn shared_mesh_prepared_once() {
        let mut cache = NormalCache::new();
        let mesh = corner_mesh(7);
        assert!(cache.prepare(&mesh, None).is_some());
        assert!(cache.prepare(&mesh, None).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn bake_is_reused() {
        let mesh = corner_mesh(3);
        let mut bake = NormalBake::bake([&mesh, &mesh]);
        assert_eq!(bake.keys.len(), 1);
        bake.values[0] = vec![Vec3::Z; 3];

        let mut cache = NormalCache::new();
        let prepared = cache.prepare(&mesh, Some(&bake)).expect("first sight");
        assert_eq!(prepared.smooth_normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn inconsistent_bake_ignored() {
        let mesh = corner_mesh(3);
        let mut bake = NormalBake::bake([&mesh]);
        bake.values[0] = vec![Vec3::Z; 3];
        bake.keys.push(MeshId(99));
        let mut cache = NormalCache::new();
        let prepared = cache.prepare(&mesh, Some(&bake)).expect("first sight");
        assert_ne!(prepared.smooth_normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn skinned_meshes_get_zero_channel() {
        let mut mesh = corner_mesh(4);
        mesh.kind = MeshKind::Skinned;
        let mut cache = NormalCache::new();
        let prepared = cache.prepare(&mesh, None).expect("first sight");
        assert_eq!(prepared.smooth_normals, vec![Vec3::ZERO; 3]);
        assert!(NormalBake::bake([&mesh]).is_empty());
    }

    #[test]
    fn combined_submesh_rule() {
        assert!(!needs_combined_submesh(1, 3));
        assert!(needs_combined_submesh(2, 2));
        assert!(!needs_combined_submesh(3, 2));
    }
}
