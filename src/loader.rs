// src/loader.rs
//! glTF geometry import for externally-authored meshes.
//!
//! Only positions and indices matter here: loaded meshes collide as convex
//! hulls, and rendering is an external collaborator. The first mesh
//! primitive in the file wins, matching how the source assets are authored
//! (one mesh per file).

use std::path::Path;

use glam::Vec3;

use crate::geometry::GeometryDescriptor;
use crate::{Error, Result};

/// Load the first mesh primitive of a glTF file as indexed geometry.
///
/// Non-indexed primitives get sequential face indices. Runs in the load
/// phase, strictly before world build.
pub fn load_gltf_geometry<P: AsRef<Path>>(path: P) -> Result<GeometryDescriptor> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    for mesh in document.meshes() {
        for prim in mesh.primitives() {
            let reader = prim.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let vertices: Vec<Vec3> = positions.map(Vec3::from).collect();

            let indices: Vec<u32> = if let Some(iter) = reader.read_indices() {
                iter.into_u32().collect()
            } else {
                // non-indexed: build sequential indices
                (0u32..vertices.len() as u32).collect()
            };

            log::info!(
                "loaded '{}': {} vertices, {} triangles",
                path.display(),
                vertices.len(),
                indices.len() / 3
            );
            return Ok(GeometryDescriptor::Indexed {
                vertices,
                faces: face_triples(&indices),
            });
        }
    }

    Err(Error::config(format!(
        "'{}' contains no mesh primitive with positions",
        path.display()
    )))
}

// A trailing partial face is dropped rather than rejected.
fn face_triples(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_triples_groups_indices() {
        assert_eq!(
            face_triples(&[0, 1, 2, 2, 1, 3]),
            vec![[0, 1, 2], [2, 1, 3]]
        );
        // Partial tail ignored.
        assert_eq!(face_triples(&[0, 1, 2, 3]), vec![[0, 1, 2]]);
        assert!(face_triples(&[]).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_gltf_geometry("does/not/exist.gltf").is_err());
    }
}
