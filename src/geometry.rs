// src/geometry.rs
//! Geometry baking: flattens authored mesh geometry into a canonical ordered
//! triangle stream that the collision-shape factory consumes.
//!
//! Two authored forms are supported: indexed (vertex positions + per-face
//! index triples) and flat (a contiguous `f32` stream already in
//! per-face-vertex order, 9 floats per triangle). Baking emits the same
//! canonical `[A0,B0,C0, A1,B1,C1, ...]` point sequence for both, preserving
//! the authored face winding.

use std::cell::OnceCell;

use glam::{EulerRot, Quat, Vec3};

use crate::{Error, Result};

/// Authored mesh geometry, immutable once baked.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    /// Vertex positions plus per-face index triples `(a, b, c)`.
    Indexed {
        vertices: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
    },
    /// Contiguous position stream already in per-face-vertex order.
    /// Invariant: length is a multiple of 9 (3 vertices x 3 components).
    Flat { data: Vec<f32> },
}

impl GeometryDescriptor {
    /// Number of triangles this descriptor encodes.
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Indexed { faces, .. } => faces.len(),
            Self::Flat { data } => data.len() / 9,
        }
    }

    /// Check the descriptor invariants. Called once at world-build time;
    /// baking itself never errors.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Indexed { vertices, faces } => {
                let n = vertices.len() as u32;
                for face in faces {
                    if face.iter().any(|&i| i >= n) {
                        return Err(Error::config(format!(
                            "face index out of range: {:?} with {} vertices",
                            face, n
                        )));
                    }
                }
                Ok(())
            }
            Self::Flat { data } => {
                if data.len() % 9 != 0 {
                    return Err(Error::config(format!(
                        "flat geometry length {} is not a multiple of 9",
                        data.len()
                    )));
                }
                Ok(())
            }
        }
    }

    /// Flatten into the canonical triangle buffer.
    ///
    /// Indexed input emits `vertices[a], vertices[b], vertices[c]` per face,
    /// in that order. Flat input passes through unchanged. Degenerate input
    /// (zero faces, zero length) yields an empty buffer.
    pub fn bake(&self) -> BakedTriangleBuffer {
        let points = match self {
            Self::Indexed { vertices, faces } => {
                let mut points = Vec::with_capacity(faces.len() * 3);
                for &[a, b, c] in faces {
                    points.push(vertices[a as usize]);
                    points.push(vertices[b as usize]);
                    points.push(vertices[c as usize]);
                }
                points
            }
            Self::Flat { data } => {
                // Ignore a partial trailing triangle rather than erroring.
                let whole = data.len() - data.len() % 9;
                bytemuck::cast_slice::<f32, [f32; 3]>(&data[..whole])
                    .iter()
                    .map(|&p| Vec3::from(p))
                    .collect()
            }
        };
        BakedTriangleBuffer::from_points(points)
    }
}

/// Axis-aligned bounding box of a baked buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    fn of_points(points: &[Vec3]) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if points.is_empty() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        Self { min, max }
    }
}

/// Canonical contiguous triangle stream: `3 * triangle_count` points in
/// `[A0,B0,C0, A1,B1,C1, ...]` order. Owned by whoever requested the bake;
/// the baker does not retain it.
#[derive(Debug, Clone)]
pub struct BakedTriangleBuffer {
    points: Vec<Vec3>,
    bounds: OnceCell<Aabb>,
}

impl BakedTriangleBuffer {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self {
            points,
            bounds: OnceCell::new(),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn triangle_count(&self) -> usize {
        self.points.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box, computed on first use and cached. An empty buffer
    /// reports a degenerate box at the origin.
    pub fn aabb(&self) -> Aabb {
        *self.bounds.get_or_init(|| Aabb::of_points(&self.points))
    }

    /// Apply an authored pre-rotation (Euler XYZ, radians) to the geometry
    /// itself. Invalidates the cached bounds.
    pub fn rotated(self, euler: Vec3) -> Self {
        let q = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        Self::from_points(self.points.into_iter().map(|p| q * p).collect())
    }

    /// Apply an authored scale to the geometry itself. Hull and concave
    /// collision shapes see scaled vertices; primitive shape params do not.
    pub fn scaled(self, scale: Vec3) -> Self {
        Self::from_points(self.points.into_iter().map(|p| p * scale).collect())
    }
}

impl PartialEq for BakedTriangleBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_indexed() -> GeometryDescriptor {
        GeometryDescriptor::Indexed {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2]],
        }
    }

    fn tri_flat() -> GeometryDescriptor {
        GeometryDescriptor::Flat {
            data: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    #[test]
    fn test_indexed_and_flat_bake_identically() {
        let a = tri_indexed().bake();
        let b = tri_flat().bake();
        assert_eq!(a, b);
        assert_eq!(a.triangle_count(), 1);
        assert_eq!(
            a.points(),
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_indexed_bake_preserves_face_order_and_winding() {
        let desc = GeometryDescriptor::Indexed {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            faces: vec![[2, 1, 0], [1, 2, 3]],
        };
        let baked = desc.bake();
        assert_eq!(baked.triangle_count(), 2);
        // First face emitted as vertex[2], vertex[1], vertex[0].
        assert_eq!(baked.points()[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(baked.points()[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(baked.points()[2], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_input_bakes_to_empty_buffer() {
        let baked = GeometryDescriptor::Flat { data: vec![] }.bake();
        assert!(baked.is_empty());
        assert_eq!(baked.triangle_count(), 0);

        let baked = GeometryDescriptor::Indexed {
            vertices: vec![],
            faces: vec![],
        }
        .bake();
        assert!(baked.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_descriptors() {
        let bad_flat = GeometryDescriptor::Flat {
            data: vec![0.0; 10],
        };
        assert!(bad_flat.validate().unwrap_err().is_config());

        let bad_indexed = GeometryDescriptor::Indexed {
            vertices: vec![Vec3::ZERO],
            faces: vec![[0, 0, 7]],
        };
        assert!(bad_indexed.validate().unwrap_err().is_config());

        assert!(tri_indexed().validate().is_ok());
        assert!(tri_flat().validate().is_ok());
    }

    #[test]
    fn test_aabb_is_cached_and_correct() {
        let baked = tri_indexed().bake();
        let first = baked.aabb();
        assert_eq!(first.min, Vec3::ZERO);
        assert_eq!(first.max, Vec3::new(1.0, 1.0, 0.0));
        // Idempotent: same value on repeated queries.
        assert_eq!(baked.aabb(), first);
    }

    #[test]
    fn test_scaled_geometry_scales_points() {
        let baked = tri_flat().bake().scaled(Vec3::splat(2.0));
        assert_eq!(baked.points()[1], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(baked.aabb().max, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotated_geometry_rotates_points() {
        use approx::assert_relative_eq;
        // Quarter turn about Z maps +X onto +Y.
        let baked = tri_flat()
            .bake()
            .rotated(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let p = baked.points()[1];
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }
}
