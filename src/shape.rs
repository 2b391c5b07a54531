// src/shape.rs
//! Collision-shape factory: maps an authored shape kind plus params (and, for
//! hull/concave kinds, baked triangle data) onto a closed set of collision
//! shape variants, then lowers them to Rapier `SharedShape`s.
//!
//! "NoShape" is `None`: a hull or concave kind baked from zero triangles
//! produces no shape at all, and the caller must skip body creation.

use glam::Vec3;
use nalgebra::Point3;
use rapier3d::prelude::SharedShape;
use serde::{Deserialize, Serialize};

use crate::geometry::BakedTriangleBuffer;
use crate::{Error, Result};

/// Contact margin applied to every constructed shape, in world units.
///
/// Spheres fold the margin into their radius (the collision radius stays
/// exactly the authored radius); boxes and hulls carry it as a border radius;
/// concave triangle soups take no margin.
pub const COLLISION_MARGIN: f32 = 0.1;

/// Closed set of authored shape kinds. `Concave` is the explicit default arm
/// for arbitrary custom geometry: a static-only triangle soup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Box,
    Plane,
    ConvexHull,
    Concave,
}

/// A constructed collision shape, still backend-agnostic. Lowered to a
/// Rapier shape by [`CollisionShape::to_shared_shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    PlaneBox { half_extents: Vec3 },
    ConvexHull { points: BakedTriangleBuffer },
    ConcaveMesh { triangles: BakedTriangleBuffer },
}

fn param(params: &[f32], i: usize, kind: ShapeKind) -> Result<f32> {
    params.get(i).copied().ok_or_else(|| {
        Error::config(format!(
            "{:?} shape needs at least {} params, got {}",
            kind,
            i + 1,
            params.len()
        ))
    })
}

/// Build a collision shape from an authored kind and params.
///
/// `baked` is required for the hull/concave kinds and ignored otherwise.
/// Returns `Ok(None)` when the baked geometry holds zero triangles: the
/// object stays render-only rather than getting a degenerate shape.
pub fn build_shape(
    kind: ShapeKind,
    params: &[f32],
    baked: Option<BakedTriangleBuffer>,
) -> Result<Option<CollisionShape>> {
    let shape = match kind {
        ShapeKind::Sphere => CollisionShape::Sphere {
            radius: param(params, 0, kind)?,
        },
        // Authored box params are full dimensions; the collision box is half
        // that on every axis.
        ShapeKind::Box => CollisionShape::Box {
            half_extents: Vec3::new(
                param(params, 0, kind)? * 0.5,
                param(params, 1, kind)? * 0.5,
                param(params, 2, kind)? * 0.5,
            ),
        },
        // Planes are approximated as thin boxes. The z half-extent is fixed
        // at 1 world unit regardless of input — preserved source behavior,
        // possibly a workaround for thin-shape contact margins.
        ShapeKind::Plane => CollisionShape::PlaneBox {
            half_extents: Vec3::new(
                param(params, 0, kind)? * 0.5,
                param(params, 1, kind)? * 0.5,
                1.0,
            ),
        },
        ShapeKind::ConvexHull => {
            let points = require_baked(kind, baked)?;
            match points {
                Some(points) => CollisionShape::ConvexHull { points },
                None => return Ok(None),
            }
        }
        ShapeKind::Concave => {
            let triangles = require_baked(kind, baked)?;
            match triangles {
                Some(triangles) => CollisionShape::ConcaveMesh { triangles },
                None => return Ok(None),
            }
        }
    };
    Ok(Some(shape))
}

fn require_baked(
    kind: ShapeKind,
    baked: Option<BakedTriangleBuffer>,
) -> Result<Option<BakedTriangleBuffer>> {
    let baked = baked
        .ok_or_else(|| Error::config(format!("{:?} shape requires baked geometry", kind)))?;
    if baked.is_empty() {
        log::debug!("{:?} shape baked to zero triangles, skipping", kind);
        return Ok(None);
    }
    let bounds = baked.aabb();
    log::debug!(
        "{:?} shape over {} triangles, bounds {:?} .. {:?}",
        kind,
        baked.triangle_count(),
        bounds.min,
        bounds.max
    );
    Ok(Some(baked))
}

fn na_points(buffer: &BakedTriangleBuffer) -> Vec<Point3<f32>> {
    buffer
        .points()
        .iter()
        .map(|p| Point3::new(p.x, p.y, p.z))
        .collect()
}

impl CollisionShape {
    /// Lower to the Rapier shape, applying the fixed contact margin.
    ///
    /// Fails with `Error::Backend` when the backend cannot realize the shape
    /// (e.g. a convex hull over a degenerate point cloud).
    pub fn to_shared_shape(&self) -> Result<SharedShape> {
        match self {
            Self::Sphere { radius } => Ok(SharedShape::ball(*radius)),
            Self::Box { half_extents: h } | Self::PlaneBox { half_extents: h } => Ok(
                SharedShape::round_cuboid(h.x, h.y, h.z, COLLISION_MARGIN),
            ),
            Self::ConvexHull { points } => {
                SharedShape::round_convex_hull(&na_points(points), COLLISION_MARGIN)
                    .ok_or_else(|| Error::backend("convex hull computation failed"))
            }
            Self::ConcaveMesh { triangles } => {
                let vertices = na_points(triangles);
                let indices: Vec<[u32; 3]> = (0..triangles.triangle_count() as u32)
                    .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
                    .collect();
                Ok(SharedShape::trimesh(vertices, indices))
            }
        }
    }
}
