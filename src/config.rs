// src/config.rs
//! Authoring configuration: simulation settings and per-object descriptors.
//!
//! A descriptor carries everything the world builder needs for one object:
//! shape kind + params, initial transform, optional physics parameters
//! (absent = render-only), and — for hull/concave kinds — the geometry,
//! either as a ready descriptor (e.g. from the glTF loader) or as custom
//! vertex/face generator callbacks. Descriptors are data; no ambient global
//! configuration state exists anywhere in the crate.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::GeometryDescriptor;
use crate::shape::ShapeKind;
use crate::{Error, Result};

/// Simulation-wide settings, constructed once and passed into world
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World gravity vector, fixed at construction.
    pub gravity: [f32; 3],
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

/// Per-body physics parameters. Every field is defaulted; `mass == 0` marks
/// a static, immovable body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            mass: 0.0,
            friction: 0.0,
            restitution: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}

impl PhysicsParams {
    /// Dynamic body of the given mass, everything else defaulted.
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass,
            ..Default::default()
        }
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Static bodies are immovable regardless of gravity or contacts.
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }
}

/// Generator callback producing authored vertex positions.
pub type VertexGenerator = Box<dyn Fn() -> Vec<Vec3>>;
/// Generator callback producing per-face index triples.
pub type FaceGenerator = Box<dyn Fn() -> Vec<[u32; 3]>>;

/// Procedural geometry callbacks. Both generators must be present; this is
/// checked at build time, before any shape or body is constructed.
pub struct CustomGeometry {
    pub vertices: Option<VertexGenerator>,
    pub faces: Option<FaceGenerator>,
}

impl CustomGeometry {
    pub fn new(vertices: VertexGenerator, faces: FaceGenerator) -> Self {
        Self {
            vertices: Some(vertices),
            faces: Some(faces),
        }
    }
}

impl fmt::Debug for CustomGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGeometry")
            .field("vertices", &self.vertices.as_ref().map(|_| "<fn>"))
            .field("faces", &self.faces.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Where an object's geometry comes from.
#[derive(Debug)]
pub enum GeometrySource {
    /// Ready-made geometry, e.g. from the glTF loader.
    Descriptor(GeometryDescriptor),
    /// Procedural vertex/face generators.
    Custom(CustomGeometry),
}

/// One authored object: everything the builder needs to create its render
/// mesh node and (optionally) its physics body.
#[derive(Debug)]
pub struct ObjectDescriptor {
    pub name: String,
    pub kind: ShapeKind,
    pub params: Vec<f32>,
    /// Initial world position.
    pub position: Vec3,
    /// Initial world rotation, Euler angles in XYZ order (radians).
    pub rotation: Vec3,
    /// Authored scale, applied to the geometry itself.
    pub scale: Vec3,
    /// Pre-rotation applied to the geometry before anything else.
    pub geo_rotate: Option<Vec3>,
    /// Absent = render-only object with no physics body.
    pub physics: Option<PhysicsParams>,
    /// Required for hull/concave kinds.
    pub geometry: Option<GeometrySource>,
}

impl ObjectDescriptor {
    pub fn new<S: Into<String>>(name: S, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            geo_rotate: None,
            physics: None,
            geometry: None,
        }
    }

    pub fn params(mut self, params: &[f32]) -> Self {
        self.params = params.to_vec();
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn geo_rotate(mut self, euler: Vec3) -> Self {
        self.geo_rotate = Some(euler);
        self
    }

    pub fn physics(mut self, physics: PhysicsParams) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn geometry(mut self, geometry: GeometryDescriptor) -> Self {
        self.geometry = Some(GeometrySource::Descriptor(geometry));
        self
    }

    pub fn custom_geometry(mut self, custom: CustomGeometry) -> Self {
        self.geometry = Some(GeometrySource::Custom(custom));
        self
    }

    /// Validate the descriptor. Runs at build time, before any shape or body
    /// is constructed; a failure aborts only this object.
    pub fn validate(&self) -> Result<()> {
        if let Some(GeometrySource::Custom(custom)) = &self.geometry {
            if custom.vertices.is_none() || custom.faces.is_none() {
                return Err(Error::config(format!(
                    "object '{}': custom geometry requires both a vertex and a face generator",
                    self.name
                )));
            }
        }
        if matches!(self.kind, ShapeKind::ConvexHull | ShapeKind::Concave)
            && self.geometry.is_none()
        {
            return Err(Error::config(format!(
                "object '{}': {:?} shape kind requires geometry",
                self.name, self.kind
            )));
        }
        if let Some(GeometrySource::Descriptor(desc)) = &self.geometry {
            desc.validate()
                .map_err(|e| Error::config(format!("object '{}': {}", self.name, e)))?;
        }
        Ok(())
    }

    /// Resolve the geometry source into a concrete descriptor. Custom
    /// generators run exactly once, here.
    pub(crate) fn resolve_geometry(&self) -> Result<Option<GeometryDescriptor>> {
        match &self.geometry {
            None => Ok(None),
            Some(GeometrySource::Descriptor(desc)) => Ok(Some(desc.clone())),
            Some(GeometrySource::Custom(custom)) => {
                let (vgen, fgen) = match (&custom.vertices, &custom.faces) {
                    (Some(v), Some(f)) => (v, f),
                    _ => {
                        return Err(Error::config(format!(
                            "object '{}': custom geometry requires both a vertex and a face generator",
                            self.name
                        )))
                    }
                };
                let desc = GeometryDescriptor::Indexed {
                    vertices: vgen(),
                    faces: fgen(),
                };
                desc.validate()
                    .map_err(|e| Error::config(format!("object '{}': {}", self.name, e)))?;
                Ok(Some(desc))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_params_defaults() {
        let p = PhysicsParams::default();
        assert_eq!(p.mass, 0.0);
        assert_eq!(p.friction, 0.0);
        assert_eq!(p.restitution, 1.0);
        assert_eq!(p.linear_damping, 0.0);
        assert_eq!(p.angular_damping, 0.0);
        assert!(p.is_static());
    }

    #[test]
    fn test_physics_params_builder_chain() {
        let p = PhysicsParams::with_mass(1.0).friction(0.8).damping(0.1, 0.2);
        assert_eq!(p.mass, 1.0);
        assert_eq!(p.friction, 0.8);
        assert_eq!(p.restitution, 1.0);
        assert_eq!(p.linear_damping, 0.1);
        assert_eq!(p.angular_damping, 0.2);
        assert!(!p.is_static());
    }

    #[test]
    fn test_custom_geometry_requires_both_generators() {
        let mut desc = ObjectDescriptor::new("ridge", ShapeKind::Concave);
        desc.geometry = Some(GeometrySource::Custom(CustomGeometry {
            vertices: Some(Box::new(Vec::new)),
            faces: None,
        }));
        assert!(desc.validate().unwrap_err().is_config());

        let ok = ObjectDescriptor::new("ridge", ShapeKind::Concave).custom_geometry(
            CustomGeometry::new(
                Box::new(|| vec![Vec3::ZERO, Vec3::X, Vec3::Y]),
                Box::new(|| vec![[0, 1, 2]]),
            ),
        );
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_hull_kind_requires_geometry() {
        let desc = ObjectDescriptor::new("duck", ShapeKind::ConvexHull);
        assert!(desc.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_resolve_custom_geometry_runs_generators() {
        let desc = ObjectDescriptor::new("ridge", ShapeKind::Concave).custom_geometry(
            CustomGeometry::new(
                Box::new(|| vec![Vec3::ZERO, Vec3::X, Vec3::Y]),
                Box::new(|| vec![[0, 1, 2]]),
            ),
        );
        let resolved = desc.resolve_geometry().unwrap().unwrap();
        assert_eq!(resolved.triangle_count(), 1);
    }

    #[test]
    fn test_sim_config_round_trips_through_json() {
        let config = SimConfig {
            gravity: [0.0, -100.0, 0.0],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gravity, config.gravity);
    }
}
