// src/lib.rs
//! Rigid-body scene simulation core.
//!
//! This crate is the glue between authored render meshes and a rigid-body
//! backend (Rapier): it bakes arbitrary mesh geometry into collision shapes,
//! owns and steps the physics world, and keeps render transforms and physics
//! transforms in lockstep every frame — including a reset-to-initial-state
//! operation that restores every object without corrupting the simulation.
//!
//! Typical use:
//!
//! ```no_run
//! use glam::Vec3;
//! use tumble::{ObjectDescriptor, PhysicsParams, SceneBuilder, ShapeKind, SimConfig};
//!
//! let mut sim = SceneBuilder::new(SimConfig { gravity: [0.0, -100.0, 0.0] })
//!     .object(
//!         ObjectDescriptor::new("sphere", ShapeKind::Sphere)
//!             .params(&[20.0])
//!             .position(Vec3::new(0.0, 250.0, 0.0))
//!             .physics(PhysicsParams::with_mass(1.0).friction(0.8)),
//!     )
//!     .object(
//!         ObjectDescriptor::new("ground", ShapeKind::Plane)
//!             .params(&[1000.0, 1000.0])
//!             .rotation(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0))
//!             .physics(PhysicsParams::default().friction(0.8)),
//!     )
//!     .build();
//!
//! loop {
//!     sim.step_frame();
//!     // read transforms back out of sim.scene for rendering
//! }
//! ```
//!
//! Everything runs on one thread: world build is an explicit barrier (no
//! frame can be stepped until [`SceneBuilder::build`] returns), and the
//! per-frame step, transform read-back, and mesh mutation share the frame
//! loop.

pub mod builder;
pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod registry;
pub mod scene;
pub mod shape;
pub mod stepper;
pub mod world;

pub use builder::{ObjectFailure, SceneBuilder, Simulation};
pub use config::{CustomGeometry, GeometrySource, ObjectDescriptor, PhysicsParams, SimConfig};
pub use error::{Error, Result};
pub use geometry::{Aabb, BakedTriangleBuffer, GeometryDescriptor};
pub use loader::load_gltf_geometry;
pub use registry::{Registry, TrackedObject};
pub use scene::{MeshHandle, MeshNode, Scene};
pub use shape::{build_shape, CollisionShape, ShapeKind, COLLISION_MARGIN};
pub use stepper::{FrameStepper, StepState};
pub use world::PhysicsWorld;
