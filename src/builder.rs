// src/builder.rs
//! Two-phase world construction.
//!
//! Phase one collects authored object descriptors (during which the host may
//! still be loading assets). Phase two — `SceneBuilder::build` — validates
//! every descriptor, bakes geometry, constructs shapes and bodies, and hands
//! back a [`Simulation`]. No frame can be stepped before `build` returns,
//! so body creation is always complete before the first step.
//!
//! A misconfigured or backend-rejected object aborts only itself: the
//! builder records an [`ObjectFailure`], logs it, and carries on. Backend
//! failures and empty geometry leave the object tracked for rendering with
//! no physics body.

use glam::{EulerRot, Quat, Vec3};

use crate::config::{ObjectDescriptor, SimConfig};
use crate::geometry::BakedTriangleBuffer;
use crate::registry::{Registry, TrackedObject};
use crate::scene::{MeshNode, Scene};
use crate::shape::{build_shape, ShapeKind};
use crate::stepper::FrameStepper;
use crate::world::PhysicsWorld;
use crate::Error;

/// A per-object build failure, surfaced to the caller instead of aborting
/// the world.
#[derive(Debug)]
pub struct ObjectFailure {
    pub name: String,
    pub error: Error,
}

/// Collects descriptors, then builds the whole world in one pass.
pub struct SceneBuilder {
    config: SimConfig,
    objects: Vec<ObjectDescriptor>,
}

impl SceneBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
        }
    }

    pub fn object(mut self, descriptor: ObjectDescriptor) -> Self {
        self.objects.push(descriptor);
        self
    }

    /// Build phase: bake, construct shapes, create bodies, register
    /// everything. The returned simulation is ready for its first frame.
    pub fn build(self) -> Simulation {
        let mut scene = Scene::new();
        let mut world = PhysicsWorld::new(&self.config);
        let mut registry = Registry::new();
        let mut failures = Vec::new();

        for descriptor in &self.objects {
            build_object(descriptor, &mut scene, &mut world, &mut registry, &mut failures);
        }

        log::info!(
            "world built: {} objects tracked, {} bodies, {} failures",
            registry.len(),
            registry.body_count(),
            failures.len()
        );

        Simulation {
            scene,
            world,
            registry,
            stepper: FrameStepper::new(),
            failures,
        }
    }
}

fn build_object(
    descriptor: &ObjectDescriptor,
    scene: &mut Scene,
    world: &mut PhysicsWorld,
    registry: &mut Registry,
    failures: &mut Vec<ObjectFailure>,
) {
    if let Err(error) = descriptor.validate() {
        log::warn!("skipping object '{}': {}", descriptor.name, error);
        failures.push(ObjectFailure {
            name: descriptor.name.clone(),
            error,
        });
        return;
    }

    // Baked geometry is only needed for hull/concave physics shapes.
    let needs_baked = matches!(descriptor.kind, ShapeKind::ConvexHull | ShapeKind::Concave);
    let baked = if descriptor.physics.is_some() && needs_baked {
        match bake_geometry(descriptor) {
            Ok(baked) => baked,
            Err(error) => {
                log::warn!("skipping object '{}': {}", descriptor.name, error);
                failures.push(ObjectFailure {
                    name: descriptor.name.clone(),
                    error,
                });
                return;
            }
        }
    } else {
        None
    };

    let orientation = {
        let r = descriptor.rotation;
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    };

    let mesh = scene.spawn(MeshNode::new(
        descriptor.name.clone(),
        descriptor.position,
        orientation,
        descriptor.scale,
    ));

    let mut shape = None;
    let mut body = None;
    if let Some(params) = &descriptor.physics {
        match build_shape(descriptor.kind, &descriptor.params, baked) {
            Err(error) => {
                log::warn!("object '{}' gets no physics body: {}", descriptor.name, error);
                failures.push(ObjectFailure {
                    name: descriptor.name.clone(),
                    error,
                });
            }
            // Empty geometry: not an error, the object stays render-only.
            Ok(None) => {
                log::debug!("object '{}' has no collision shape, render-only", descriptor.name);
            }
            Ok(Some(built)) => {
                match world.add_body(&built, params, descriptor.position, orientation) {
                    Ok(handle) => body = Some(handle),
                    Err(error) => {
                        log::warn!(
                            "object '{}' gets no physics body: {}",
                            descriptor.name,
                            error
                        );
                        failures.push(ObjectFailure {
                            name: descriptor.name.clone(),
                            error,
                        });
                    }
                }
                shape = Some(built);
            }
        }
    }

    registry.track(TrackedObject {
        name: descriptor.name.clone(),
        mesh,
        initial_position: descriptor.position,
        initial_rotation: descriptor.rotation,
        shape,
        body,
    });
}

fn bake_geometry(descriptor: &ObjectDescriptor) -> crate::Result<Option<BakedTriangleBuffer>> {
    let Some(geometry) = descriptor.resolve_geometry()? else {
        return Ok(None);
    };
    let mut baked = geometry.bake();
    if let Some(euler) = descriptor.geo_rotate {
        baked = baked.rotated(euler);
    }
    if descriptor.scale != Vec3::ONE {
        baked = baked.scaled(descriptor.scale);
    }
    Ok(Some(baked))
}

/// The built world: scene, physics, registry, and the frame clock, plus the
/// per-object failures collected during the build.
pub struct Simulation {
    pub scene: Scene,
    pub world: PhysicsWorld,
    pub registry: Registry,
    pub stepper: FrameStepper,
    failures: Vec<ObjectFailure>,
}

impl Simulation {
    /// Run one frame with a measured wall-clock delta.
    pub fn step_frame(&mut self) {
        self.stepper
            .advance(&mut self.world, &self.registry, &mut self.scene);
    }

    /// Run one frame with an explicit delta (deterministic).
    pub fn step_fixed(&mut self, dt: f32) {
        self.stepper
            .advance_fixed(dt, &mut self.world, &self.registry, &mut self.scene);
    }

    /// Restore every tracked object to its authored initial state.
    pub fn reset(&mut self) {
        self.registry.reset(&mut self.world, &mut self.scene);
    }

    pub fn pause(&mut self) {
        self.stepper.pause();
    }

    pub fn resume(&mut self) {
        self.stepper.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.stepper.toggle();
    }

    /// Per-object failures from the build phase. Objects listed here are
    /// either absent (configuration errors) or render-only (backend
    /// failures).
    pub fn failures(&self) -> &[ObjectFailure] {
        &self.failures
    }
}
