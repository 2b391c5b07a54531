// src/registry.rs
//! The binding layer between render mesh nodes and physics bodies.
//!
//! Every built object gets a `TrackedObject` record: its mesh handle, its
//! authored initial transform, and — when physics applies — its body handle.
//! The registry owns these records; the world owns body lifetimes; the scene
//! owns mesh lifetimes.

use glam::{EulerRot, Quat, Vec3};
use rapier3d::prelude::RigidBodyHandle;

use crate::scene::{MeshHandle, Scene};
use crate::shape::CollisionShape;
use crate::world::PhysicsWorld;

/// Per-object binding record. `body` is `None` for render-only objects
/// (no physics params authored, empty geometry, or a backend failure).
#[derive(Debug)]
pub struct TrackedObject {
    pub name: String,
    pub mesh: MeshHandle,
    pub initial_position: Vec3,
    /// Authored initial rotation, Euler angles in XYZ order (radians).
    pub initial_rotation: Vec3,
    pub shape: Option<CollisionShape>,
    pub body: Option<RigidBodyHandle>,
}

impl TrackedObject {
    /// Quaternion form of the authored initial rotation.
    pub fn initial_orientation(&self) -> Quat {
        let r = self.initial_rotation;
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }
}

/// Registry of all tracked objects, in authoring order.
#[derive(Debug, Default)]
pub struct Registry {
    objects: Vec<TrackedObject>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, object: TrackedObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.iter()
    }

    /// Number of objects with a live physics body.
    pub fn body_count(&self) -> usize {
        self.objects.iter().filter(|o| o.body.is_some()).count()
    }

    /// Write every live body's world transform into its render mesh node.
    ///
    /// Called once per frame, strictly after the world step for that frame
    /// has completed — bodies are never synced mid-step.
    pub fn sync_to_scene(&self, world: &PhysicsWorld, scene: &mut Scene) {
        for object in &self.objects {
            let Some(body) = object.body else { continue };
            if let Some((position, rotation)) = world.body_transform(body) {
                let node = scene.node_mut(object.mesh);
                node.position = position;
                node.rotation = rotation;
            }
        }
    }

    /// Restore every tracked object to its authored initial state.
    ///
    /// Mesh nodes get the initial transform directly, bypassing physics.
    /// Live bodies get zeroed velocities, then the initial transform.
    /// Broadphase pair caches and solver warm-start state are not cleared:
    /// a body reset while interpenetrating another may see one frame of
    /// resolving impulse afterwards. Idempotent when no step intervenes.
    pub fn reset(&self, world: &mut PhysicsWorld, scene: &mut Scene) {
        log::info!("resetting {} tracked objects", self.objects.len());
        for object in &self.objects {
            let orientation = object.initial_orientation();

            let node = scene.node_mut(object.mesh);
            node.position = object.initial_position;
            node.rotation = orientation;

            if let Some(body) = object.body {
                world.zero_velocities(body);
                world.set_body_transform(body, object.initial_position, orientation);
            }
        }
    }
}
