// src/world.rs
//! The rigid-body world: Rapier pipeline composition, body creation from
//! collision shapes + physics params, per-frame stepping, and transform
//! read/write at the render seam.
//!
//! Render-side transforms are glam (`Vec3`/`Quat`); everything inside the
//! world is nalgebra. The conversion happens only here.

use crossbeam::channel::{unbounded, Receiver};
use glam::{Quat, Vec3};
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::{
    BroadPhase, CCDSolver, ChannelEventCollector, ColliderBuilder, ColliderSet, CollisionEvent,
    ContactForceEvent, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    NarrowPhase, PhysicsPipeline, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use crate::config::{PhysicsParams, SimConfig};
use crate::shape::CollisionShape;
use crate::Result;

pub(crate) fn to_isometry(position: Vec3, rotation: Quat) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(position.x, position.y, position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

pub(crate) fn from_isometry(iso: &Isometry3<f32>) -> (Vec3, Quat) {
    let t = iso.translation;
    let r = iso.rotation;
    (
        Vec3::new(t.x, t.y, t.z),
        Quat::from_xyzw(r.i, r.j, r.k, r.w),
    )
}

/// Owns the whole simulation backend: broadphase, narrowphase, solver state,
/// body and collider sets, stepped once per frame. One instance per running
/// session; gravity is fixed at construction.
pub struct PhysicsWorld {
    gravity: Vector3<f32>,
    pipeline: PhysicsPipeline,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collision_recv: Receiver<CollisionEvent>,
    contact_force_recv: Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,
}

impl PhysicsWorld {
    pub fn new(config: &SimConfig) -> Self {
        let [gx, gy, gz] = config.gravity;
        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();
        let event_handler = ChannelEventCollector::new(collision_send, contact_force_send);

        log::info!("physics world created, gravity ({}, {}, {})", gx, gy, gz);

        Self {
            gravity: Vector3::new(gx, gy, gz),
            pipeline: PhysicsPipeline::new(),
            integration_params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collision_recv,
            contact_force_recv,
            event_handler,
        }
    }

    /// Advance the simulation by `dt` seconds. A zero `dt` is a legal no-op
    /// step: the pipeline still runs but nothing integrates.
    pub fn step(&mut self, dt: f32) {
        self.integration_params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.event_handler,
        );
    }

    /// Create a rigid body + collider for a constructed collision shape.
    ///
    /// `mass == 0` produces a fixed (immovable) body; otherwise the backend
    /// derives local inertia from the shape and the given mass. Friction,
    /// restitution, and damping come from `params`. Fails with
    /// `Error::Backend` when the shape cannot be lowered (the caller keeps
    /// the object render-only in that case).
    pub fn add_body(
        &mut self,
        shape: &CollisionShape,
        params: &PhysicsParams,
        position: Vec3,
        rotation: Quat,
    ) -> Result<RigidBodyHandle> {
        let shared = shape.to_shared_shape()?;

        let builder = if params.is_static() {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder
            .position(to_isometry(position, rotation))
            .linear_damping(params.linear_damping)
            .angular_damping(params.angular_damping)
            .build();

        let mut collider = ColliderBuilder::new(shared)
            .friction(params.friction)
            .restitution(params.restitution);
        if !params.is_static() {
            collider = collider.mass(params.mass);
        }

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);
        Ok(handle)
    }

    /// Read a body's world transform for the render side.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(handle).map(|b| from_isometry(b.position()))
    }

    /// Teleport a body, waking it. Broadphase and solver caches are left
    /// untouched; a body placed in interpenetration may see one frame of
    /// resolving impulse on the next step.
    pub fn set_body_transform(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_position(to_isometry(position, rotation), true);
        }
    }

    /// Zero a body's linear and angular velocity.
    pub fn zero_velocities(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(Vector3::zeros(), true);
            body.set_angvel(Vector3::zeros(), true);
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some()
    }

    /// Drain collision events accumulated since the last call. Non-blocking.
    pub fn drain_collision_events(&self) -> Vec<CollisionEvent> {
        self.collision_recv.try_iter().collect()
    }

    /// Drain contact-force events accumulated since the last call.
    pub fn drain_contact_force_events(&self) -> Vec<ContactForceEvent> {
        self.contact_force_recv.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::CollisionShape;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&SimConfig {
            gravity: [0.0, -100.0, 0.0],
        })
    }

    fn ball() -> CollisionShape {
        CollisionShape::Sphere { radius: 1.0 }
    }

    #[test]
    fn test_dynamic_body_falls_under_gravity() {
        let mut w = world();
        let h = w
            .add_body(
                &ball(),
                &PhysicsParams::with_mass(1.0),
                Vec3::new(0.0, 100.0, 0.0),
                Quat::IDENTITY,
            )
            .unwrap();

        for _ in 0..60 {
            w.step(DT);
        }
        let (pos, _) = w.body_transform(h).unwrap();
        assert!(pos.y < 90.0, "body did not fall: y = {}", pos.y);
    }

    #[test]
    fn test_static_body_never_moves() {
        let mut w = world();
        let rot = Quat::from_rotation_z(0.3);
        let h = w
            .add_body(
                &ball(),
                &PhysicsParams::default(),
                Vec3::new(1.0, 2.0, 3.0),
                rot,
            )
            .unwrap();

        for _ in 0..240 {
            w.step(DT);
        }
        let (pos, q) = w.body_transform(h).unwrap();
        assert_eq!(pos, Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(q.dot(rot).abs(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_dt_step_is_a_no_op() {
        let mut w = world();
        let h = w
            .add_body(
                &ball(),
                &PhysicsParams::with_mass(1.0),
                Vec3::new(0.0, 50.0, 0.0),
                Quat::IDENTITY,
            )
            .unwrap();

        for _ in 0..10 {
            w.step(0.0);
        }
        let (pos, _) = w.body_transform(h).unwrap();
        assert_relative_eq!(pos.y, 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_transform_write_and_velocity_reset() {
        let mut w = world();
        let h = w
            .add_body(
                &ball(),
                &PhysicsParams::with_mass(1.0),
                Vec3::ZERO,
                Quat::IDENTITY,
            )
            .unwrap();

        // Let it pick up speed, then teleport and stop it.
        for _ in 0..30 {
            w.step(DT);
        }
        w.zero_velocities(h);
        w.set_body_transform(h, Vec3::new(0.0, 10.0, 0.0), Quat::IDENTITY);

        let (pos, _) = w.body_transform(h).unwrap();
        assert_relative_eq!(pos.y, 10.0, epsilon = 1e-6);

        // One further frame only accumulates one step of gravity.
        w.step(DT);
        let (pos, _) = w.body_transform(h).unwrap();
        assert!(pos.y > 10.0 - 100.0 * DT * DT * 2.0);
    }

    #[test]
    fn test_round_trip_isometry_conversion() {
        let pos = Vec3::new(1.0, -2.0, 3.5);
        let rot = Quat::from_euler(glam::EulerRot::XYZ, 0.3, -0.2, 1.1);
        let (pos2, rot2) = from_isometry(&to_isometry(pos, rot));
        assert_relative_eq!(pos.x, pos2.x, epsilon = 1e-6);
        assert_relative_eq!(pos.y, pos2.y, epsilon = 1e-6);
        assert_relative_eq!(pos.z, pos2.z, epsilon = 1e-6);
        assert_relative_eq!(rot.dot(rot2).abs(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_collision_events_drain_without_blocking() {
        let w = world();
        assert!(w.drain_collision_events().is_empty());
        assert!(w.drain_contact_force_events().is_empty());
    }
}
