// src/scene.rs
//! Minimal render-side transform store.
//!
//! The actual renderer is an external collaborator; all the core needs from
//! it is, per object, a handle whose position/orientation it can overwrite
//! each frame. `Scene` is that surface: a flat store of named mesh nodes.
//! Nodes live until application teardown, so handles are plain indices.

use glam::{Quat, Vec3};

/// Handle to a mesh node. Stable for the lifetime of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(u32);

/// One render mesh's transform state.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl MeshNode {
    pub fn new<S: Into<String>>(name: S, position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation,
            scale,
        }
    }
}

/// Flat container of mesh nodes the simulation writes into.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<MeshNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, node: MeshNode) -> MeshHandle {
        let handle = MeshHandle(self.nodes.len() as u32);
        log::debug!("scene: spawned mesh '{}' as {:?}", node.name, handle);
        self.nodes.push(node);
        handle
    }

    pub fn node(&self, handle: MeshHandle) -> &MeshNode {
        &self.nodes[handle.0 as usize]
    }

    pub fn node_mut(&mut self, handle: MeshHandle) -> &mut MeshNode {
        &mut self.nodes[handle.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (MeshHandle(i as u32), n))
    }
}
