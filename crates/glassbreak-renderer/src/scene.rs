//! Render Scene
//!
//! Scene graph plus the resources and instanced batches it draws. All
//! creation goes through here so every resource has exactly one owner and
//! is released with it.

use ahash::AHashMap;
use glam::Vec3;
use glassbreak_core::{NodeFlags, NodeId, ResourceId, SceneGraph, Transform};

use crate::instancing::{BatchId, InstancedBatch};
use crate::material::Material;
use crate::mesh::Geometry;
use crate::resources::{ResourceCounts, ResourcePool};

/// Background clear color of the showroom
pub const DEFAULT_BACKGROUND: u32 = 0x3a3a45;

/// Scene graph, resources and batches
#[derive(Debug)]
pub struct RenderScene {
    /// Node hierarchy
    pub graph: SceneGraph,
    /// Resource ownership
    pub resources: ResourcePool,
    batches: AHashMap<BatchId, InstancedBatch>,
    next_batch: u32,
    /// Clear color
    pub background: Vec3,
    /// Current environment reflection map
    pub env_map: Option<ResourceId>,
}

impl RenderScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            resources: ResourcePool::new(),
            batches: AHashMap::new(),
            next_batch: 0,
            background: crate::material::color_from_hex(DEFAULT_BACKGROUND),
            env_map: None,
        }
    }

    /// Add an empty grouping node
    pub fn spawn_group(&mut self, parent: Option<NodeId>, name: &str, transform: Transform) -> NodeId {
        let id = match parent {
            Some(parent) => self.graph.spawn_child(parent, name),
            None => self.graph.spawn(name),
        };
        self.graph.set_transform(id, transform);
        id
    }

    /// Add a mesh node owning a new geometry and material
    pub fn spawn_mesh(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        geometry: Geometry,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        let geometry = self.resources.add_geometry(geometry);
        let material = self.resources.add_material(material);
        let id = self.spawn_group(parent, name, transform);
        if let Some(node) = self.graph.get_mut(id) {
            node.geometry = Some(geometry);
            node.material = Some(material);
        }
        id
    }

    /// Set shadow flags on a node
    pub fn set_shadows(&mut self, id: NodeId, cast: bool, receive: bool) {
        if let Some(node) = self.graph.get_mut(id) {
            node.flags.set(NodeFlags::CAST_SHADOW, cast);
            node.flags.set(NodeFlags::RECEIVE_SHADOW, receive);
        }
    }

    /// Remove a node subtree and release everything it bound.
    ///
    /// Returns the number of nodes removed.
    pub fn despawn(&mut self, id: NodeId) -> usize {
        let removed = self.graph.remove_recursive(id);
        for node in &removed {
            if let Some(geometry) = node.geometry {
                self.resources.release_geometry(geometry);
            }
            if let Some(material) = node.material {
                self.resources.release_material(material);
            }
        }
        removed.len()
    }

    /// Add an instanced batch owning a new geometry and material
    pub fn add_batch(&mut self, name: &str, geometry: Geometry, material: Material, count: usize) -> BatchId {
        let geometry = self.resources.add_geometry(geometry);
        let material = self.resources.add_material(material);
        let id = BatchId(self.next_batch);
        self.next_batch += 1;
        self.batches.insert(id, InstancedBatch::new(name, geometry, material, count));
        id
    }

    pub fn batch(&self, id: BatchId) -> Option<&InstancedBatch> {
        self.batches.get(&id)
    }

    pub fn batch_mut(&mut self, id: BatchId) -> Option<&mut InstancedBatch> {
        self.batches.get_mut(&id)
    }

    /// Remove a batch and release its resources
    pub fn remove_batch(&mut self, id: BatchId) -> bool {
        match self.batches.remove(&id) {
            Some(batch) => {
                self.resources.release_geometry(batch.geometry);
                self.resources.release_material(batch.material);
                true
            }
            None => false,
        }
    }

    /// Show or hide a batch
    pub fn set_batch_visible(&mut self, id: BatchId, visible: bool) {
        if let Some(batch) = self.batches.get_mut(&id) {
            batch.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Iterate over batches
    pub fn batches(&self) -> impl Iterator<Item = &InstancedBatch> {
        self.batches.values()
    }

    pub fn batches_mut(&mut self) -> impl Iterator<Item = &mut InstancedBatch> {
        self.batches.values_mut()
    }

    /// Number of live batches
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Draw calls a frame of the current scene costs
    pub fn draw_calls(&self) -> u32 {
        let meshes = self.graph.visible_drawables().count();
        let batches = self.batches.values().filter(|b| b.visible() && !b.is_empty()).count();
        (meshes + batches) as u32
    }

    /// Live resource counts
    pub fn resource_counts(&self) -> ResourceCounts {
        self.resources.counts()
    }
}

impl Default for RenderScene {
    fn default() -> Self {
        Self::new()
    }
}
