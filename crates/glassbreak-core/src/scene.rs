//! Scene Graph
//!
//! Hierarchical scene representation with:
//! - Transform parenting
//! - Visibility and shadow flags
//! - Geometry/material bindings into the render resource pool

use ahash::AHashMap;
use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

use crate::math::euler_to_quat;

/// Handle to a node in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw index
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Handle to a render resource (geometry, material or texture)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

bitflags! {
    /// Per-node render flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn
        const VISIBLE = 1 << 0;
        /// Node writes into shadow maps
        const CAST_SHADOW = 1 << 1;
        /// Node samples shadow maps
        const RECEIVE_SHADOW = 1 << 2;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE
    }
}

/// Local transform of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a transform from a position and XYZ Euler angles
    pub fn from_position_euler(position: Vec3, euler: Vec3) -> Self {
        Self {
            position,
            rotation: euler_to_quat(euler),
            scale: Vec3::ONE,
        }
    }

    /// Create a new transform from all components
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Get the local transformation matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    /// Handle of this node
    pub id: NodeId,
    /// Node name for identification
    pub name: String,
    /// Local transform
    pub local_transform: Transform,
    /// Cached world matrix
    world_matrix: Mat4,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Child nodes
    pub children: SmallVec<[NodeId; 8]>,
    /// Render flags
    pub flags: NodeFlags,
    /// Bound geometry
    pub geometry: Option<ResourceId>,
    /// Bound material
    pub material: Option<ResourceId>,
}

impl Node {
    fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            local_transform: Transform::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            parent: None,
            children: SmallVec::new(),
            flags: NodeFlags::default(),
            geometry: None,
            material: None,
        }
    }

    /// Get the world matrix as of the last `update_transforms`
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Whether the node itself is flagged visible
    pub fn visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Whether the node has something to draw
    pub fn is_drawable(&self) -> bool {
        self.geometry.is_some() && self.material.is_some()
    }

    fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }
}

/// Scene graph managing the node hierarchy
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: AHashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u32,
}

impl SceneGraph {
    /// Create a new empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new root node
    pub fn spawn(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, name.into()));
        self.roots.push(id);
        id
    }

    /// Add a new node under `parent`
    pub fn spawn_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.spawn(name);
        self.set_parent(id, Some(parent));
        id
    }

    /// Remove a node and its whole subtree, returning the removed nodes so
    /// their bound resources can be released.
    pub fn remove_recursive(&mut self, id: NodeId) -> Vec<Node> {
        let mut removed = Vec::new();
        if !self.nodes.contains_key(&id) {
            return removed;
        }

        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.remove_child(id);
        }
        self.roots.retain(|&r| r != id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                removed.push(node);
            }
        }
        removed
    }

    /// Get a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Set the parent of a node
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        let old_parent = match self.nodes.get(&child) {
            Some(node) => node.parent,
            None => return,
        };
        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.remove_child(child);
        }

        match parent.filter(|p| *p != child && self.nodes.contains_key(p)) {
            Some(parent_id) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.parent = Some(parent_id);
                }
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
                if let Some(node) = self.nodes.get_mut(&child) {
                    node.parent = None;
                }
            }
        }
    }

    /// Set the local transform of a node
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local_transform = transform;
        }
    }

    /// Show or hide a node (and so its subtree)
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Whether the node and every ancestor are visible
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            if !node.visible() {
                return false;
            }
            current = node.parent;
        }
        current.is_none() && self.nodes.contains_key(&id)
    }

    /// Get root nodes
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Update world matrices for the whole hierarchy
    pub fn update_transforms(&mut self) {
        let mut stack: Vec<(NodeId, Mat4)> = self.roots.iter().map(|&r| (r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&id) {
                let world = parent_world * node.local_transform.local_matrix();
                node.world_matrix = world;
                stack.extend(node.children.iter().map(|&c| (c, world)));
            }
        }
    }

    /// Find a node by name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.values().find(|node| node.name == name).map(|node| node.id)
    }

    /// Get all descendants of a node
    pub fn get_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        self.collect_descendants(id, &mut descendants);
        descendants
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&id) {
            for &child in &node.children {
                result.push(child);
                self.collect_descendants(child, result);
            }
        }
    }

    /// Iterate over every node
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes that would be drawn this frame
    pub fn visible_drawables(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .values()
            .filter(|node| node.is_drawable() && self.is_effectively_visible(node.id))
    }

    /// Get the number of nodes in the scene
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let translation = t.local_matrix().w_axis.truncate();
        assert!((translation - Vec3::new(1.0, 2.0, 3.0)).length() < 0.001);
    }

    #[test]
    fn test_spawn_and_parenting() {
        let mut sg = SceneGraph::new();
        let parent = sg.spawn("Panel");
        let child = sg.spawn_child(parent, "TopRail");

        assert_eq!(sg.node_count(), 2);
        assert!(sg.get(parent).unwrap().children.contains(&child));
        assert_eq!(sg.get(child).unwrap().parent, Some(parent));
        assert!(!sg.roots().contains(&child));
    }

    #[test]
    fn test_remove_recursive() {
        let mut sg = SceneGraph::new();
        let root = sg.spawn("Panel");
        let a = sg.spawn_child(root, "A");
        let _b = sg.spawn_child(a, "B");
        let other = sg.spawn("Floor");

        let removed = sg.remove_recursive(root);
        assert_eq!(removed.len(), 3);
        assert_eq!(sg.node_count(), 1);
        assert!(sg.contains(other));
        assert_eq!(sg.roots(), &[other]);

        assert!(sg.remove_recursive(root).is_empty());
    }

    #[test]
    fn test_effective_visibility() {
        let mut sg = SceneGraph::new();
        let parent = sg.spawn("Panel");
        let child = sg.spawn_child(parent, "Post");

        assert!(sg.is_effectively_visible(child));
        sg.set_visible(parent, false);
        assert!(!sg.is_effectively_visible(child));
        sg.set_visible(parent, true);
        assert!(sg.is_effectively_visible(child));
    }

    #[test]
    fn test_update_transforms() {
        let mut sg = SceneGraph::new();
        let parent = sg.spawn("Parent");
        let child = sg.spawn_child(parent, "Child");
        sg.set_transform(parent, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        sg.set_transform(child, Transform::from_position(Vec3::new(5.0, 0.0, 0.0)));

        sg.update_transforms();

        let world = sg.get(child).unwrap().world_matrix().w_axis.truncate();
        assert!((world.x - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_find_by_name() {
        let mut sg = SceneGraph::new();
        let id = sg.spawn("GlassPane");
        assert_eq!(sg.find_by_name("GlassPane"), Some(id));
        assert_eq!(sg.find_by_name("Missing"), None);
    }

    #[test]
    fn test_visible_drawables() {
        let mut sg = SceneGraph::new();
        let drawable = sg.spawn("Pane");
        let empty = sg.spawn("Group");
        if let Some(node) = sg.get_mut(drawable) {
            node.geometry = Some(ResourceId(1));
            node.material = Some(ResourceId(2));
        }
        assert_eq!(sg.visible_drawables().count(), 1);
        assert!(!sg.get(empty).unwrap().is_drawable());

        sg.set_visible(drawable, false);
        assert_eq!(sg.visible_drawables().count(), 0);
    }
}
