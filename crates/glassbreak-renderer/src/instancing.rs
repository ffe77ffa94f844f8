//! Instanced Batches
//!
//! One geometry and one material drawn many times in a single call, each
//! instance with its own transform.

use glam::Mat4;
use glassbreak_core::{NodeFlags, ResourceId};

/// Handle to a batch in a render scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub(crate) u32);

/// Instanced draw
#[derive(Debug, Clone)]
pub struct InstancedBatch {
    /// Debug name
    pub name: String,
    /// Shared geometry
    pub geometry: ResourceId,
    /// Shared material
    pub material: ResourceId,
    /// Render flags
    pub flags: NodeFlags,
    transforms: Vec<Mat4>,
    dirty: bool,
}

impl InstancedBatch {
    /// Batch with `count` identity instances
    pub fn new(name: impl Into<String>, geometry: ResourceId, material: ResourceId, count: usize) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            flags: NodeFlags::default(),
            transforms: vec![Mat4::IDENTITY; count],
            dirty: true,
        }
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Write one instance transform; out-of-range slots are ignored
    pub fn set_instance(&mut self, slot: usize, transform: Mat4) -> bool {
        match self.transforms.get_mut(slot) {
            Some(t) => {
                *t = transform;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Read one instance transform
    pub fn instance(&self, slot: usize) -> Option<Mat4> {
        self.transforms.get(slot).copied()
    }

    /// All instance transforms
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Whether the instance buffer needs re-upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the instance buffer as uploaded
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether the batch is drawn
    pub fn visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_set_instance() {
        let mut batch = InstancedBatch::new("cubes", ResourceId(0), ResourceId(1), 3);
        batch.clear_dirty();

        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(batch.set_instance(1, transform));
        assert!(batch.is_dirty());
        assert_eq!(batch.instance(1), Some(transform));

        assert!(!batch.set_instance(3, transform));
        assert_eq!(batch.len(), 3);
    }
}
