//! Render Resources
//!
//! Owns every geometry, material and texture the scene references. Nodes
//! and batches hold `ResourceId`s; releasing a node releases what it binds.
//! Live counts let callers verify nothing leaks across rebuilds.

use ahash::AHashMap;
use glassbreak_core::ResourceId;

use crate::material::Material;
use crate::mesh::Geometry;
use crate::texture::TextureData;

/// Live resource counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ResourceCounts {
    /// Sum of all live resources
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

/// Pool of render resources keyed by a shared id space
#[derive(Debug, Default)]
pub struct ResourcePool {
    geometries: AHashMap<ResourceId, Geometry>,
    materials: AHashMap<ResourceId, Material>,
    textures: AHashMap<ResourceId, TextureData>,
    next_id: u64,
}

impl ResourcePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a geometry
    pub fn add_geometry(&mut self, geometry: Geometry) -> ResourceId {
        let id = self.allocate_id();
        self.geometries.insert(id, geometry);
        id
    }

    /// Register a material
    pub fn add_material(&mut self, material: Material) -> ResourceId {
        let id = self.allocate_id();
        self.materials.insert(id, material);
        id
    }

    /// Register a texture
    pub fn add_texture(&mut self, texture: TextureData) -> ResourceId {
        let id = self.allocate_id();
        self.textures.insert(id, texture);
        id
    }

    pub fn geometry(&self, id: ResourceId) -> Option<&Geometry> {
        self.geometries.get(&id)
    }

    pub fn material(&self, id: ResourceId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn material_mut(&mut self, id: ResourceId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn texture(&self, id: ResourceId) -> Option<&TextureData> {
        self.textures.get(&id)
    }

    /// Drop a geometry
    pub fn release_geometry(&mut self, id: ResourceId) -> bool {
        self.geometries.remove(&id).is_some()
    }

    /// Drop a material and the textures it owns
    pub fn release_material(&mut self, id: ResourceId) -> bool {
        match self.materials.remove(&id) {
            Some(material) => {
                for texture in material.texture_refs() {
                    self.release_texture(texture);
                }
                true
            }
            None => false,
        }
    }

    /// Drop a texture
    pub fn release_texture(&mut self, id: ResourceId) -> bool {
        self.textures.remove(&id).is_some()
    }

    /// Live counts
    pub fn counts(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
        }
    }

    /// Bytes held by texture images
    pub fn texture_bytes(&self) -> usize {
        self.textures.values().map(TextureData::byte_size).sum()
    }

    /// Materials, for bulk updates such as env-map binding
    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{BasicMaterial, PhysicalMaterial};
    use glam::Vec3;

    #[test]
    fn test_add_and_release() {
        let mut pool = ResourcePool::new();
        let geometry = pool.add_geometry(Geometry::cube(Vec3::ONE));
        let material = pool.add_material(Material::Basic(BasicMaterial::default()));

        assert_eq!(pool.counts().total(), 2);
        assert_ne!(geometry, material);

        assert!(pool.release_geometry(geometry));
        assert!(!pool.release_geometry(geometry));
        assert!(pool.release_material(material));
        assert_eq!(pool.counts(), ResourceCounts::default());
    }

    #[test]
    fn test_material_release_frees_textures() {
        let mut pool = ResourcePool::new();
        let texture = pool.add_texture(TextureData::new(8, 8));
        let env = pool.add_texture(TextureData::new(4, 24));
        let material = pool.add_material(Material::Physical(PhysicalMaterial {
            map: Some(texture),
            roughness_map: Some(texture),
            env_map: Some(env),
            ..Default::default()
        }));
        assert_eq!(pool.texture_bytes(), 8 * 8 * 4 + 4 * 24 * 4);

        pool.release_material(material);
        let counts = pool.counts();
        assert_eq!(counts.materials, 0);
        // Shared environment map survives
        assert_eq!(counts.textures, 1);
        assert!(pool.texture(env).is_some());
    }
}
