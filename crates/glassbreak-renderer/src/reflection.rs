//! Environment Reflection Capture
//!
//! Cube-camera refresh of the reflection map glass samples at the top tier.
//! The glass itself must not appear in its own reflection, so the pane and
//! any fragments are hidden for the capture and restored before returning.

use glam::Vec3;
use glassbreak_core::{NodeFlags, NodeId, ResourceId};

use crate::instancing::BatchId;
use crate::scene::RenderScene;
use crate::texture::TextureData;

/// Cube camera placement and clip range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Face edge in texels
    pub resolution: u32,
    /// Probe position
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
}

impl CaptureSettings {
    /// Probe at pane height with the given resolution
    pub fn with_resolution(resolution: u32) -> Self {
        Self {
            resolution: resolution.max(1),
            position: Vec3::new(0.0, 0.9, 0.0),
            near: 0.1,
            far: 20.0,
        }
    }
}

/// What a capture saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureReport {
    /// Draw calls issued per cube face
    pub draw_calls: u32,
    /// Nodes and batches hidden for the capture
    pub hidden: usize,
}

/// Cube reflection probe
#[derive(Debug)]
pub struct EnvironmentCapture {
    settings: CaptureSettings,
    target: ResourceId,
    captures: u64,
}

impl EnvironmentCapture {
    /// Allocate the cube target in the scene and make it the scene env map
    pub fn new(settings: CaptureSettings, scene: &mut RenderScene) -> Self {
        let faces = TextureData::new(settings.resolution, settings.resolution * 6);
        let target = scene.resources.add_texture(faces);
        scene.env_map = Some(target);
        log::debug!("Reflection probe allocated at {}px", settings.resolution);
        Self {
            settings,
            target,
            captures: 0,
        }
    }

    /// Cube target texture
    pub fn target(&self) -> ResourceId {
        self.target
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Captures performed so far
    pub fn capture_count(&self) -> u64 {
        self.captures
    }

    /// Hide `nodes` and `batches`, capture, then restore their visibility
    pub fn capture(&mut self, scene: &mut RenderScene, nodes: &[NodeId], batches: &[BatchId]) -> CaptureReport {
        let node_state: Vec<(NodeId, bool)> = nodes
            .iter()
            .filter_map(|&id| scene.graph.get(id).map(|n| (id, n.visible())))
            .collect();
        let batch_state: Vec<(BatchId, bool)> = batches
            .iter()
            .filter_map(|&id| scene.batch(id).map(|b| (id, b.flags.contains(NodeFlags::VISIBLE))))
            .collect();

        for &(id, _) in &node_state {
            scene.graph.set_visible(id, false);
        }
        for &(id, _) in &batch_state {
            scene.set_batch_visible(id, false);
        }

        scene.graph.update_transforms();
        let draw_calls = scene.draw_calls();

        for &(id, visible) in &node_state {
            scene.graph.set_visible(id, visible);
        }
        for &(id, visible) in &batch_state {
            scene.set_batch_visible(id, visible);
        }

        self.captures += 1;
        scene.env_map = Some(self.target);
        CaptureReport {
            draw_calls,
            hidden: node_state.len() + batch_state.len(),
        }
    }

    /// Free the cube target
    pub fn release(self, scene: &mut RenderScene) {
        scene.resources.release_texture(self.target);
        if scene.env_map == Some(self.target) {
            scene.env_map = None;
        }
    }
}
