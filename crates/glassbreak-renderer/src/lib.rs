//! # Glassbreak Renderer
//!
//! Render scene orchestration for the glass fracture showcase. The GPU
//! backend does the rasterization; this crate owns what it draws.
//!
//! ## Features
//! - Scene graph + resource pool with explicit release
//! - Basic / standard / physical materials
//! - Instanced batches (one draw call for thousands of fragments)
//! - Procedural crack and bubble textures
//! - Cube reflection capture, bloom/SMAA composer, idle sample accumulation

pub mod accumulation;
pub mod instancing;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod post;
pub mod reflection;
pub mod resources;
pub mod scene;
pub mod texture;

pub use accumulation::{RenderMode, SampleAccumulator};
pub use instancing::{BatchId, InstancedBatch};
pub use lighting::{Light, LightRig, LightType};
pub use material::{AlphaMode, BasicMaterial, Material, PhysicalMaterial, Side, StandardMaterial};
pub use mesh::Geometry;
pub use post::{BloomSettings, PostProcess, ToneMapper};
pub use reflection::{CaptureReport, CaptureSettings, EnvironmentCapture};
pub use resources::{ResourceCounts, ResourcePool};
pub use scene::RenderScene;
pub use texture::{GradientDisc, Stroke, TextureData, WrapMode};

use glassbreak_core::{QualityProfile, QualityTier};
use thiserror::Error;

/// Renderer errors
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("No GPU device available: {0}")]
    DeviceUnavailable(String),
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Shadow filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowQuality {
    Off,
    /// Hard shadows
    Basic,
    /// Soft PCF shadows
    Soft,
}

/// Renderer quality settings derived from the session profile
#[derive(Debug, Clone, PartialEq)]
pub struct QualitySettings {
    /// Tier the settings came from
    pub tier: QualityTier,
    /// Pixel ratio used for the backbuffer
    pub pixel_ratio: f32,
    /// Shadow filtering
    pub shadow_quality: ShadowQuality,
    /// Shadow map edge in texels
    pub shadow_map_resolution: u32,
    /// MSAA sample count for the default framebuffer
    pub msaa_samples: u32,
    /// Composer configuration
    pub post: PostProcess,
    /// Cube reflection resolution, when reflections run
    pub reflection_resolution: Option<u32>,
    /// Target frame time in ms
    pub target_frame_time_ms: f32,
}

impl QualitySettings {
    /// Settings for a resolved profile
    pub fn from_profile(profile: &QualityProfile) -> Self {
        let shadow_quality = match (profile.shadows_enabled, profile.tier) {
            (false, _) => ShadowQuality::Off,
            (true, QualityTier::High) => ShadowQuality::Soft,
            (true, _) => ShadowQuality::Basic,
        };
        Self {
            tier: profile.tier,
            pixel_ratio: profile.pixel_density_cap,
            shadow_quality,
            shadow_map_resolution: profile.shadow_map_resolution,
            msaa_samples: if profile.antialias { 4 } else { 1 },
            post: PostProcess::from_profile(profile),
            reflection_resolution: profile
                .reflections_enabled()
                .then_some(profile.reflection_map_resolution),
            target_frame_time_ms: 1000.0 / profile.target_frame_rate.max(1) as f32,
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self::from_profile(&QualityProfile::default())
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Quality settings
    pub quality: QualitySettings,
    /// Preferred graphics backend
    pub backend: wgpu::Backends,
    /// Present mode
    pub present_mode: wgpu::PresentMode,
    /// Power preference for adapter selection
    pub power_preference: wgpu::PowerPreference,
}

impl RendererConfig {
    /// Configuration for a profile on the default backends
    pub fn for_profile(profile: &QualityProfile) -> Self {
        Self {
            quality: QualitySettings::from_profile(profile),
            ..Default::default()
        }
    }

    /// Restrict adapter selection to `backend`
    pub fn with_backend(mut self, backend: wgpu::Backends) -> Self {
        self.backend = backend;
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            quality: QualitySettings::default(),
            backend: wgpu::Backends::all(),
            present_mode: wgpu::PresentMode::AutoVsync,
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Per-frame context the simulation hands to the renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    /// The camera moved this frame
    pub camera_moving: bool,
    /// Fragments are still in flight
    pub animating: bool,
}

/// Renderer statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererStats {
    /// Scene draw calls this frame
    pub draw_calls: u32,
    /// Fullscreen post passes this frame
    pub post_passes: u32,
    /// Instances drawn through batches
    pub instances: u32,
    /// Batches whose instance buffer was re-uploaded this frame
    pub instance_uploads: u32,
    /// Approximate triangles submitted
    pub triangles: u64,
    /// Accumulated samples after this frame
    pub samples: u32,
}

/// Main renderer instance
pub struct Renderer {
    config: RendererConfig,
    stats: RendererStats,
    frame_number: u64,
    accumulator: SampleAccumulator,
}

impl Renderer {
    /// Create a renderer; fails when the host has no GPU context
    pub fn new(config: RendererConfig, gpu_available: bool) -> RendererResult<Self> {
        if !gpu_available {
            return Err(RendererError::DeviceUnavailable(format!(
                "no adapter for {:?}",
                config.backend
            )));
        }
        log::info!(
            "Renderer ready: {:?}, tier {}, pixel ratio {:.2}, msaa x{}",
            config.backend,
            config.quality.tier,
            config.quality.pixel_ratio,
            config.quality.msaa_samples
        );
        Ok(Self {
            config,
            stats: RendererStats::default(),
            frame_number: 0,
            accumulator: SampleAccumulator::new(),
        })
    }

    /// Get the renderer configuration
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Get renderer statistics for the last frame
    pub fn stats(&self) -> &RendererStats {
        &self.stats
    }

    /// Get the current frame number
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Accumulation policy
    pub fn accumulator(&self) -> &SampleAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut SampleAccumulator {
        &mut self.accumulator
    }

    /// Render one frame of `scene`
    pub fn render(&mut self, scene: &mut RenderScene, context: FrameContext) -> &RendererStats {
        self.frame_number += 1;
        scene.graph.update_transforms();

        let mut stats = RendererStats {
            draw_calls: scene.draw_calls(),
            post_passes: self.config.quality.post.pass_count(),
            ..Default::default()
        };

        for node in scene.graph.visible_drawables() {
            if let Some(geometry) = node.geometry.and_then(|g| scene.resources.geometry(g)) {
                stats.triangles += geometry.triangle_count() as u64;
            }
        }
        for batch in scene.batches().filter(|b| b.visible()) {
            stats.instances += batch.len() as u32;
            if let Some(geometry) = scene.resources.geometry(batch.geometry) {
                stats.triangles += geometry.triangle_count() as u64 * batch.len() as u64;
            }
        }
        for batch in scene.batches_mut().filter(|b| b.visible() && b.is_dirty()) {
            batch.clear_dirty();
            stats.instance_uploads += 1;
        }

        let supported = self.config.quality.tier == QualityTier::High;
        stats.samples = self
            .accumulator
            .advance(supported, context.camera_moving, context.animating);

        tracing::trace!(
            target: "render",
            frame = self.frame_number,
            draw_calls = stats.draw_calls,
            triangles = stats.triangles,
            "Frame submitted"
        );
        self.stats = stats;
        &self.stats
    }
}
