//! # Glassbreak Sim
//!
//! The fracture showcase itself, built on the core, platform, renderer and
//! physics crates.
//!
//! - **Glass**: catalogue of the four glass types
//! - **Panel**: intact pane and frame factory
//! - **Fracture**: impact → fragments, or a crack overlay for laminated
//! - **Adapter**: fragments into instanced batches or scene nodes
//! - **Controller**: the `Intact → Animating → Settled` simulator
//! - **Showcase**: host wrapper with tier persistence and graceful degradation

pub mod adapter;
pub mod config;
pub mod controller;
pub mod fracture;
pub mod glass;
pub mod hud;
pub mod intent;
pub mod materials;
pub mod panel;
pub mod pattern;
pub mod shake;
pub mod showcase;

pub use adapter::{Fragment, FragmentSet, RenderHandle};
pub use config::{SceneVariant, SimulationConfig};
pub use controller::{FrameReport, SimState, Simulator};
pub use fracture::{generate_break, BreakOutcome, FragmentShape};
pub use glass::{FragmentShapeKind, GlassType, GlassTypeSpec, UnknownGlassType};
pub use hud::HudSnapshot;
pub use intent::{BreakTarget, ImpactPoint, Intent};
pub use panel::{build_panel, GlassPanel};
pub use showcase::Showcase;

use glassbreak_platform::PlatformError;
use glassbreak_renderer::RendererError;
use thiserror::Error;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    GlassType(#[from] UnknownGlassType),
}

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;
