//! # Glassbreak Platform
//!
//! Platform abstraction layer for the glassbreak showcase.
//!
//! This crate provides host-facing abstractions for:
//! - **Device**: Capability detection feeding quality profile resolution
//! - **Input**: Double-click / double-tap gesture decoding
//! - **Storage**: Key-value persistence (quality tier, one-shot hints)
//! - **Audio**: Break cue playback with swallowed playback failures
//! - **Timers**: Frame-rate windows and traced scoped timers

pub mod audio;
pub mod input;
pub mod storage;
pub mod timer;

pub use audio::{AudioError, AudioSink, BreakCue, NullSink, RecordingSink};
pub use input::{Gesture, GestureDecoder, InputEvent};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use timer::{FpsCounter, ScopedTimer};

use glassbreak_core::DeviceSignals;
use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("File I/O error: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("Malformed store contents: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Platform identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android (arm64)
    Android,
    /// iOS (arm64)
    Ios,
    /// Windows (x64)
    Windows,
    /// Linux (x64)
    Linux,
    /// macOS
    MacOs,
    /// Browser (wasm32)
    Web,
    /// Unknown platform
    Unknown,
}

impl Platform {
    /// Get the current platform
    pub fn current() -> Self {
        #[cfg(target_os = "android")]
        return Platform::Android;

        #[cfg(target_os = "ios")]
        return Platform::Ios;

        #[cfg(target_os = "windows")]
        return Platform::Windows;

        #[cfg(target_os = "linux")]
        return Platform::Linux;

        #[cfg(target_os = "macos")]
        return Platform::MacOs;

        #[cfg(target_arch = "wasm32")]
        return Platform::Web;

        #[cfg(not(any(
            target_os = "android",
            target_os = "ios",
            target_os = "windows",
            target_os = "linux",
            target_os = "macos",
            target_arch = "wasm32"
        )))]
        return Platform::Unknown;
    }

    /// Check if this is a mobile platform
    pub fn is_mobile(&self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }

    /// Get the recommended graphics backend
    pub fn recommended_graphics_backend(&self) -> GraphicsBackend {
        match self {
            Platform::Android | Platform::Windows | Platform::Linux => GraphicsBackend::Vulkan,
            Platform::Ios | Platform::MacOs => GraphicsBackend::Metal,
            Platform::Web => GraphicsBackend::WebGPU,
            Platform::Unknown => GraphicsBackend::OpenGL,
        }
    }
}

/// Graphics backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsBackend {
    /// Vulkan (Android, Windows, Linux)
    Vulkan,
    /// Metal (iOS, macOS)
    Metal,
    /// DirectX 12 (Windows)
    DirectX12,
    /// OpenGL ES / WebGL2 fallback
    OpenGL,
    /// WebGPU
    WebGPU,
}

impl GraphicsBackend {
    /// Get wgpu backend equivalent
    pub fn to_wgpu_backend(&self) -> wgpu::Backends {
        match self {
            GraphicsBackend::Vulkan => wgpu::Backends::VULKAN,
            GraphicsBackend::Metal => wgpu::Backends::METAL,
            GraphicsBackend::DirectX12 => wgpu::Backends::DX12,
            GraphicsBackend::OpenGL => wgpu::Backends::GL,
            GraphicsBackend::WebGPU => wgpu::Backends::BROWSER_WEBGPU,
        }
    }
}

/// Device capabilities detected at startup
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// Platform
    pub platform: Platform,
    /// Graphics backend
    pub graphics_backend: GraphicsBackend,
    /// Whether a GPU context can be created at all
    pub gpu_available: bool,
    /// Number of logical CPU cores
    pub cpu_cores: usize,
    /// Viewport width in logical pixels
    pub viewport_width: u32,
    /// Viewport height in logical pixels
    pub viewport_height: u32,
    /// Physical pixels per logical pixel
    pub device_pixel_ratio: f32,
}

impl DeviceCapabilities {
    /// Detect device capabilities for a viewport of the given size
    pub fn detect(viewport_width: u32, viewport_height: u32, device_pixel_ratio: f32) -> Self {
        let platform = Platform::current();
        let cpu_cores = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1);

        Self {
            platform,
            graphics_backend: platform.recommended_graphics_backend(),
            gpu_available: true,
            cpu_cores,
            viewport_width,
            viewport_height,
            device_pixel_ratio,
        }
    }

    /// Capabilities of a headless host with no GPU context
    pub fn headless() -> Self {
        Self {
            gpu_available: false,
            ..Self::detect(1280, 720, 1.0)
        }
    }

    /// Signals consumed by quality profile resolution
    pub fn signals(&self) -> DeviceSignals {
        DeviceSignals {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            device_pixel_ratio: self.device_pixel_ratio,
            logical_cores: self.cpu_cores,
            mobile: self.platform.is_mobile(),
        }
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self::detect(1280, 720, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_characteristics() {
        assert!(Platform::Android.is_mobile());
        assert!(Platform::Ios.is_mobile());
        assert!(!Platform::Linux.is_mobile());
        assert!(!Platform::Web.is_mobile());
    }

    #[test]
    fn test_graphics_backend() {
        assert_eq!(Platform::Ios.recommended_graphics_backend(), GraphicsBackend::Metal);
        assert_eq!(Platform::Web.recommended_graphics_backend(), GraphicsBackend::WebGPU);
        assert_eq!(
            GraphicsBackend::WebGPU.to_wgpu_backend(),
            wgpu::Backends::BROWSER_WEBGPU
        );
        let caps = DeviceCapabilities::default();
        assert_eq!(caps.graphics_backend, caps.platform.recommended_graphics_backend());
    }

    #[test]
    fn test_device_signals() {
        let caps = DeviceCapabilities::detect(390, 844, 3.0);
        let signals = caps.signals();
        assert_eq!(signals.viewport_width, 390);
        assert_eq!(signals.device_pixel_ratio, 3.0);
        assert!(signals.logical_cores >= 1);
    }

    #[test]
    fn test_headless_has_no_gpu() {
        assert!(!DeviceCapabilities::headless().gpu_available);
    }
}
