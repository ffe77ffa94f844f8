//! Procedural Textures
//!
//! CPU rasterization of the canvas-style textures the showcase generates at
//! runtime: crack overlays (stroked polylines on a transparent background)
//! and the decorative glass bubble pattern (radial-gradient discs).

use glam::Vec2;

/// Texture addressing outside 0..1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
}

/// RGBA8 color, straight alpha
pub type Rgba = [u8; 4];

/// Polyline stroke in normalized 0..1 texture space
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Polyline vertices, normalized
    pub points: Vec<Vec2>,
    /// Line width in pixels at the reference resolution
    pub width: f32,
    /// Stroke color
    pub color: Rgba,
}

/// Filled disc with a radial gradient, in normalized space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDisc {
    pub center: Vec2,
    /// Radius in pixels at the reference resolution
    pub radius: f32,
    pub inner: Rgba,
    pub outer: Rgba,
    /// Global alpha applied to the whole disc
    pub alpha: f32,
}

/// CPU-side texture image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// Addressing mode
    pub wrap: WrapMode,
}

impl TextureData {
    /// Fully transparent image
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Image filled with one color
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
            wrap: WrapMode::ClampToEdge,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Size of the pixel data in bytes
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Read one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Fraction of pixels with non-zero alpha
    pub fn alpha_coverage(&self) -> f32 {
        let total = (self.width as usize) * (self.height as usize);
        if total == 0 {
            return 0.0;
        }
        let covered = self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count();
        covered as f32 / total as f32
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let src_a = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for c in 0..3 {
            let src = color[c] as f32 / 255.0;
            let dst = self.pixels[i + c] as f32 / 255.0;
            let out = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a.max(f32::EPSILON);
            self.pixels[i + c] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Stroke a line segment in pixel space with a one-pixel soft edge
    pub fn stroke_segment(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        let half = (width * 0.5).max(0.5);
        let min = a.min(b) - Vec2::splat(half + 1.0);
        let max = a.max(b) + Vec2::splat(half + 1.0);
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);

        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let distance = p.distance(a + ab * t);
                let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Draw normalized strokes authored at `reference_size` pixels
    pub fn draw_strokes(&mut self, strokes: &[Stroke], reference_size: f32) {
        let scale = Vec2::new(self.width as f32, self.height as f32);
        let width_scale = self.width as f32 / reference_size.max(1.0);
        for stroke in strokes {
            let width = stroke.width * width_scale;
            for pair in stroke.points.windows(2) {
                self.stroke_segment(pair[0] * scale, pair[1] * scale, width, stroke.color);
            }
        }
    }

    /// Fill a normalized gradient disc authored at `reference_size` pixels
    pub fn fill_gradient_disc(&mut self, disc: &GradientDisc, reference_size: f32) {
        let scale = self.width as f32 / reference_size.max(1.0);
        let center = disc.center * Vec2::new(self.width as f32, self.height as f32);
        let radius = (disc.radius * scale).max(0.5);

        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = p.distance(center) / radius;
                if t > 1.0 {
                    continue;
                }
                let mut color = [0u8; 4];
                for c in 0..4 {
                    let inner = disc.inner[c] as f32;
                    let outer = disc.outer[c] as f32;
                    color[c] = (inner + (outer - inner) * t).round() as u8;
                }
                self.blend(x, y, color, disc.alpha);
            }
        }
    }
}
