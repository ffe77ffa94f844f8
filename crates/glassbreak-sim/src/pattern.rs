//! Procedural Patterns
//!
//! Random stroke and disc layouts for the textures generated at runtime.
//! Layouts are authored on a fixed reference canvas and normalized, so the
//! renderer can rasterize them at whatever resolution the tier allows.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use glassbreak_renderer::{GradientDisc, Stroke, TextureData, WrapMode};
use rand::Rng;

/// Canvas size crack layouts are authored at
pub const CRACK_REFERENCE_SIZE: f32 = 2048.0;

/// Edge of the decorative bubble texture
pub const BUBBLE_TEXTURE_SIZE: u32 = 512;

const RING_COLOR: [u8; 4] = [30, 30, 30, 230];
const MAIN_RADIAL_COLOR: [u8; 4] = [20, 20, 20, 242];
const SECONDARY_RADIAL_COLOR: [u8; 4] = [40, 40, 40, 204];
const MICRO_CRACK_COLOR: [u8; 4] = [50, 50, 50, 153];

/// Radial, ring and branching crack layout around an impact
#[derive(Debug, Clone, PartialEq)]
pub struct CrackPattern {
    /// Normalized impact centre
    pub center: Vec2,
    pub strokes: Vec<Stroke>,
}

impl CrackPattern {
    /// Lay out a fresh pattern; every call differs
    pub fn generate(rng: &mut impl Rng) -> Self {
        let size = CRACK_REFERENCE_SIZE;
        let center = Vec2::new(
            size / 2.0 + rng.gen_range(-0.05..0.05) * size,
            size / 2.0 + rng.gen_range(-0.05..0.05) * size,
        );
        let mut strokes = Vec::new();

        // Concentric broken rings
        let mut radius = 30.0;
        while radius < size * 0.45 {
            let segments = rng.gen_range(8..16);
            for i in 0..segments {
                let start = i as f32 / segments as f32 * TAU + rng.gen_range(0.0..0.2);
                let end = (i as f32 + 0.7 + rng.gen_range(0.0..0.2)) / segments as f32 * TAU;
                let r = radius + rng.gen_range(-2.5..2.5);
                strokes.push(arc(center, r, start, end, 3.0, RING_COLOR));
            }
            radius += rng.gen_range(40.0..70.0);
        }

        // Main radials wander sideways as they run out
        let main = rng.gen_range(12..20);
        for i in 0..main {
            let angle = i as f32 / main as f32 * TAU + rng.gen_range(0.0..0.3);
            let length = size * 0.4 + rng.gen_range(0.0..0.1) * size;
            let dir = Vec2::from_angle(angle);
            let perp = Vec2::from_angle(angle + FRAC_PI_2);
            let steps = 20;
            let mut points = Vec::with_capacity(steps + 1);
            points.push(center + dir * 20.0);
            for j in 1..=steps {
                let t = j as f32 / steps as f32;
                let deviation = rng.gen_range(-7.5..7.5);
                points.push(center + dir * length * t + perp * deviation);
            }
            strokes.push(stroke(points, 4.0, MAIN_RADIAL_COLOR));
        }

        // Short secondary radials
        let secondary = rng.gen_range(30..50);
        for _ in 0..secondary {
            let dir = Vec2::from_angle(rng.gen_range(0.0..TAU));
            let start = rng.gen_range(30.0..80.0);
            let length = rng.gen_range(80.0..230.0);
            strokes.push(stroke(
                vec![center + dir * start, center + dir * (start + length)],
                2.0,
                SECONDARY_RADIAL_COLOR,
            ));
        }

        // Micro fissures scattered around the centre
        for _ in 0..100 {
            let origin = center + Vec2::new(rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3)) * size;
            let dir = Vec2::from_angle(rng.gen_range(0.0..TAU));
            let length = rng.gen_range(10.0..40.0);
            strokes.push(stroke(vec![origin, origin + dir * length], 1.2, MICRO_CRACK_COLOR));
        }

        Self {
            center: center / size,
            strokes,
        }
    }

    /// Rasterize onto a transparent square texture
    pub fn rasterize(&self, resolution: u32) -> TextureData {
        let mut texture = TextureData::new(resolution, resolution);
        texture.draw_strokes(&self.strokes, CRACK_REFERENCE_SIZE);
        texture
    }
}

fn stroke(points: Vec<Vec2>, width: f32, color: [u8; 4]) -> Stroke {
    Stroke {
        points: points.into_iter().map(|p| p / CRACK_REFERENCE_SIZE).collect(),
        width,
        color,
    }
}

fn arc(center: Vec2, radius: f32, start: f32, end: f32, width: f32, color: [u8; 4]) -> Stroke {
    // Roughly one vertex per 12 reference pixels of arc
    let sweep = end - start;
    let steps = ((sweep.abs() * radius / 12.0).ceil() as usize).clamp(2, 64);
    let points = (0..=steps)
        .map(|k| center + Vec2::from_angle(start + sweep * k as f32 / steps as f32) * radius)
        .collect();
    stroke(points, width, color)
}

/// Hammered-glass texture: light base with soft bubble discs
pub fn bubble_texture(rng: &mut impl Rng) -> TextureData {
    let size = BUBBLE_TEXTURE_SIZE;
    let mut texture = TextureData::filled(size, size, [0xf0, 0xf0, 0xf0, 255]);
    texture.wrap = WrapMode::Repeat;
    for _ in 0..250 {
        let disc = GradientDisc {
            center: Vec2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
            radius: rng.gen_range(5.0..30.0),
            inner: [0xff, 0xff, 0xff, 255],
            outer: [0xb0, 0xb0, 0xb0, 255],
            alpha: 0.2,
        };
        texture.fill_gradient_disc(&disc, size as f32);
    }
    texture
}
