//! Laminated glass: the pane survives, a crack overlay appears on both faces
//! and the panel shakes briefly. Nothing is launched.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use glassbreak_core::{PanelRect, QualityProfile, ResourceId};
use glassbreak_physics::FragmentBody;
use glassbreak_renderer::material::color_from_hex;
use glassbreak_renderer::{AlphaMode, BasicMaterial, Material, PhysicalMaterial, Side};
use rand::Rng;

use crate::pattern::CrackPattern;

/// Clearance between the crack planes and the pane faces
const FACE_CLEARANCE: f32 = 0.001;
/// Interlayer film inset
const FILM_SCALE: f32 = 0.98;

/// Which overlay plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    CrackFront,
    /// Mirrored copy seen from behind
    CrackBack,
    /// Darkened crack lines inside the pane
    DarkCenter,
    /// PVB film between the plies
    Interlayer,
}

/// One static plane of the overlay, relative to the pane centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayer {
    pub kind: OverlayKind,
    pub size: Vec2,
    pub offset_z: f32,
    pub rotation_y: f32,
    pub opacity: f32,
}

impl OverlayLayer {
    /// Static body pinned where the layer sits
    pub fn body(&self, rect: &PanelRect) -> FragmentBody {
        FragmentBody::fixed(rect.center + Vec3::Z * self.offset_z)
            .with_rotation(Vec3::new(0.0, self.rotation_y, 0.0), Vec3::ZERO)
    }

    /// Material for this layer; the crack planes sample `crack_texture`
    pub fn material(&self, crack_texture: ResourceId, profile: &QualityProfile) -> Material {
        match self.kind {
            OverlayKind::CrackFront | OverlayKind::CrackBack => Material::Basic(BasicMaterial {
                opacity: self.opacity,
                alpha_mode: AlphaMode::Blend,
                side: Side::Front,
                map: Some(crack_texture),
                ..Default::default()
            }),
            OverlayKind::DarkCenter => Material::Basic(BasicMaterial {
                color: color_from_hex(0x333333),
                opacity: self.opacity,
                alpha_mode: AlphaMode::Blend,
                side: Side::Double,
                map: Some(crack_texture),
            }),
            OverlayKind::Interlayer if profile.physical_materials() => Material::Physical(PhysicalMaterial {
                color: color_from_hex(0xffffee),
                roughness: 0.6,
                transmission: 0.15,
                thickness: 2.0,
                opacity: self.opacity,
                alpha_mode: AlphaMode::Blend,
                side: Side::Double,
                ..Default::default()
            }),
            OverlayKind::Interlayer => Material::Basic(BasicMaterial {
                color: color_from_hex(0xffffee),
                opacity: self.opacity,
                alpha_mode: AlphaMode::Blend,
                side: Side::Double,
                map: None,
            }),
        }
    }
}

/// Decaying in-plane shake of the panel after impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeParams {
    /// Seconds
    pub duration: f32,
    /// Exponential decay time constant in seconds
    pub decay: f32,
    /// Peak offset per axis, already scaled by intensity
    pub amplitude: Vec2,
}

impl ShakeParams {
    pub const DURATION: f32 = 0.4;
    pub const DECAY: f32 = 0.1;
    pub const AMPLITUDE: Vec2 = Vec2::new(0.015, 0.008);

    pub fn for_intensity(intensity: f32) -> Self {
        Self {
            duration: Self::DURATION,
            decay: Self::DECAY,
            amplitude: Self::AMPLITUDE * intensity,
        }
    }
}

/// Static overlay produced by a laminated break
#[derive(Debug, Clone, PartialEq)]
pub struct CrackOverlay {
    pub pattern: CrackPattern,
    pub layers: [OverlayLayer; 4],
    pub shake: ShakeParams,
}

impl CrackOverlay {
    /// Fresh crack layout for `rect`
    pub fn generate(rect: &PanelRect, intensity: f32, rng: &mut impl Rng) -> Self {
        let size = Vec2::new(rect.width, rect.height);
        let face = rect.thickness / 2.0 + FACE_CLEARANCE;
        let layer = |kind, size, offset_z, rotation_y, opacity| OverlayLayer {
            kind,
            size,
            offset_z,
            rotation_y,
            opacity,
        };

        Self {
            pattern: CrackPattern::generate(rng),
            layers: [
                layer(OverlayKind::CrackFront, size, face, 0.0, 1.0),
                layer(OverlayKind::CrackBack, size, -face, PI, 0.9),
                layer(OverlayKind::DarkCenter, size, 0.0, 0.0, 0.7),
                layer(OverlayKind::Interlayer, size * FILM_SCALE, 0.0, 0.0, 0.35),
            ],
            shake: ShakeParams::for_intensity(intensity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glassbreak_core::QualityTier;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_overlay_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = PanelRect::standing(0.85, 1.75, 0.010, 0.1);
        let overlay = CrackOverlay::generate(&rect, 1.0, &mut rng);

        let [front, back, dark, film] = overlay.layers;
        assert!((front.offset_z - 0.006).abs() < 1e-6);
        assert!((back.offset_z + 0.006).abs() < 1e-6);
        assert_eq!(back.rotation_y, PI);
        assert_eq!(dark.offset_z, 0.0);
        assert!((film.size.x - 0.85 * 0.98).abs() < 1e-6);

        for layer in overlay.layers {
            let body = layer.body(&rect);
            assert!(body.is_static);
            assert_eq!(body.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn test_crack_layers_share_texture() {
        let mut rng = StdRng::seed_from_u64(1);
        let rect = PanelRect::standing(0.85, 1.75, 0.010, 0.1);
        let overlay = CrackOverlay::generate(&rect, 1.0, &mut rng);
        let profile = QualityProfile::for_tier(QualityTier::High, 1.0);
        let texture = ResourceId(77);

        let mapped = overlay
            .layers
            .iter()
            .filter(|l| l.material(texture, &profile).texture_refs() == vec![texture])
            .count();
        assert_eq!(mapped, 3);
        assert!(matches!(
            overlay.layers[3].material(texture, &profile),
            Material::Physical(_)
        ));
        let low = QualityProfile::for_tier(QualityTier::Low, 1.0);
        assert!(matches!(overlay.layers[3].material(texture, &low), Material::Basic(_)));
    }
}
