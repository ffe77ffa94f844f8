//! Tempered glass: a cloud of small cubes drawn as one instanced batch.

use glassbreak_core::{PanelRect, QualityProfile, QualityTier, ResourceId};
use glassbreak_renderer::{Material, Side};

use super::FragmentShape;
use crate::glass::{GlassTypeSpec, OpticalParams};
use crate::materials::glass_material;

/// Pane width the catalogue cube sizes are quoted for
const REFERENCE_PANE_WIDTH: f32 = 0.85;

const CUBE_OPTICAL: OpticalParams = OpticalParams {
    color: 0xffffff,
    roughness: 0.05,
    metalness: 0.0,
    ior: 1.52,
    transmission: 0.9,
    thickness_scale: 20.0,
    clearcoat: 0.0,
    clearcoat_roughness: 0.0,
    opacity: 0.9,
    env_intensity: 0.7,
};

/// Cube sized relative to the pane. The low tier uses fewer, larger cubes.
pub(super) fn cube(spec: &GlassTypeSpec, rect: &PanelRect, profile: &QualityProfile) -> FragmentShape {
    let (small, large) = spec.fragment_size_range;
    let quoted = if profile.tier == QualityTier::Low { large } else { small };
    FragmentShape::Cube {
        edge: quoted / REFERENCE_PANE_WIDTH * rect.width,
    }
}

/// Material shared by the whole cube batch
pub fn cube_material(edge: f32, profile: &QualityProfile, env_map: Option<ResourceId>) -> Material {
    glass_material(&CUBE_OPTICAL, edge, Side::Double, profile, env_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::GlassType;

    #[test]
    fn test_cube_edge_per_tier() {
        let spec = GlassType::Tempered.spec();
        let rect = PanelRect::standing(0.85, 1.75, 0.008, 0.1);

        let edge = |rect: &PanelRect, tier| match cube(spec, rect, &QualityProfile::for_tier(tier, 1.0)) {
            FragmentShape::Cube { edge } => edge,
            other => panic!("expected cube, got {other:?}"),
        };
        assert!((edge(&rect, QualityTier::High) - 0.012).abs() < 1e-6);
        assert!((edge(&rect, QualityTier::Medium) - 0.012).abs() < 1e-6);
        assert!((edge(&rect, QualityTier::Low) - 0.018).abs() < 1e-6);

        let wide = PanelRect::standing(1.7, 1.75, 0.008, 0.1);
        assert!((edge(&wide, QualityTier::High) - 0.024).abs() < 1e-6);
    }

    #[test]
    fn test_cube_material_thickness() {
        let profile = QualityProfile::for_tier(QualityTier::High, 1.0);
        match cube_material(0.012, &profile, None) {
            Material::Physical(m) => {
                assert!((m.thickness - 0.24).abs() < 1e-6);
                assert_eq!(m.opacity, 0.9);
                assert_eq!(m.side, Side::Double);
            }
            other => panic!("expected physical material, got {other:?}"),
        }
    }
}
