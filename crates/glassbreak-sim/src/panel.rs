//! Glass Panel Factory
//!
//! Builds the intact pane with its material and the aluminium frame around
//! it. The pane and the frame are separate children of one root so a break
//! can hide the glass while the frame stays up.

use glam::{Vec2, Vec3};
use glassbreak_core::{NodeId, PanelRect, QualityProfile, ResourceId, Transform};
use glassbreak_renderer::{Geometry, Material, RenderScene, Side};
use rand::Rng;

use crate::config::SceneVariant;
use crate::glass::{GlassType, GlassTypeSpec};
use crate::materials::{frame_material, glass_material};
use crate::pattern::bubble_texture;

/// Frame profile width
const FRAME_WIDTH: f32 = 0.025;
/// Frame profile depth
const FRAME_DEPTH: f32 = 0.035;

/// The intact pane and its frame, as placed in a scene
#[derive(Debug, Clone)]
pub struct GlassPanel {
    glass_type: GlassType,
    rect: PanelRect,
    root: NodeId,
    pane: NodeId,
    frame: NodeId,
    pane_material: Option<ResourceId>,
}

impl GlassPanel {
    pub fn glass_type(&self) -> GlassType {
        self.glass_type
    }

    /// World placement of the pane
    pub fn rect(&self) -> &PanelRect {
        &self.rect
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn pane(&self) -> NodeId {
        self.pane
    }

    pub fn frame(&self) -> NodeId {
        self.frame
    }

    /// Whether the glass itself is drawn
    pub fn pane_visible(&self, scene: &RenderScene) -> bool {
        scene.graph.is_effectively_visible(self.pane)
    }

    pub fn set_pane_visible(&self, scene: &mut RenderScene, visible: bool) {
        scene.graph.set_visible(self.pane, visible);
    }

    /// Displace the pane within its plane (impact shake)
    pub fn set_pane_offset(&self, scene: &mut RenderScene, offset: Vec2) {
        let position = self.rect.center + offset.extend(0.0);
        scene.graph.set_transform(self.pane, Transform::from_position(position));
    }

    /// Rebind the reflection map on the pane material
    pub fn bind_env_map(&self, scene: &mut RenderScene, env_map: Option<ResourceId>) {
        if let Some(material) = self.pane_material.and_then(|id| scene.resources.material_mut(id)) {
            material.set_env_map(env_map);
        }
    }

    /// Remove the panel and free everything it owns. Returns nodes removed.
    pub fn release(self, scene: &mut RenderScene) -> usize {
        let removed = scene.despawn(self.root);
        log::debug!("Released {} panel ({} nodes)", self.glass_type, removed);
        removed
    }
}

/// Build the panel for `spec`, releasing `previous` first.
pub fn build_panel(
    spec: &GlassTypeSpec,
    profile: &QualityProfile,
    variant: SceneVariant,
    scene: &mut RenderScene,
    previous: Option<GlassPanel>,
    rng: &mut impl Rng,
) -> GlassPanel {
    if let Some(previous) = previous {
        previous.release(scene);
    }

    let rect = variant.panel_rect(spec.pane_thickness);
    let root = scene.spawn_group(None, "GlassPanel", Transform::IDENTITY);

    let side = if spec.glass_type == GlassType::Mirror {
        Side::Front
    } else {
        Side::Double
    };
    let env_map = if profile.reflections_enabled() {
        scene.env_map
    } else {
        None
    };
    let mut material = glass_material(&spec.optical, spec.pane_thickness, side, profile, env_map);
    if spec.glass_type == GlassType::Decorative && profile.physical_materials() {
        let texture = scene.resources.add_texture(bubble_texture(rng));
        if let Material::Physical(physical) = &mut material {
            physical.map = Some(texture);
            physical.roughness_map = Some(texture);
        }
    }

    let pane = scene.spawn_mesh(
        Some(root),
        "GlassPane",
        Geometry::cube(Vec3::new(rect.width, rect.height, rect.thickness)),
        material,
        Transform::from_position(rect.center),
    );
    scene.set_shadows(pane, profile.shadows_enabled, profile.shadows_enabled);
    let pane_material = scene.graph.get(pane).and_then(|n| n.material);

    let frame = build_frame(scene, root, &rect, profile.shadows_enabled);

    log::info!(
        "Built {} panel {:.2}x{:.2}m at {} tier",
        spec.glass_type,
        rect.width,
        rect.height,
        profile.tier
    );

    GlassPanel {
        glass_type: spec.glass_type,
        rect,
        root,
        pane,
        frame,
        pane_material,
    }
}

fn build_frame(scene: &mut RenderScene, root: NodeId, rect: &PanelRect, cast_shadows: bool) -> NodeId {
    let frame = scene.spawn_group(Some(root), "Frame", Transform::IDENTITY);
    let bottom = rect.bounds().min.y;
    let top = rect.bounds().max.y;
    let rail = Vec3::new(rect.width + 0.08, FRAME_WIDTH, FRAME_DEPTH);
    let post = Vec3::new(FRAME_WIDTH, rect.height + 0.06, FRAME_DEPTH);
    let post_x = rect.width / 2.0 + FRAME_WIDTH;

    let pieces = [
        ("TopRail", rail, Vec3::new(rect.center.x, top + 0.02, rect.center.z)),
        ("BottomRail", rail, Vec3::new(rect.center.x, bottom - 0.015, rect.center.z)),
        ("LeftPost", post, Vec3::new(rect.center.x - post_x, rect.center.y, rect.center.z)),
        ("RightPost", post, Vec3::new(rect.center.x + post_x, rect.center.y, rect.center.z)),
    ];
    for (name, size, position) in pieces {
        let id = scene.spawn_mesh(
            Some(frame),
            name,
            Geometry::cube(size),
            frame_material(),
            Transform::from_position(position),
        );
        scene.set_shadows(id, cast_shadows, false);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use glassbreak_core::{NodeFlags, QualityTier};
    use glassbreak_renderer::ResourceCounts;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_panel_layout() {
        let mut scene = RenderScene::new();
        let mut rng = StdRng::seed_from_u64(0);
        let profile = QualityProfile::for_tier(QualityTier::Low, 1.0);
        let panel = build_panel(
            GlassType::Tempered.spec(),
            &profile,
            SceneVariant::Bathroom,
            &mut scene,
            None,
            &mut rng,
        );
        scene.graph.update_transforms();

        assert_eq!(panel.rect().thickness, 0.008);
        assert!(panel.pane_visible(&scene));
        assert_eq!(scene.graph.get_descendants(panel.frame()).len(), 4);

        let top = scene.graph.find_by_name("TopRail").unwrap();
        let y = scene.graph.get(top).unwrap().world_matrix().w_axis.y;
        assert!((y - (1.75 + 0.12)).abs() < 1e-5);
        let bottom = scene.graph.find_by_name("BottomRail").unwrap();
        let y = scene.graph.get(bottom).unwrap().world_matrix().w_axis.y;
        assert!((y - 0.085).abs() < 1e-5);
        let left = scene.graph.find_by_name("LeftPost").unwrap();
        let x = scene.graph.get(left).unwrap().world_matrix().w_axis.x;
        assert!((x + 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_frame_shadows_follow_tier() {
        for (tier, cast) in [(QualityTier::Low, false), (QualityTier::High, true)] {
            let mut scene = RenderScene::new();
            let mut rng = StdRng::seed_from_u64(0);
            let profile = QualityProfile::for_tier(tier, 1.0);
            let panel = build_panel(
                GlassType::Tempered.spec(),
                &profile,
                SceneVariant::Bathroom,
                &mut scene,
                None,
                &mut rng,
            );
            for piece in scene.graph.get_descendants(panel.frame()) {
                let flags = scene.graph.get(piece).unwrap().flags;
                assert_eq!(flags.contains(NodeFlags::CAST_SHADOW), cast, "{tier}");
                assert!(!flags.contains(NodeFlags::RECEIVE_SHADOW));
            }
        }
    }

    #[test]
    fn test_hiding_pane_keeps_frame() {
        let mut scene = RenderScene::new();
        let mut rng = StdRng::seed_from_u64(0);
        let profile = QualityProfile::for_tier(QualityTier::Medium, 1.0);
        let panel = build_panel(
            GlassType::Mirror.spec(),
            &profile,
            SceneVariant::Bathroom,
            &mut scene,
            None,
            &mut rng,
        );
        assert_eq!(scene.draw_calls(), 5);
        panel.set_pane_visible(&mut scene, false);
        assert_eq!(scene.draw_calls(), 4);
        assert!(!panel.pane_visible(&scene));
    }

    #[test]
    fn test_rebuild_releases_previous() {
        let mut scene = RenderScene::new();
        let mut rng = StdRng::seed_from_u64(0);
        let profile = QualityProfile::for_tier(QualityTier::High, 2.0);

        let mut panel = None;
        let mut baseline = None;
        for _ in 0..3 {
            for glass in GlassType::ALL {
                panel = Some(build_panel(
                    glass.spec(),
                    &profile,
                    SceneVariant::Bathroom,
                    &mut scene,
                    panel.take(),
                    &mut rng,
                ));
                if glass == GlassType::Tempered {
                    let counts = scene.resource_counts();
                    assert_eq!(*baseline.get_or_insert(counts), counts);
                }
            }
        }
        if let Some(panel) = panel {
            panel.release(&mut scene);
        }
        assert_eq!(scene.resource_counts(), ResourceCounts::default());
        assert!(scene.graph.is_empty());
    }

    #[test]
    fn test_decorative_high_tier_has_bubble_texture() {
        let mut scene = RenderScene::new();
        let mut rng = StdRng::seed_from_u64(0);
        let high = QualityProfile::for_tier(QualityTier::High, 1.0);
        let panel = build_panel(
            GlassType::Decorative.spec(),
            &high,
            SceneVariant::Bathroom,
            &mut scene,
            None,
            &mut rng,
        );
        assert_eq!(scene.resource_counts().textures, 1);
        panel.release(&mut scene);
        assert_eq!(scene.resource_counts().textures, 0);

        let low = QualityProfile::for_tier(QualityTier::Low, 1.0);
        build_panel(
            GlassType::Decorative.spec(),
            &low,
            SceneVariant::Bathroom,
            &mut scene,
            None,
            &mut rng,
        );
        assert_eq!(scene.resource_counts().textures, 0);
    }

    #[test]
    fn test_env_map_bound_at_high_tier() {
        let mut scene = RenderScene::new();
        scene.env_map = Some(ResourceId(1234));
        let mut rng = StdRng::seed_from_u64(0);
        let profile = QualityProfile::for_tier(QualityTier::High, 1.0);
        let panel = build_panel(
            GlassType::Tempered.spec(),
            &profile,
            SceneVariant::Bathroom,
            &mut scene,
            None,
            &mut rng,
        );
        let material = scene.graph.get(panel.pane()).and_then(|n| n.material).unwrap();
        match scene.resources.material(material).unwrap() {
            Material::Physical(m) => assert_eq!(m.env_map, Some(ResourceId(1234))),
            other => panic!("expected physical material, got {other:?}"),
        }
    }
}
