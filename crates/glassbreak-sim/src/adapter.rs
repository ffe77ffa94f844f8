//! Render Adapter
//!
//! Places a break outcome in the render scene and copies integrated body
//! state back into it each frame. Physics never touches the scene.

use glam::{Quat, Vec2, Vec3};
use glassbreak_core::math::euler_to_quat;
use glassbreak_core::{NodeFlags, NodeId, PanelRect, QualityProfile, ResourceId, Transform};
use glassbreak_physics::FragmentBody;
use glassbreak_renderer::{BatchId, Geometry, RenderScene};

use crate::fracture::{
    backing_material, cube_material, decorative_material, mirror_material, BreakOutcome, CrackOverlay, FragmentShape,
    ShakeParams, BACKING_OFFSET, BACKING_SCALE,
};

/// Where a fragment is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHandle {
    /// Slot of a shared instanced batch
    Instanced { batch: BatchId, slot: usize },
    /// Node owned by this fragment
    Node(NodeId),
}

/// A fragment: physics state plus where it is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub body: FragmentBody,
    pub handle: RenderHandle,
}

/// Everything one break added to the scene
#[derive(Debug, Default)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
    batches: Vec<BatchId>,
    roots: Vec<NodeId>,
    overlay: Option<NodeId>,
    shake: Option<ShakeParams>,
    /// Pose last written to the scene, per fragment
    synced: Vec<Option<(Vec3, Vec3)>>,
}

impl FragmentSet {
    /// Empty set, as before any break
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Bodies the stepper integrates
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut FragmentBody> {
        self.fragments.iter_mut().map(|f| &mut f.body)
    }

    /// Fragments that can still move
    pub fn moving_count(&self) -> usize {
        self.fragments.iter().filter(|f| !f.body.is_static).count()
    }

    /// Shake the break asked for, if any
    pub fn shake(&self) -> Option<ShakeParams> {
        self.shake
    }

    /// Scene nodes owned by the set
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Instanced batches owned by the set
    pub fn batches(&self) -> &[BatchId] {
        &self.batches
    }

    /// Place a break outcome in the scene
    pub fn spawn(
        outcome: BreakOutcome,
        rect: &PanelRect,
        profile: &QualityProfile,
        scene: &mut RenderScene,
    ) -> Self {
        let env_map = if profile.reflections_enabled() {
            scene.env_map
        } else {
            None
        };

        let mut set = Self::new();
        match outcome {
            BreakOutcome::CrackOverlay(overlay) => set.spawn_overlay(overlay, rect, profile, scene),
            BreakOutcome::Fragments { seeds, .. } => {
                let cube_edge = seeds.iter().find_map(|s| match s.shape {
                    FragmentShape::Cube { edge } => Some(edge),
                    _ => None,
                });
                let batch = cube_edge.map(|edge| {
                    let count = seeds.len();
                    let id = scene.add_batch(
                        "TemperedFragments",
                        Geometry::cube(Vec3::splat(edge)),
                        cube_material(edge, profile, env_map),
                        count,
                    );
                    if let Some(batch) = scene.batch_mut(id) {
                        batch.flags.set(NodeFlags::CAST_SHADOW, profile.shadows_enabled);
                        batch.flags.set(NodeFlags::RECEIVE_SHADOW, profile.shadows_enabled);
                    }
                    set.batches.push(id);
                    id
                });

                for (slot, seed) in seeds.into_iter().enumerate() {
                    let handle = match (&seed.shape, batch) {
                        (FragmentShape::Cube { .. }, Some(batch)) => RenderHandle::Instanced { batch, slot },
                        (shape, _) => RenderHandle::Node(spawn_piece(shape, &seed.body, profile, env_map, scene)),
                    };
                    if let RenderHandle::Node(id) = handle {
                        set.roots.push(id);
                    }
                    set.fragments.push(Fragment {
                        body: seed.body,
                        handle,
                    });
                }
            }
        }

        set.write_back(scene);
        log::debug!(
            "Spawned {} fragments ({} batches, {} nodes)",
            set.len(),
            set.batches.len(),
            set.roots.len()
        );
        set
    }

    fn spawn_overlay(
        &mut self,
        overlay: CrackOverlay,
        rect: &PanelRect,
        profile: &QualityProfile,
        scene: &mut RenderScene,
    ) {
        let texture = scene
            .resources
            .add_texture(overlay.pattern.rasterize(profile.crack_texture_resolution));
        let group = scene.spawn_group(None, "CrackOverlay", Transform::IDENTITY);

        for layer in overlay.layers {
            let body = layer.body(rect);
            let id = scene.spawn_mesh(
                Some(group),
                "CrackLayer",
                Geometry::plane(layer.size.x, layer.size.y),
                layer.material(texture, profile),
                body_transform(&body),
            );
            self.fragments.push(Fragment {
                body,
                handle: RenderHandle::Node(id),
            });
        }

        self.roots.push(group);
        self.overlay = Some(group);
        self.shake = Some(overlay.shake);
    }

    /// Copy moved bodies into their instance slots and nodes. Bodies whose
    /// pose is unchanged since the last write are skipped. Returns the
    /// number of fragments written.
    pub fn write_back(&mut self, scene: &mut RenderScene) -> usize {
        self.synced.resize(self.fragments.len(), None);
        let mut written = 0;
        for (fragment, synced) in self.fragments.iter().zip(self.synced.iter_mut()) {
            if fragment.body.is_static {
                continue;
            }
            let pose = (fragment.body.position, fragment.body.rotation);
            if *synced == Some(pose) {
                continue;
            }
            match fragment.handle {
                RenderHandle::Instanced { batch, slot } => {
                    if let Some(batch) = scene.batch_mut(batch) {
                        batch.set_instance(slot, fragment.body.matrix());
                    }
                }
                RenderHandle::Node(id) => scene.graph.set_transform(id, body_transform(&fragment.body)),
            }
            *synced = Some(pose);
            written += 1;
        }
        written
    }

    /// Displace the crack overlay within the pane plane
    pub fn set_overlay_offset(&self, scene: &mut RenderScene, offset: Vec2) {
        if let Some(group) = self.overlay {
            scene.graph.set_transform(group, Transform::from_position(offset.extend(0.0)));
        }
    }

    /// Remove everything from the scene, freeing resources. Returns the
    /// number of fragments dropped.
    pub fn release(self, scene: &mut RenderScene) -> usize {
        for batch in &self.batches {
            scene.remove_batch(*batch);
        }
        for root in &self.roots {
            scene.despawn(*root);
        }
        self.fragments.len()
    }

    /// Crack texture owned by the overlay, if any
    pub fn crack_texture(&self, scene: &RenderScene) -> Option<ResourceId> {
        let group = self.overlay?;
        let first = scene.graph.get_descendants(group).into_iter().next()?;
        let material = scene.graph.get(first)?.material?;
        scene.resources.material(material)?.texture_refs().into_iter().next()
    }
}

fn body_transform(body: &FragmentBody) -> Transform {
    Transform::new(body.position, euler_to_quat(body.rotation), Vec3::ONE)
}

fn spawn_piece(
    shape: &FragmentShape,
    body: &FragmentBody,
    profile: &QualityProfile,
    env_map: Option<ResourceId>,
    scene: &mut RenderScene,
) -> NodeId {
    let cast = profile.shadows_enabled;
    match shape {
        FragmentShape::Shard { depth, .. } => {
            let group = scene.spawn_group(None, "MirrorShard", body_transform(body));
            let face = scene.spawn_mesh(
                Some(group),
                "ShardFace",
                shape.geometry(),
                mirror_material(*depth, profile, env_map),
                Transform::IDENTITY,
            );
            scene.set_shadows(face, cast, false);
            let backing = scene.spawn_mesh(
                Some(group),
                "ShardBacking",
                shape.geometry(),
                backing_material(),
                Transform::new(Vec3::Z * (depth * BACKING_OFFSET), Quat::IDENTITY, BACKING_SCALE),
            );
            scene.set_shadows(backing, cast, false);
            group
        }
        FragmentShape::Polygon { depth, .. } => {
            let id = scene.spawn_mesh(
                None,
                "DecorativeFragment",
                shape.geometry(),
                decorative_material(*depth, profile, env_map),
                body_transform(body),
            );
            scene.set_shadows(id, cast, false);
            id
        }
        // Cubes only reach here without a batch, which spawn never does
        FragmentShape::Cube { edge } => scene.spawn_mesh(
            None,
            "TemperedFragment",
            shape.geometry(),
            cube_material(*edge, profile, env_map),
            body_transform(body),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneVariant;
    use crate::fracture::generate_break;
    use crate::glass::GlassType;
    use crate::intent::ImpactPoint;
    use glassbreak_core::QualityTier;
    use glassbreak_renderer::ResourceCounts;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spawn(glass: GlassType, tier: QualityTier, scene: &mut RenderScene, seed: u64) -> FragmentSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let spec = glass.spec();
        let profile = QualityProfile::for_tier(tier, 1.0);
        let rect = SceneVariant::Bathroom.panel_rect(spec.pane_thickness);
        let impact = ImpactPoint::new(Vec3::ZERO, 1.0);
        let outcome = generate_break(spec, &profile, &impact, &rect, &mut rng);
        FragmentSet::spawn(outcome, &rect, &profile, scene)
    }

    #[test]
    fn test_tempered_is_one_draw_call() {
        let mut scene = RenderScene::new();
        let set = spawn(GlassType::Tempered, QualityTier::High, &mut scene, 0);
        assert!(set.len() >= 800);
        assert_eq!(scene.batch_count(), 1);
        assert_eq!(scene.draw_calls(), 1);
        assert!(set.roots().is_empty());

        let batch = scene.batch(set.batches()[0]).unwrap();
        assert_eq!(batch.len(), set.len());
        let first = &set.fragments()[0];
        assert_eq!(batch.instance(0), Some(first.body.matrix()));
    }

    #[test]
    fn test_write_back_moves_instances() {
        let mut scene = RenderScene::new();
        let mut set = spawn(GlassType::Tempered, QualityTier::Low, &mut scene, 1);
        for body in set.bodies_mut() {
            body.position.y -= 0.5;
        }
        assert_eq!(set.write_back(&mut scene), set.len());
        let batch = scene.batch(set.batches()[0]).unwrap();
        for (slot, fragment) in set.fragments().iter().enumerate() {
            assert_eq!(batch.instance(slot), Some(fragment.body.matrix()));
        }
    }

    #[test]
    fn test_write_back_skips_unmoved_bodies() {
        let mut scene = RenderScene::new();
        let mut set = spawn(GlassType::Tempered, QualityTier::Low, &mut scene, 4);
        let id = set.batches()[0];
        scene.batch_mut(id).unwrap().clear_dirty();

        assert_eq!(set.write_back(&mut scene), 0);
        assert!(!scene.batch(id).unwrap().is_dirty());

        if let Some(body) = set.bodies_mut().next() {
            body.position.x += 0.1;
        }
        assert_eq!(set.write_back(&mut scene), 1);
        assert!(scene.batch(id).unwrap().is_dirty());
    }

    #[test]
    fn test_mirror_shards_have_backing() {
        let mut scene = RenderScene::new();
        let set = spawn(GlassType::Mirror, QualityTier::Medium, &mut scene, 2);
        assert_eq!(set.roots().len(), set.len());
        for root in set.roots() {
            let children = scene.graph.get_descendants(*root);
            assert_eq!(children.len(), 2);
        }
        assert_eq!(scene.draw_calls() as usize, set.len() * 2);
        let backing = scene.graph.find_by_name("ShardBacking").unwrap();
        let transform = scene.graph.get(backing).unwrap().local_transform;
        assert_eq!(transform.scale, BACKING_SCALE);
    }

    #[test]
    fn test_laminated_overlay_is_static() {
        let mut scene = RenderScene::new();
        let set = spawn(GlassType::Laminated, QualityTier::High, &mut scene, 3);
        assert_eq!(set.len(), 4);
        assert_eq!(set.moving_count(), 0);
        assert!(set.shake().is_some());
        assert_eq!(scene.resource_counts().textures, 1);
        assert!(set.crack_texture(&scene).is_some());

        set.set_overlay_offset(&mut scene, Vec2::new(0.01, 0.0));
        let overlay = scene.graph.find_by_name("CrackOverlay").unwrap();
        assert_eq!(scene.graph.get(overlay).unwrap().local_transform.position.x, 0.01);
    }

    #[test]
    fn test_release_frees_everything() {
        let mut scene = RenderScene::new();
        for (seed, glass) in GlassType::ALL.into_iter().enumerate() {
            let set = spawn(glass, QualityTier::High, &mut scene, seed as u64);
            let count = set.len();
            assert_eq!(set.release(&mut scene), count);
            assert_eq!(scene.resource_counts(), ResourceCounts::default(), "{glass}");
            assert!(scene.graph.is_empty());
            assert_eq!(scene.batch_count(), 0);
        }
    }
}
