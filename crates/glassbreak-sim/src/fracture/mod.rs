//! Fracture Generator
//!
//! Turns an impact on the pane into fragment records. Everything here is
//! pure data: positions, launch velocities and shapes. Placing the result
//! in a scene is the render adapter's job.
//!
//! Launch model shared by every shedding type:
//! - fragments start uniformly spread over the pane volume
//! - they fly away from the impact, faster the closer they were
//!   (`speed = base × intensity / (distance + epsilon)`)
//! - a random upward and sideways kick keeps bursts from looking radial

mod decorative;
mod laminated;
mod mirror;
mod shape;
mod tempered;

pub use decorative::decorative_material;
pub use laminated::{CrackOverlay, OverlayKind, OverlayLayer, ShakeParams};
pub use mirror::{backing_material, mirror_material, BACKING_OFFSET, BACKING_SCALE};
pub use shape::{make_shape, FragmentShape};
pub use tempered::cube_material;

use glam::Vec3;
use glassbreak_core::{PanelRect, QualityProfile};
use glassbreak_physics::FragmentBody;
use rand::Rng;

use crate::glass::{FragmentShapeKind, GlassTypeSpec, LaunchParams};
use crate::intent::ImpactPoint;

/// Jitter band applied to fragment counts
pub const COUNT_JITTER: (f32, f32) = (0.8, 1.2);

/// One fragment as generated: kinematics plus the shape to draw
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSeed {
    pub body: FragmentBody,
    pub shape: FragmentShape,
}

/// What a break produces
#[derive(Debug, Clone, PartialEq)]
pub enum BreakOutcome {
    /// Pieces that fly and fall
    Fragments {
        kind: FragmentShapeKind,
        seeds: Vec<FragmentSeed>,
    },
    /// The pane stays and gains a static crack overlay
    CrackOverlay(CrackOverlay),
}

impl BreakOutcome {
    /// Moving fragments produced
    pub fn moving_count(&self) -> usize {
        match self {
            Self::Fragments { seeds, .. } => seeds.iter().filter(|s| !s.body.is_static).count(),
            Self::CrackOverlay(_) => 0,
        }
    }

    /// Whether the intact pane stays visible
    pub fn keeps_pane(&self) -> bool {
        matches!(self, Self::CrackOverlay(_))
    }
}

/// `round(base × multiplier × jitter)`, at least one
pub fn fragment_count(spec: &GlassTypeSpec, profile: &QualityProfile, rng: &mut impl Rng) -> usize {
    let jitter = rng.gen_range(COUNT_JITTER.0..=COUNT_JITTER.1);
    let count = (spec.fragment_count_base as f32 * profile.fragment_count_multiplier * jitter).round();
    (count as usize).max(1)
}

/// Launch speed for a fragment `distance` metres from the impact
pub fn launch_speed(launch: &LaunchParams, intensity: f32, distance: f32, rng: &mut impl Rng) -> f32 {
    let base = rng.gen_range(launch.speed.0..=launch.speed.1);
    base * intensity / (distance.max(0.0) + launch.epsilon)
}

/// Generate the outcome of hitting `rect` at `impact`
pub fn generate_break(
    spec: &GlassTypeSpec,
    profile: &QualityProfile,
    impact: &ImpactPoint,
    rect: &PanelRect,
    rng: &mut impl Rng,
) -> BreakOutcome {
    let launch = match spec.launch {
        Some(launch) if spec.sheds_fragments() => launch,
        _ => return BreakOutcome::CrackOverlay(CrackOverlay::generate(rect, impact.intensity, rng)),
    };

    let count = fragment_count(spec, profile, rng);
    let impact_world = rect.to_world(impact.point);
    let half = rect.half_extents();

    let mut seeds = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(shape) = make_shape(spec.fragment_shape_kind, spec, rect, profile, rng) else {
            continue;
        };

        let local = Vec3::new(
            rng.gen_range(-half.x..=half.x),
            rng.gen_range(-half.y..=half.y),
            rng.gen_range(-half.z..=half.z),
        );
        let position = rect.to_world(local);
        let away = position - impact_world;
        let distance = away.length();
        let speed = launch_speed(&launch, impact.intensity, distance, rng);
        let kick = Vec3::new(
            symmetric(rng, launch.lateral_jitter),
            rng.gen_range(0.0..=launch.vertical_jitter),
            symmetric(rng, launch.depth_jitter),
        );
        let velocity = away.normalize_or_zero() * speed + kick;

        let rotation = if spec.fragment_shape_kind == FragmentShapeKind::Cube {
            Vec3::new(
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
                rng.gen_range(0.0..std::f32::consts::TAU),
            )
        } else {
            Vec3::ZERO
        };
        let spin = Vec3::new(
            symmetric(rng, launch.angular_speed),
            symmetric(rng, launch.angular_speed),
            symmetric(rng, launch.angular_speed),
        );

        let body = FragmentBody::new(position, velocity)
            .with_rotation(rotation, spin)
            .with_contact(shape.ground_contact_y(), spec.bounce_coefficient, spec.friction_coefficient);
        seeds.push(FragmentSeed { body, shape });
    }

    log::debug!(
        "Generated {} {} fragments at intensity {:.1}",
        seeds.len(),
        spec.glass_type,
        impact.intensity
    );
    BreakOutcome::Fragments {
        kind: spec.fragment_shape_kind,
        seeds,
    }
}

/// Uniform in `[-half_range, half_range]`
fn symmetric(rng: &mut impl Rng, half_range: f32) -> f32 {
    if half_range <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half_range..=half_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneVariant;
    use crate::glass::GlassType;
    use glassbreak_core::QualityTier;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn impact(intensity: f32) -> ImpactPoint {
        ImpactPoint::new(Vec3::new(0.0, 0.3, 0.0), intensity)
    }

    #[test]
    fn test_count_scales_with_tier() {
        let mut rng = StdRng::seed_from_u64(10);
        for glass in [GlassType::Tempered, GlassType::Decorative, GlassType::Mirror] {
            let spec = glass.spec();
            let mut previous = 0;
            for tier in QualityTier::ALL {
                let profile = QualityProfile::for_tier(tier, 1.0);
                let count = fragment_count(spec, &profile, &mut rng);
                let nominal = spec.fragment_count_base as f32 * profile.fragment_count_multiplier;
                assert!(count as f32 >= (nominal * COUNT_JITTER.0).round().max(1.0));
                assert!(count as f32 <= (nominal * COUNT_JITTER.1).round().max(1.0));
                assert!(count > previous, "{glass} {tier}: {count} <= {previous}");
                previous = count;
            }
        }
    }

    #[test]
    fn test_count_never_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut profile = QualityProfile::for_tier(QualityTier::Low, 1.0);
        profile.fragment_count_multiplier = 0.0;
        assert_eq!(fragment_count(GlassType::Decorative.spec(), &profile, &mut rng), 1);
    }

    #[test]
    fn test_inverse_distance_speed() {
        let launch = GlassType::Tempered.spec().launch.unwrap();
        let fixed = LaunchParams {
            speed: (5.0, 5.0),
            ..launch
        };
        let mut rng = StdRng::seed_from_u64(0);
        let near = launch_speed(&fixed, 1.0, 0.0, &mut rng);
        let far = launch_speed(&fixed, 1.0, 1.0, &mut rng);
        assert!((near - 10.0).abs() < 1e-5);
        assert!((far - 5.0 / 1.5).abs() < 1e-5);
        assert!((launch_speed(&fixed, 2.0, 1.0, &mut rng) - 2.0 * far).abs() < 1e-5);
    }

    #[test]
    fn test_fragments_start_on_pane_and_fly_away() {
        let mut rng = StdRng::seed_from_u64(1);
        let spec = GlassType::Tempered.spec();
        let profile = QualityProfile::for_tier(QualityTier::Medium, 1.0);
        let rect = SceneVariant::Bathroom.panel_rect(spec.pane_thickness);
        let impact = impact(1.0);

        let BreakOutcome::Fragments { kind, seeds } = generate_break(spec, &profile, &impact, &rect, &mut rng) else {
            panic!("tempered glass must shed fragments");
        };
        assert_eq!(kind, FragmentShapeKind::Cube);
        assert!(!seeds.is_empty());

        let bounds = rect.bounds();
        let impact_world = rect.to_world(impact.point);
        let mut outward = 0;
        for seed in &seeds {
            assert!(bounds.contains_point(seed.body.position));
            assert!(!seed.body.is_static);
            let away = seed.body.position - impact_world;
            if seed.body.velocity.dot(away) > 0.0 {
                outward += 1;
            }
        }
        // Jitter can turn a few slow far pieces around, not most of them
        assert!(outward * 10 >= seeds.len() * 7);
    }

    #[test]
    fn test_per_type_contact() {
        let mut rng = StdRng::seed_from_u64(2);
        let profile = QualityProfile::for_tier(QualityTier::High, 1.0);
        let spec = GlassType::Mirror.spec();
        let rect = SceneVariant::Bathroom.panel_rect(spec.pane_thickness);
        let BreakOutcome::Fragments { seeds, .. } = generate_break(spec, &profile, &impact(1.0), &rect, &mut rng) else {
            panic!("mirror must shed fragments");
        };
        for seed in seeds {
            assert_eq!(seed.body.bounce_coefficient, 0.15);
            assert_eq!(seed.body.friction_coefficient, 0.7);
            let FragmentShape::Shard { height, .. } = seed.shape else {
                panic!("mirror produces shards");
            };
            assert!((seed.body.ground_contact_y - height * 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_laminated_is_overlay() {
        let mut rng = StdRng::seed_from_u64(3);
        let profile = QualityProfile::for_tier(QualityTier::High, 1.0);
        let spec = GlassType::Laminated.spec();
        let rect = SceneVariant::Bathroom.panel_rect(spec.pane_thickness);
        let outcome = generate_break(spec, &profile, &impact(2.0), &rect, &mut rng);
        assert!(outcome.keeps_pane());
        assert_eq!(outcome.moving_count(), 0);
        let BreakOutcome::CrackOverlay(overlay) = outcome else {
            unreachable!();
        };
        assert_eq!(overlay.layers.len(), 4);
        assert!((overlay.shake.amplitude.x - 0.03).abs() < 1e-6);
    }
}
