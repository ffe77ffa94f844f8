use glam::Vec3;
use glassbreak_core::{PanelRect, QualityProfile};
use glassbreak_physics::DEFAULT_GROUND_HEIGHT;
use glassbreak_renderer::Geometry;
use glassbreak_renderer::mesh::Outline;
use rand::Rng;

use super::{decorative, mirror, tempered};
use crate::glass::{FragmentShapeKind, GlassTypeSpec};

/// Drawable shape of one fragment
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentShape {
    /// Tempered glass cube, shared by every instance of a batch
    Cube { edge: f32 },
    /// Extruded irregular polygon
    Polygon { outline: Outline, depth: f32 },
    /// Bevelled sliver with a dark backing
    Shard {
        outline: Outline,
        depth: f32,
        bevel: f32,
        /// Template height, also used for floor contact
        height: f32,
    },
}

impl FragmentShape {
    /// Height above the floor at which the fragment touches down
    pub fn ground_contact_y(&self) -> f32 {
        match self {
            Self::Cube { .. } | Self::Polygon { .. } => DEFAULT_GROUND_HEIGHT,
            Self::Shard { height, .. } => height * 0.5,
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            Self::Cube { edge } => Geometry::cube(Vec3::splat(*edge)),
            Self::Polygon { outline, depth } => Geometry::extruded(outline.clone(), *depth),
            Self::Shard {
                outline, depth, bevel, ..
            } => Geometry::Extruded {
                outline: outline.clone(),
                depth: *depth,
                bevel: *bevel,
            },
        }
    }
}

/// Single factory for every shape kind. Crack planes have no per-fragment
/// shape and yield `None`.
pub fn make_shape(
    kind: FragmentShapeKind,
    spec: &GlassTypeSpec,
    rect: &PanelRect,
    profile: &QualityProfile,
    rng: &mut impl Rng,
) -> Option<FragmentShape> {
    match kind {
        FragmentShapeKind::Cube => Some(tempered::cube(spec, rect, profile)),
        FragmentShapeKind::IrregularPolygon => Some(decorative::polygon(spec, rng)),
        FragmentShapeKind::Shard => Some(mirror::shard(spec, rng)),
        FragmentShapeKind::CrackPlane => None,
    }
}
