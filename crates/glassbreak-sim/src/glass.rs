//! Glass Type Catalogue
//!
//! Static description of every glass type the showroom offers: optics,
//! fragment behaviour, launch parameters and the safety copy shown next to
//! the viewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported glass types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlassType {
    /// Breaks into thousands of small blunt cubes
    #[default]
    Tempered,
    /// Cracks but stays in one piece on its interlayer
    Laminated,
    /// Patterned glass; large irregular pieces
    Decorative,
    /// Thin sharp shards with a dark backing
    Mirror,
}

/// Strict parse failure, for front ends that want to reject bad input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown glass type '{0}'")]
pub struct UnknownGlassType(pub String);

impl GlassType {
    /// Every type, in showroom order
    pub const ALL: [GlassType; 4] = [Self::Tempered, Self::Laminated, Self::Decorative, Self::Mirror];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tempered => "tempered",
            Self::Laminated => "laminated",
            Self::Decorative => "decorative",
            Self::Mirror => "mirror",
        }
    }

    /// Catalogue entry for this type
    pub fn spec(&self) -> &'static GlassTypeSpec {
        match self {
            Self::Tempered => &TEMPERED,
            Self::Laminated => &LAMINATED,
            Self::Decorative => &DECORATIVE,
            Self::Mirror => &MIRROR,
        }
    }

    /// Parse a type name, falling back to tempered for anything unknown
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown glass type '{}', using tempered", name);
            Self::Tempered
        })
    }
}

impl fmt::Display for GlassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlassType {
    type Err = UnknownGlassType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The showroom UI still sends the Portuguese option values
        match s.trim().to_ascii_lowercase().as_str() {
            "tempered" | "temperado" => Ok(Self::Tempered),
            "laminated" | "laminado" => Ok(Self::Laminated),
            "decorative" | "fantasy" | "fantasia" => Ok(Self::Decorative),
            "mirror" | "espelho" => Ok(Self::Mirror),
            _ => Err(UnknownGlassType(s.to_string())),
        }
    }
}

/// How a break of this type is represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentShapeKind {
    /// Small instanced cubes
    Cube,
    /// Static crack overlay planes, nothing flies
    CrackPlane,
    /// Extruded convex polygons
    IrregularPolygon,
    /// Bevelled slivers from a few silhouette templates
    Shard,
}

/// Surface and volume parameters of the intact pane at the top tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpticalParams {
    /// sRGB hex color
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
    pub ior: f32,
    pub transmission: f32,
    /// Transmission thickness as a multiple of the pane thickness
    pub thickness_scale: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub opacity: f32,
    pub env_intensity: f32,
}

/// Launch parameters of moving fragments
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchParams {
    /// Base speed range before intensity and distance falloff
    pub speed: (f32, f32),
    /// Added to the impact distance in the falloff
    pub epsilon: f32,
    /// Half range of the random X velocity
    pub lateral_jitter: f32,
    /// Upper bound of the random upward velocity
    pub vertical_jitter: f32,
    /// Half range of the random Z velocity
    pub depth_jitter: f32,
    /// Half range of each angular velocity component
    pub angular_speed: f32,
}

/// Safety copy shown beside the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyDescriptor {
    /// Styling class for the host page
    pub class: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
    pub bullets: [&'static str; 2],
}

/// Break audio variation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakSoundProfile {
    pub playback_rate: f32,
}

/// Static description of one glass type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlassTypeSpec {
    pub glass_type: GlassType,
    pub display_name: &'static str,
    pub description: &'static str,
    pub optical: OpticalParams,
    /// Pane thickness in metres
    pub pane_thickness: f32,
    /// Fragment count at the top tier before jitter
    pub fragment_count_base: u32,
    pub fragment_shape_kind: FragmentShapeKind,
    /// Smallest and largest fragment extent in metres
    pub fragment_size_range: (f32, f32),
    /// Typical scatter radius on the floor in metres
    pub spread_radius: f32,
    /// 0 (dangerous) to 100 (safest)
    pub safety_score: u8,
    pub break_sound: BreakSoundProfile,
    /// None for types that don't shed fragments
    pub launch: Option<LaunchParams>,
    pub bounce_coefficient: f32,
    pub friction_coefficient: f32,
    pub risk: SafetyDescriptor,
}

impl GlassTypeSpec {
    /// Whether a break sends pieces flying
    pub fn sheds_fragments(&self) -> bool {
        self.fragment_shape_kind != FragmentShapeKind::CrackPlane
    }
}

static TEMPERED: GlassTypeSpec = GlassTypeSpec {
    glass_type: GlassType::Tempered,
    display_name: "Tempered",
    description: "Heat-treated safety glass for shower enclosures and doors",
    optical: OpticalParams {
        color: 0xffffff,
        roughness: 0.01,
        metalness: 0.0,
        ior: 1.52,
        transmission: 0.99,
        thickness_scale: 30.0,
        clearcoat: 0.05,
        clearcoat_roughness: 0.02,
        opacity: 0.99,
        env_intensity: 0.9,
    },
    pane_thickness: 0.008,
    fragment_count_base: 1000,
    fragment_shape_kind: FragmentShapeKind::Cube,
    fragment_size_range: (0.012, 0.018),
    spread_radius: 1.5,
    safety_score: 80,
    break_sound: BreakSoundProfile { playback_rate: 1.1 },
    launch: Some(LaunchParams {
        speed: (3.0, 7.0),
        epsilon: 0.5,
        lateral_jitter: 1.0,
        vertical_jitter: 3.0,
        depth_jitter: 1.5,
        angular_speed: 7.5,
    }),
    bounce_coefficient: 0.3,
    friction_coefficient: 0.85,
    risk: SafetyDescriptor {
        class: "risk-safe",
        icon: "✅",
        label: "SAFE",
        bullets: [
            "Shatters into small cubes without cutting edges",
            "Recommended for shower enclosures and doors",
        ],
    },
};

static LAMINATED: GlassTypeSpec = GlassTypeSpec {
    glass_type: GlassType::Laminated,
    display_name: "Laminated",
    description: "Two plies bonded by a PVB interlayer that holds the pieces together",
    optical: OpticalParams {
        color: 0xffffff,
        roughness: 0.01,
        metalness: 0.0,
        ior: 1.52,
        transmission: 0.98,
        thickness_scale: 40.0,
        clearcoat: 0.0,
        clearcoat_roughness: 0.0,
        opacity: 0.98,
        env_intensity: 0.8,
    },
    pane_thickness: 0.010,
    fragment_count_base: 4,
    fragment_shape_kind: FragmentShapeKind::CrackPlane,
    fragment_size_range: (0.0, 0.0),
    spread_radius: 0.0,
    safety_score: 95,
    break_sound: BreakSoundProfile { playback_rate: 0.8 },
    launch: None,
    bounce_coefficient: 0.0,
    friction_coefficient: 1.0,
    risk: SafetyDescriptor {
        class: "risk-safer",
        icon: "🛡️",
        label: "+SAFE",
        bullets: [
            "The PVB film keeps the fragments in place",
            "No shards scatter, ideal for maximum safety",
        ],
    },
};

static DECORATIVE: GlassTypeSpec = GlassTypeSpec {
    glass_type: GlassType::Decorative,
    display_name: "Decorative",
    description: "Textured annealed glass with a hammered bubble pattern",
    optical: OpticalParams {
        color: 0xf0f0f0,
        roughness: 0.5,
        metalness: 0.0,
        ior: 1.45,
        transmission: 0.55,
        thickness_scale: 100.0,
        clearcoat: 0.0,
        clearcoat_roughness: 0.0,
        opacity: 0.85,
        env_intensity: 0.5,
    },
    pane_thickness: 0.006,
    fragment_count_base: 50,
    fragment_shape_kind: FragmentShapeKind::IrregularPolygon,
    fragment_size_range: (0.05, 0.23),
    spread_radius: 0.8,
    safety_score: 40,
    break_sound: BreakSoundProfile { playback_rate: 0.9 },
    launch: Some(LaunchParams {
        speed: (1.5, 3.5),
        epsilon: 0.8,
        lateral_jitter: 0.4,
        vertical_jitter: 1.5,
        depth_jitter: 0.75,
        angular_speed: 2.5,
    }),
    bounce_coefficient: 0.1,
    friction_coefficient: 0.85,
    risk: SafetyDescriptor {
        class: "risk-caution",
        icon: "⚠️",
        label: "CAUTION",
        bullets: [
            "Breaks into large, heavy pieces",
            "Edges can cut, handle with care",
        ],
    },
};

static MIRROR: GlassTypeSpec = GlassTypeSpec {
    glass_type: GlassType::Mirror,
    display_name: "Mirror",
    description: "Silvered float glass with an opaque backing",
    optical: OpticalParams {
        color: 0xd8d8d8,
        roughness: 0.04,
        metalness: 0.95,
        ior: 1.5,
        transmission: 0.0,
        thickness_scale: 0.0,
        clearcoat: 0.25,
        clearcoat_roughness: 0.08,
        opacity: 1.0,
        env_intensity: 1.0,
    },
    pane_thickness: 0.004,
    fragment_count_base: 50,
    fragment_shape_kind: FragmentShapeKind::Shard,
    fragment_size_range: (0.03, 0.35),
    spread_radius: 2.0,
    safety_score: 15,
    break_sound: BreakSoundProfile { playback_rate: 1.05 },
    launch: Some(LaunchParams {
        speed: (3.0, 8.0),
        epsilon: 0.3,
        lateral_jitter: 1.25,
        vertical_jitter: 4.0,
        depth_jitter: 2.0,
        angular_speed: 6.0,
    }),
    bounce_coefficient: 0.15,
    friction_coefficient: 0.7,
    risk: SafetyDescriptor {
        class: "risk-danger",
        icon: "🔴",
        label: "DANGER",
        bullets: [
            "Produces thin, extremely sharp blades",
            "High risk of deep cuts, avoid direct contact",
        ],
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("temperado".parse::<GlassType>(), Ok(GlassType::Tempered));
        assert_eq!("Laminado".parse::<GlassType>(), Ok(GlassType::Laminated));
        assert_eq!(" fantasia ".parse::<GlassType>(), Ok(GlassType::Decorative));
        assert_eq!("ESPELHO".parse::<GlassType>(), Ok(GlassType::Mirror));
        assert!("obsidian".parse::<GlassType>().is_err());
    }

    #[test]
    fn test_parse_lossy_clamps_to_tempered() {
        assert_eq!(GlassType::parse_lossy("obsidian"), GlassType::Tempered);
        assert_eq!(GlassType::parse_lossy("mirror"), GlassType::Mirror);
    }

    #[test]
    fn test_catalogue_consistency() {
        for glass in GlassType::ALL {
            let spec = glass.spec();
            assert_eq!(spec.glass_type, glass);
            assert!(spec.safety_score <= 100);
            assert!((0.004..=0.010).contains(&spec.pane_thickness));
            assert_eq!(spec.launch.is_some(), spec.sheds_fragments());
            if let Some(launch) = spec.launch {
                assert!(launch.speed.0 < launch.speed.1);
                assert!(launch.epsilon > 0.0);
            }
        }
        assert!(GlassType::Laminated.spec().safety_score > GlassType::Tempered.spec().safety_score);
        assert!(GlassType::Mirror.spec().safety_score < GlassType::Decorative.spec().safety_score);
    }

    #[test]
    fn test_sound_profiles() {
        let rates: Vec<f32> = GlassType::ALL.iter().map(|g| g.spec().break_sound.playback_rate).collect();
        assert_eq!(rates, vec![1.1, 0.8, 0.9, 1.05]);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&GlassType::Decorative).unwrap(), "\"decorative\"");
        let parsed: GlassType = serde_json::from_str("\"mirror\"").unwrap();
        assert_eq!(parsed, GlassType::Mirror);
    }
}
