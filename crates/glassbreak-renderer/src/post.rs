//! Post-Processing Effects
//!
//! Bloom, SMAA and tone mapping settings for the composer. Only the top
//! tier runs a composer; the others render straight to the surface.

use glassbreak_core::QualityProfile;

/// Bloom settings
#[derive(Debug, Clone, PartialEq)]
pub struct BloomSettings {
    /// Enable bloom
    pub enabled: bool,
    /// Bloom strength
    pub strength: f32,
    /// Blur radius
    pub radius: f32,
    /// Luminance threshold
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 0.0,
            radius: 0.2,
            threshold: 0.95,
        }
    }
}

/// Tone mapping operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapper {
    #[default]
    ACES,
    Reinhard,
    Neutral,
}

/// Complete post-processing stack settings
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcess {
    /// Run the composer at all
    pub enabled: bool,
    /// Morphological anti-aliasing pass
    pub smaa: bool,
    /// Bloom settings
    pub bloom: BloomSettings,
    /// Tone mapper
    pub tone_mapper: ToneMapper,
    /// Tone mapping exposure
    pub exposure: f32,
}

impl Default for PostProcess {
    fn default() -> Self {
        Self {
            enabled: false,
            smaa: false,
            bloom: BloomSettings::default(),
            tone_mapper: ToneMapper::ACES,
            exposure: 0.55,
        }
    }
}

impl PostProcess {
    /// Settings implied by a quality profile
    pub fn from_profile(profile: &QualityProfile) -> Self {
        let enabled = profile.post_processing_enabled;
        Self {
            enabled,
            smaa: enabled,
            bloom: BloomSettings {
                enabled: enabled && profile.bloom_strength > 0.0,
                strength: profile.bloom_strength,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Fullscreen passes per frame beyond the scene pass
    pub fn pass_count(&self) -> u32 {
        if !self.enabled {
            return 0;
        }
        // output pass is always present in the composer
        1 + self.smaa as u32 + self.bloom.enabled as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glassbreak_core::QualityTier;

    #[test]
    fn test_post_process_defaults() {
        let pp = PostProcess::default();
        assert!(!pp.enabled);
        assert_eq!(pp.exposure, 0.55);
        assert_eq!(pp.pass_count(), 0);
    }

    #[test]
    fn test_from_profile() {
        let low = PostProcess::from_profile(&QualityProfile::for_tier(QualityTier::Low, 1.0));
        assert!(!low.enabled);
        assert!(!low.bloom.enabled);

        let high = PostProcess::from_profile(&QualityProfile::for_tier(QualityTier::High, 1.0));
        assert!(high.enabled && high.smaa && high.bloom.enabled);
        assert_eq!(high.bloom.strength, 0.05);
        assert_eq!(high.bloom.threshold, 0.95);
        assert_eq!(high.pass_count(), 3);
    }
}
