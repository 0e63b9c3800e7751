//! Visual manifest: threshold lookups over the party metrics.

use super::packet::{AestheticMode, VisualManifest};
use crate::config::{AestheticConfig, VisualConfig};
use crate::constants::{DEFAULT_COHERENCE, DEFAULT_CONTROL, DEFAULT_INTEGRITY, DEFAULT_MORAL_INDEX};
use crate::state::{Metric, PartyStats};

/// The four metrics the manifest reads, with missing values defaulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualInputs {
    pub narrative_coherence: f64,
    pub narrative_control: f64,
    pub faction_integrity: f64,
    pub moral_conditioning_index: f64,
}

impl VisualInputs {
    #[must_use]
    pub fn from_party(party: &PartyStats) -> Self {
        Self {
            narrative_coherence: party.metric_or(Metric::NarrativeCoherence, DEFAULT_COHERENCE),
            narrative_control: party.metric_or(Metric::NarrativeControl, DEFAULT_CONTROL),
            faction_integrity: party.metric_or(Metric::FactionIntegrity, DEFAULT_INTEGRITY),
            moral_conditioning_index: party
                .metric_or(Metric::MoralConditioningIndex, DEFAULT_MORAL_INDEX),
        }
    }

    #[must_use]
    pub fn narrative_average(&self) -> f64 {
        f64::midpoint(self.narrative_coherence, self.narrative_control)
    }
}

#[must_use]
pub fn aesthetic_mode(coherence: f64, moral: f64, thresholds: &AestheticConfig) -> AestheticMode {
    if coherence > thresholds.pristine_min_coherence && moral < thresholds.pristine_max_moral {
        AestheticMode::Pristine
    } else if coherence > thresholds.unified_min_coherence && moral > thresholds.unified_min_moral {
        AestheticMode::Unified
    } else if coherence < thresholds.fractured_max_coherence {
        AestheticMode::Fractured
    } else if moral > thresholds.corrupted_min_moral {
        AestheticMode::Corrupted
    } else {
        AestheticMode::Standard
    }
}

#[must_use]
pub fn visual_manifest(party: &PartyStats, config: &VisualConfig) -> VisualManifest {
    let inputs = VisualInputs::from_party(party);
    VisualManifest {
        glitch_intensity: config.glitch_for(inputs.narrative_average()),
        fracture_state: config.fracture_for(inputs.faction_integrity),
        palette_corruption: config.palette_for(inputs.moral_conditioning_index),
        aesthetic_mode: aesthetic_mode(
            inputs.narrative_coherence,
            inputs.moral_conditioning_index,
            &config.aesthetic,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{FractureLevel, GlitchLevel, PaletteLevel};

    fn party(coherence: f64, control: f64, integrity: f64, moral: f64) -> PartyStats {
        PartyStats::new()
            .with("narrative_coherence", coherence)
            .with("narrative_control", control)
            .with("faction_integrity", integrity)
            .with("moral_conditioning_index", moral)
    }

    #[test]
    fn collapsing_narrative_is_severe_glitch() {
        let manifest = visual_manifest(&party(0.2, 0.1, 0.5, 0.0), &VisualConfig::default());
        let glitch = manifest.glitch_intensity;
        assert_eq!(glitch.level, GlitchLevel::Severe);
        assert!((glitch.chromatic_aberration - 0.15).abs() < f64::EPSILON);
        assert!((glitch.ui_noise - 0.8).abs() < f64::EPSILON);
        assert_eq!(manifest.fracture_state.level, FractureLevel::Moderate);
        assert_eq!(manifest.aesthetic_mode, AestheticMode::Fractured);
    }

    #[test]
    fn high_moral_conditioning_corrupts_palette() {
        let manifest = visual_manifest(&party(0.5, 0.5, 0.5, 0.8), &VisualConfig::default());
        let palette = manifest.palette_corruption;
        assert_eq!(palette.level, PaletteLevel::Severe);
        assert_eq!(palette.shift_direction, "sickly_yellow_green");
        assert!((palette.corruption_percentage - 0.8).abs() < f64::EPSILON);
        assert_eq!(palette.primary_color_override.as_deref(), Some("#b5d96f"));
        assert_eq!(palette.secondary_color_override.as_deref(), Some("#e8d96f"));
    }

    #[test]
    fn empty_stats_use_calm_defaults() {
        let manifest = visual_manifest(&PartyStats::new(), &VisualConfig::default());
        assert_eq!(manifest.glitch_intensity.level, GlitchLevel::Low);
        assert_eq!(manifest.fracture_state.level, FractureLevel::Stable);
        assert_eq!(manifest.palette_corruption.level, PaletteLevel::None);
        assert_eq!(manifest.aesthetic_mode, AestheticMode::Pristine);
    }

    #[test]
    fn camel_case_metrics_are_read() {
        let stats = PartyStats::new()
            .with("narrativeCoherence", 0.2)
            .with("narrativeControl", 0.2);
        let manifest = visual_manifest(&stats, &VisualConfig::default());
        assert_eq!(manifest.glitch_intensity.level, GlitchLevel::Severe);
    }

    #[test]
    fn aesthetic_mode_checks_in_order() {
        let thresholds = AestheticConfig::default();
        assert_eq!(aesthetic_mode(0.9, 0.1, &thresholds), AestheticMode::Pristine);
        assert_eq!(aesthetic_mode(0.9, 0.65, &thresholds), AestheticMode::Unified);
        assert_eq!(aesthetic_mode(0.4, 0.9, &thresholds), AestheticMode::Fractured);
        assert_eq!(aesthetic_mode(0.55, 0.8, &thresholds), AestheticMode::Corrupted);
        assert_eq!(aesthetic_mode(0.55, 0.4, &thresholds), AestheticMode::Standard);
        assert_eq!(aesthetic_mode(0.8, 0.1, &thresholds), AestheticMode::Standard);
    }
}
