//! Tunable briefing configuration.
//!
//! Every field has a serde default so partial JSON overrides work; an empty
//! object yields the reference tables from [`crate::constants`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::briefing::{
    FractureLevel, FractureState, GlitchIntensity, GlitchLevel, PaletteCorruption, PaletteLevel,
};
use crate::condition::OperatorMatching;
use crate::constants::{
    CORRUPTED_MIN_MORAL, CYNICAL_THRESHOLD, FRACTURED_MAX_COHERENCE, LOCK_MESSAGE,
    MAX_DIRECTIONS, MAX_RECOMMENDATION_LEVEL, PRISTINE_MAX_MORAL, PRISTINE_MIN_COHERENCE,
    SELECTION_MESSAGE, SHIFT_CLEAN, SHIFT_CORRUPTED, UNIFIED_MIN_COHERENCE, UNIFIED_MIN_MORAL,
};

/// Errors raised when configuration values violate their bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("{field} thresholds must be strictly {order} (tier {index} has {threshold:.2})")]
    TierOrder {
        field: &'static str,
        order: &'static str,
        index: usize,
        threshold: f64,
    },
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RangeViolation {
            field,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierOrder {
    /// `value < threshold`, thresholds ascending.
    Below,
    /// `value > threshold`, thresholds descending.
    Above,
}

impl TierOrder {
    const fn label(self) -> &'static str {
        match self {
            Self::Below => "ascending",
            Self::Above => "descending",
        }
    }

    fn hits(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Below => value < threshold,
            Self::Above => value > threshold,
        }
    }

    fn ordered(self, previous: f64, next: f64) -> bool {
        match self {
            Self::Below => previous < next,
            Self::Above => previous > next,
        }
    }
}

/// One row of a threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier<T> {
    pub threshold: f64,
    #[serde(flatten)]
    pub effect: T,
}

impl<T> Tier<T> {
    pub const fn new(threshold: f64, effect: T) -> Self {
        Self { threshold, effect }
    }
}

/// Threshold table: the first tier hit wins, otherwise `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub tiers: Vec<Tier<T>>,
    pub fallback: T,
}

impl<T> TierTable<T> {
    fn select(&self, order: TierOrder, value: f64) -> &T {
        self.tiers
            .iter()
            .find(|tier| order.hits(value, tier.threshold))
            .map_or(&self.fallback, |tier| &tier.effect)
    }

    fn validate(&self, field: &'static str, order: TierOrder) -> Result<(), ConfigError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            check_unit(field, tier.threshold)?;
            if index > 0 && !order.ordered(self.tiers[index - 1].threshold, tier.threshold) {
                return Err(ConfigError::TierOrder {
                    field,
                    order: order.label(),
                    index,
                    threshold: tier.threshold,
                });
            }
        }
        Ok(())
    }

    fn effects(&self) -> impl Iterator<Item = &T> {
        self.tiers
            .iter()
            .map(|tier| &tier.effect)
            .chain(std::iter::once(&self.fallback))
    }
}

/// Thresholds for the overall aesthetic mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AestheticConfig {
    #[serde(default = "AestheticConfig::default_pristine_min_coherence")]
    pub pristine_min_coherence: f64,
    #[serde(default = "AestheticConfig::default_pristine_max_moral")]
    pub pristine_max_moral: f64,
    #[serde(default = "AestheticConfig::default_unified_min_coherence")]
    pub unified_min_coherence: f64,
    #[serde(default = "AestheticConfig::default_unified_min_moral")]
    pub unified_min_moral: f64,
    #[serde(default = "AestheticConfig::default_fractured_max_coherence")]
    pub fractured_max_coherence: f64,
    #[serde(default = "AestheticConfig::default_corrupted_min_moral")]
    pub corrupted_min_moral: f64,
}

impl AestheticConfig {
    const fn default_pristine_min_coherence() -> f64 {
        PRISTINE_MIN_COHERENCE
    }

    const fn default_pristine_max_moral() -> f64 {
        PRISTINE_MAX_MORAL
    }

    const fn default_unified_min_coherence() -> f64 {
        UNIFIED_MIN_COHERENCE
    }

    const fn default_unified_min_moral() -> f64 {
        UNIFIED_MIN_MORAL
    }

    const fn default_fractured_max_coherence() -> f64 {
        FRACTURED_MAX_COHERENCE
    }

    const fn default_corrupted_min_moral() -> f64 {
        CORRUPTED_MIN_MORAL
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_unit("aesthetic.pristine_min_coherence", self.pristine_min_coherence)?;
        check_unit("aesthetic.pristine_max_moral", self.pristine_max_moral)?;
        check_unit("aesthetic.unified_min_coherence", self.unified_min_coherence)?;
        check_unit("aesthetic.unified_min_moral", self.unified_min_moral)?;
        check_unit("aesthetic.fractured_max_coherence", self.fractured_max_coherence)?;
        check_unit("aesthetic.corrupted_min_moral", self.corrupted_min_moral)
    }
}

impl Default for AestheticConfig {
    fn default() -> Self {
        Self {
            pristine_min_coherence: Self::default_pristine_min_coherence(),
            pristine_max_moral: Self::default_pristine_max_moral(),
            unified_min_coherence: Self::default_unified_min_coherence(),
            unified_min_moral: Self::default_unified_min_moral(),
            fractured_max_coherence: Self::default_fractured_max_coherence(),
            corrupted_min_moral: Self::default_corrupted_min_moral(),
        }
    }
}

/// Tier tables backing the visual manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Keyed on the mean of narrative coherence and control; `value < threshold`.
    #[serde(default = "VisualConfig::default_glitch")]
    pub glitch: TierTable<GlitchIntensity>,
    /// Keyed on faction integrity; `value < threshold`.
    #[serde(default = "VisualConfig::default_fracture")]
    pub fracture: TierTable<FractureState>,
    /// Keyed on the moral conditioning index; `value > threshold`.
    #[serde(default = "VisualConfig::default_palette")]
    pub palette: TierTable<PaletteCorruption>,
    #[serde(default)]
    pub aesthetic: AestheticConfig,
}

impl VisualConfig {
    #[must_use]
    pub fn default_glitch() -> TierTable<GlitchIntensity> {
        let glitch = |level, chromatic_aberration, ui_noise| GlitchIntensity {
            level,
            chromatic_aberration,
            ui_noise,
        };
        TierTable {
            tiers: vec![
                Tier::new(0.3, glitch(GlitchLevel::Severe, 0.15, 0.8)),
                Tier::new(0.5, glitch(GlitchLevel::High, 0.10, 0.5)),
                Tier::new(0.7, glitch(GlitchLevel::Medium, 0.05, 0.2)),
            ],
            fallback: glitch(GlitchLevel::Low, 0.0, 0.0),
        }
    }

    #[must_use]
    pub fn default_fracture() -> TierTable<FractureState> {
        let fracture = |level, icon_corruption, visual_breaks| FractureState {
            level,
            icon_corruption,
            visual_breaks,
        };
        TierTable {
            tiers: vec![
                Tier::new(0.3, fracture(FractureLevel::Critical, 0.9, true)),
                Tier::new(0.5, fracture(FractureLevel::Severe, 0.6, true)),
                Tier::new(0.7, fracture(FractureLevel::Moderate, 0.3, false)),
            ],
            fallback: fracture(FractureLevel::Stable, 0.0, false),
        }
    }

    #[must_use]
    pub fn default_palette() -> TierTable<PaletteCorruption> {
        let corrupted = |level, primary: &str, secondary: &str, corruption_percentage| {
            PaletteCorruption {
                level,
                shift_direction: SHIFT_CORRUPTED.to_string(),
                primary_color_override: Some(primary.to_string()),
                secondary_color_override: Some(secondary.to_string()),
                corruption_percentage,
            }
        };
        TierTable {
            tiers: vec![
                Tier::new(0.7, corrupted(PaletteLevel::Severe, "#b5d96f", "#e8d96f", 0.8)),
                Tier::new(0.5, corrupted(PaletteLevel::Moderate, "#d4e89f", "#f0e8a8", 0.5)),
                Tier::new(
                    0.3,
                    corrupted(
                        PaletteLevel::Low,
                        "rgba(212, 232, 159, 0.2)",
                        "rgba(240, 232, 168, 0.2)",
                        0.2,
                    ),
                ),
            ],
            fallback: PaletteCorruption {
                level: PaletteLevel::None,
                shift_direction: SHIFT_CLEAN.to_string(),
                primary_color_override: None,
                secondary_color_override: None,
                corruption_percentage: 0.0,
            },
        }
    }

    #[must_use]
    pub fn glitch_for(&self, narrative_average: f64) -> GlitchIntensity {
        *self.glitch.select(TierOrder::Below, narrative_average)
    }

    #[must_use]
    pub fn fracture_for(&self, faction_integrity: f64) -> FractureState {
        *self.fracture.select(TierOrder::Below, faction_integrity)
    }

    #[must_use]
    pub fn palette_for(&self, moral_index: f64) -> PaletteCorruption {
        self.palette.select(TierOrder::Above, moral_index).clone()
    }

    /// Validate tier ordering and value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a threshold is out of `[0, 1]`, a table is
    /// not strictly ordered, or an effect magnitude is out of `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.glitch.validate("visual.glitch", TierOrder::Below)?;
        for effect in self.glitch.effects() {
            check_unit("visual.glitch.chromatic_aberration", effect.chromatic_aberration)?;
            check_unit("visual.glitch.ui_noise", effect.ui_noise)?;
        }

        self.fracture.validate("visual.fracture", TierOrder::Below)?;
        for effect in self.fracture.effects() {
            check_unit("visual.fracture.icon_corruption", effect.icon_corruption)?;
        }

        self.palette.validate("visual.palette", TierOrder::Above)?;
        for effect in self.palette.effects() {
            check_unit(
                "visual.palette.corruption_percentage",
                effect.corruption_percentage,
            )?;
        }

        self.aesthetic.validate()
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            glitch: Self::default_glitch(),
            fracture: Self::default_fracture(),
            palette: Self::default_palette(),
            aesthetic: AestheticConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConditionConfig {
    #[serde(default)]
    pub operator_matching: OperatorMatching,
}

/// Top-level briefing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingConfig {
    /// Moral conditioning above this switches advisors to cynical messages.
    #[serde(default = "BriefingConfig::default_cynical_threshold")]
    pub cynical_threshold: f64,
    #[serde(default = "BriefingConfig::default_max_directions")]
    pub max_directions: usize,
    /// Recommendation levels are drawn from `0..=max_recommendation_level`.
    #[serde(default = "BriefingConfig::default_max_recommendation_level")]
    pub max_recommendation_level: u8,
    #[serde(default = "BriefingConfig::default_lock_message")]
    pub lock_message: String,
    #[serde(default = "BriefingConfig::default_selection_message")]
    pub selection_message: String,
    #[serde(default)]
    pub condition: ConditionConfig,
    #[serde(default)]
    pub visual: VisualConfig,
}

impl BriefingConfig {
    const fn default_cynical_threshold() -> f64 {
        CYNICAL_THRESHOLD
    }

    const fn default_max_directions() -> usize {
        MAX_DIRECTIONS
    }

    const fn default_max_recommendation_level() -> u8 {
        MAX_RECOMMENDATION_LEVEL
    }

    fn default_lock_message() -> String {
        LOCK_MESSAGE.to_string()
    }

    fn default_selection_message() -> String {
        SELECTION_MESSAGE.to_string()
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the configuration shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn operator_matching(&self) -> OperatorMatching {
        self.condition.operator_matching
    }

    #[must_use]
    pub fn with_operator_matching(mut self, matching: OperatorMatching) -> Self {
        self.condition.operator_matching = matching;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates its documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("cynical_threshold", self.cynical_threshold)?;
        if self.max_directions == 0 {
            return Err(ConfigError::MinViolation {
                field: "max_directions",
                min: 1,
                value: 0,
            });
        }
        self.visual.validate()
    }
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            cynical_threshold: Self::default_cynical_threshold(),
            max_directions: Self::default_max_directions(),
            max_recommendation_level: Self::default_max_recommendation_level(),
            lock_message: Self::default_lock_message(),
            selection_message: Self::default_selection_message(),
            condition: ConditionConfig::default(),
            visual: VisualConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = BriefingConfig::from_json("{}").unwrap();
        assert_eq!(config, BriefingConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.max_directions, 3);
        assert_eq!(config.operator_matching(), OperatorMatching::Reference);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = BriefingConfig::from_json(
            r#"{"max_directions": 2, "condition": {"operator_matching": "longest_first"}}"#,
        )
        .unwrap();
        assert_eq!(config.max_directions, 2);
        assert_eq!(config.operator_matching(), OperatorMatching::LongestFirst);
        assert_eq!(config.visual, VisualConfig::default());
        assert!((config.cynical_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn default_tables_match_reference_tiers() {
        let visual = VisualConfig::default();
        assert_eq!(visual.glitch_for(0.15).level, GlitchLevel::Severe);
        assert_eq!(visual.glitch_for(0.3).level, GlitchLevel::High);
        assert_eq!(visual.glitch_for(0.69).level, GlitchLevel::Medium);
        assert_eq!(visual.glitch_for(0.7).level, GlitchLevel::Low);

        assert_eq!(visual.fracture_for(0.29).level, FractureLevel::Critical);
        assert!(visual.fracture_for(0.45).visual_breaks);
        assert!(!visual.fracture_for(0.5).visual_breaks);
        assert_eq!(visual.fracture_for(1.0).level, FractureLevel::Stable);

        assert_eq!(visual.palette_for(0.71).level, PaletteLevel::Severe);
        assert_eq!(visual.palette_for(0.7).level, PaletteLevel::Moderate);
        assert_eq!(visual.palette_for(0.31).level, PaletteLevel::Low);
        let clean = visual.palette_for(0.3);
        assert_eq!(clean.level, PaletteLevel::None);
        assert_eq!(clean.shift_direction, "cyan");
        assert!(clean.primary_color_override.is_none());
    }

    #[test]
    fn tier_tables_round_trip_through_json() {
        let json = serde_json::to_value(VisualConfig::default_glitch()).unwrap();
        assert_eq!(json["tiers"][0]["threshold"], 0.3);
        assert_eq!(json["tiers"][0]["level"], "severe");
        assert_eq!(json["fallback"]["level"], "low");
        let back: TierTable<GlitchIntensity> = serde_json::from_value(json).unwrap();
        assert_eq!(back, VisualConfig::default_glitch());
    }

    #[test]
    fn validate_rejects_unordered_tiers() {
        let mut config = BriefingConfig::default();
        config.visual.glitch.tiers.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TierOrder {
                field: "visual.glitch",
                index: 1,
                ..
            })
        ));

        let mut config = BriefingConfig::default();
        config.visual.palette.tiers.reverse();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TierOrder {
                order: "descending",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = BriefingConfig::default();
        config.cynical_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RangeViolation {
                field: "cynical_threshold",
                ..
            })
        ));

        let mut config = BriefingConfig::default();
        config.max_directions = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MinViolation { .. })
        ));

        let mut config = BriefingConfig::default();
        config.visual.fracture.fallback.icon_corruption = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("visual.fracture.icon_corruption"));
    }
}
