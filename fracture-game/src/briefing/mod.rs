//! Weekly briefing composition.
//!
//! The compositor turns a read-only [`GameState`] and a [`BriefingCatalog`]
//! into one [`BriefingPacket`]: advisor reports gated by conditions, a visual
//! manifest read off threshold tables, and a capped list of strategic
//! directions. It keeps no state between calls; the only inputs besides the
//! snapshot are the recommendation source and the issue time.

mod advisor;
mod directions;
mod packet;
mod visual;

pub use advisor::{Voice, advisor_reports, group_by_advisor};
pub use directions::{RecommendationSource, RngRecommendations, select_directions};
pub use packet::{
    AdvisorReport, AestheticMode, BriefingPacket, FractureLevel, FractureState, GlitchIntensity,
    GlitchLevel, PaletteCorruption, PaletteLevel, StrategicDirection, StrategicDirections,
    VisualManifest,
};
pub use visual::{VisualInputs, aesthetic_mode, visual_manifest};

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;

use crate::condition::ConditionEvaluator;
use crate::config::BriefingConfig;
use crate::constants::DEFAULT_MORAL_INDEX;
use crate::data::BriefingCatalog;
use crate::state::{GameState, Metric};

/// Render a timestamp the way advisor reports carry it.
#[must_use]
pub fn format_timestamp(issued_at: DateTime<Utc>) -> String {
    issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BriefingCompositor {
    config: BriefingConfig,
}

impl BriefingCompositor {
    #[must_use]
    pub const fn new(config: BriefingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &BriefingConfig {
        &self.config
    }

    /// Compose the packet for `state`.
    ///
    /// Never fails: malformed conditions are read as `false` and missing
    /// metrics take their defaults.
    pub fn generate_briefing<S>(
        &self,
        state: &GameState,
        catalog: &BriefingCatalog,
        recommendations: &mut S,
        issued_at: DateTime<Utc>,
    ) -> BriefingPacket
    where
        S: RecommendationSource + ?Sized,
    {
        let evaluator =
            ConditionEvaluator::for_state(state).with_matching(self.config.operator_matching());
        let moral_index = state
            .party_stats
            .metric_or(Metric::MoralConditioningIndex, DEFAULT_MORAL_INDEX);
        let voice = Voice::for_moral_index(moral_index, self.config.cynical_threshold);

        let advisor_reports = advisor_reports(
            &catalog.advisor_items,
            &evaluator,
            voice,
            &format_timestamp(issued_at),
        );
        let visual_manifest = visual_manifest(&state.party_stats, &self.config.visual);
        let strategic_directions = select_directions(
            &catalog.strategic_directions,
            &evaluator,
            recommendations,
            self.config.max_recommendation_level,
            self.config.max_directions,
            &self.config.selection_message,
        );

        debug!(
            "briefing week {}: {} reports, {} directions, aesthetic {}",
            state.week,
            advisor_reports.len(),
            strategic_directions.count,
            visual_manifest.aesthetic_mode
        );

        BriefingPacket {
            advisor_reports,
            visual_manifest,
            strategic_directions,
            agenda_locked: true,
            lock_message: self.config.lock_message.clone(),
        }
    }
}
