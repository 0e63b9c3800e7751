use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use fracture_game::{BriefingCompositor, BriefingPacket, GameState, RngRecommendations};
use std::sync::Arc;

use super::assets::TesterAssets;

pub const DEFAULT_PARTY: &str = "unity";

/// Issue time stamped on every scenario packet so runs compare byte for byte.
pub const SCENARIO_EPOCH_SECS: i64 = 1_736_154_000;

#[must_use]
pub fn scenario_issued_at() -> DateTime<Utc> {
    Utc.timestamp_opt(SCENARIO_EPOCH_SECS, 0)
        .single()
        .unwrap_or_default()
}

/// Assertion hook run after a briefing has been composed.
type BriefingExpectationFn = Arc<dyn Fn(&BriefingSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct BriefingExpectation(BriefingExpectationFn);

impl std::fmt::Debug for BriefingExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriefingExpectation").finish()
    }
}

impl BriefingExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&BriefingSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// # Errors
    ///
    /// Returns the expectation's own failure.
    pub fn evaluate(&self, summary: &BriefingSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for BriefingExpectation
where
    F: Fn(&BriefingSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// What to brief and what to check afterwards.
#[derive(Debug, Clone)]
pub struct BriefingPlan {
    pub party: String,
    pub setup: Option<fn(&mut GameState)>,
    pub expectations: Vec<BriefingExpectation>,
}

impl Default for BriefingPlan {
    fn default() -> Self {
        Self::new(DEFAULT_PARTY)
    }
}

impl BriefingPlan {
    #[must_use]
    pub fn new(party: impl Into<String>) -> Self {
        Self {
            party: party.into(),
            setup: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut GameState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<BriefingExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Everything one briefing run produced.
#[derive(Debug, Clone)]
pub struct BriefingSummary {
    pub seed: u64,
    pub state: GameState,
    pub packet: BriefingPacket,
    /// Same state, same seed.
    pub replay: BriefingPacket,
    /// Same state, next seed.
    pub reseeded: BriefingPacket,
    pub assets: Arc<TesterAssets>,
}

#[derive(Debug, Clone)]
pub struct BriefingTester {
    assets: Arc<TesterAssets>,
    compositor: BriefingCompositor,
    verbose: bool,
}

impl BriefingTester {
    #[must_use]
    pub fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        let compositor = BriefingCompositor::new(assets.config.clone());
        Self {
            assets,
            compositor,
            verbose,
        }
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn compose(&self, state: &GameState, seed: u64) -> BriefingPacket {
        let mut recommendations = RngRecommendations::seeded(seed);
        self.compositor.generate_briefing(
            state,
            &self.assets.catalog,
            &mut recommendations,
            scenario_issued_at(),
        )
    }

    /// Bootstrap the plan's party, apply its setup and brief three times.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan names a party the archetypes lack.
    pub fn run_plan(&self, plan: &BriefingPlan, seed: u64) -> Result<BriefingSummary> {
        let mut state = self.assets.bootstrap_state(&plan.party)?;
        if let Some(setup) = plan.setup {
            setup(&mut state);
        }

        if self.verbose {
            log_state(seed, &plan.party, &state);
        }

        let packet = self.compose(&state, seed);
        let replay = self.compose(&state, seed);
        let reseeded = self.compose(&state, seed.wrapping_add(1));

        Ok(BriefingSummary {
            seed,
            state,
            packet,
            replay,
            reseeded,
            assets: Arc::clone(&self.assets),
        })
    }
}

fn log_state(seed: u64, party: &str, state: &GameState) {
    let stats = serde_json::to_string(&state.party_stats).unwrap_or_default();
    println!("🗳️  Briefing | seed:{seed} party:{party} week:{}", state.week);
    println!("📊 Party stats | {stats}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fracture_game::Metric;

    fn tester() -> BriefingTester {
        BriefingTester::new(Arc::new(TesterAssets::load_default().unwrap()), false)
    }

    #[test]
    fn scenario_timestamp_is_fixed() {
        assert_eq!(
            fracture_game::format_timestamp(scenario_issued_at()),
            "2025-01-06T09:00:00Z"
        );
    }

    #[test]
    fn run_plan_applies_setup() {
        let plan = BriefingPlan::default().with_setup(|state| {
            state
                .party_stats
                .insert(Metric::NarrativeCoherence.key(), 0.1);
        });
        let summary = tester().run_plan(&plan, 7).unwrap();
        assert_eq!(
            summary.state.party_stats.metric(Metric::NarrativeCoherence),
            Some(0.1)
        );
        assert_eq!(summary.packet, summary.replay);
    }

    #[test]
    fn run_plan_rejects_unknown_party() {
        let plan = BriefingPlan::new("nobody");
        assert!(tester().run_plan(&plan, 1).is_err());
    }

    #[test]
    fn expectations_see_the_summary() {
        let expectation = BriefingExpectation::new(|summary: &BriefingSummary| {
            anyhow::ensure!(summary.seed == 3, "wrong seed");
            Ok(())
        });
        let summary = tester().run_plan(&BriefingPlan::default(), 3).unwrap();
        assert!(expectation.evaluate(&summary).is_ok());
    }
}
