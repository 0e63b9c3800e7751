use fracture_game::{GameState, Metric};

use crate::logic::{BriefingPlan, DEFAULT_PARTY};

pub mod catalog;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: BriefingPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: BriefingPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn narrative_collapse(state: &mut GameState) {
    let stats = &mut state.party_stats;
    stats.insert(Metric::NarrativeCoherence.key(), 0.2);
    stats.insert(Metric::NarrativeControl.key(), 0.1);
    stats.insert(Metric::FactionIntegrity.key(), 0.3);
}

fn moral_drift(state: &mut GameState) {
    let stats = &mut state.party_stats;
    stats.insert(Metric::NarrativeCoherence.key(), 0.5);
    stats.insert(Metric::MoralConditioningIndex.key(), 0.8);
}

fn smoke_scenario() -> TestScenario {
    TestScenario::new(
        "Briefing Smoke Test",
        BriefingPlan::new(DEFAULT_PARTY)
            .with_expectation(catalog::packet_is_complete)
            .with_expectation(catalog::reports_are_ordered),
    )
}

fn party_scenario(name: &'static str, party: &'static str) -> TestScenario {
    TestScenario::new(
        name,
        BriefingPlan::new(party)
            .with_expectation(catalog::packet_is_complete)
            .with_expectation(catalog::directions_respect_limits),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let plan = BriefingPlan::default();
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => smoke_scenario(),
        "stateless-layers" | "stateless" => TestScenario::new(
            "Stateless Reports and Visuals",
            plan.with_expectation(catalog::layers_ignore_seed),
        ),
        "deterministic-seed" | "deterministic" => TestScenario::new(
            "Deterministic Seeded Briefing",
            plan.with_expectation(catalog::same_seed_same_packet),
        ),
        "direction-cap" | "directions" => TestScenario::new(
            "Strategic Direction Limits",
            plan.with_expectation(catalog::directions_respect_limits),
        ),
        "catalog-lint" | "lint" => TestScenario::new(
            "Catalog Conditions Parse",
            plan.with_expectation(catalog::catalog_lints_clean),
        ),
        "crisis-signals" | "crisis" => TestScenario::new(
            "Crisis Signals",
            plan.with_setup(narrative_collapse)
                .with_expectation(catalog::crisis_is_flagged),
        ),
        "cynical-voice" | "cynical" => TestScenario::new(
            "Cynical Advisor Voice",
            plan.with_setup(moral_drift)
                .with_expectation(catalog::voice_turns_cynical),
        ),
        "condition-fallbacks" | "conditions" => TestScenario::new(
            "Condition Fallbacks",
            plan.with_expectation(catalog::conditions_fall_back),
        ),
        "campaign-bootstrap" | "bootstrap" => TestScenario::new(
            "Campaign Bootstrap",
            plan.with_expectation(catalog::every_party_bootstraps),
        ),
        "reform-party" | "reform" => party_scenario("Reform Alliance Briefing", "reform"),
        "vanguard-party" | "vanguard" => party_scenario("Vanguard Party Briefing", "vanguard"),
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Briefing Smoke Test"),
        ("stateless-layers", "Stateless Reports and Visuals"),
        ("deterministic-seed", "Deterministic Seeded Briefing"),
        ("direction-cap", "Strategic Direction Limits"),
        ("catalog-lint", "Catalog Conditions Parse"),
        ("crisis-signals", "Crisis Signals"),
        ("cynical-voice", "Cynical Advisor Voice"),
        ("condition-fallbacks", "Condition Fallbacks"),
        ("campaign-bootstrap", "Campaign Bootstrap"),
        ("reform-party", "Reform Alliance Briefing"),
        ("vanguard-party", "Vanguard Party Briefing"),
    ]
}
