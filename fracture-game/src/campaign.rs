//! Campaign bootstrap: the week-one snapshot for a chosen party.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BASE_LOYALTY, OPPOSED_LOYALTY, STARTING_COHERENCE, STARTING_CONTROL, STARTING_DISSONANCE,
    STARTING_FUNDS, STARTING_INTEGRITY, STARTING_MORAL_INDEX, STARTING_WEEK,
};
use crate::state::{Demographic, GameState, Metric, PartyStats, StatTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("unknown party handle `{handle}`")]
    UnknownParty { handle: String },
}

/// A playable party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyArchetype {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PartyArchetype {
    #[must_use]
    pub fn campaign_title(&self) -> String {
        format!("{} Campaign", self.name)
    }
}

/// A voter bloc template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicArchetype {
    pub id: u64,
    pub name: String,
    /// Party handles this bloc leans toward.
    #[serde(default)]
    pub party_lean: Vec<String>,
    pub base_dissonance_threshold: f64,
}

impl DemographicArchetype {
    #[must_use]
    pub fn leans_toward(&self, handle: &str) -> bool {
        self.party_lean.iter().any(|lean| lean == handle)
    }
}

/// Static archetype tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Archetypes {
    #[serde(default)]
    pub parties: Vec<PartyArchetype>,
    #[serde(default)]
    pub demographics: Vec<DemographicArchetype>,
}

impl Archetypes {
    /// Load archetypes from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn party(&self, handle: &str) -> Option<&PartyArchetype> {
        self.parties.iter().find(|party| party.handle == handle)
    }
}

/// Build the opening snapshot for `party_handle`.
///
/// # Errors
///
/// Returns [`CampaignError::UnknownParty`] if no archetype has that handle.
pub fn initial_state(party_handle: &str, archetypes: &Archetypes) -> Result<GameState, CampaignError> {
    let party = archetypes
        .party(party_handle)
        .ok_or_else(|| CampaignError::UnknownParty {
            handle: party_handle.to_string(),
        })?;

    let party_stats = PartyStats::new()
        .with(Metric::NarrativeCoherence.key(), STARTING_COHERENCE)
        .with(Metric::NarrativeControl.key(), STARTING_CONTROL)
        .with(Metric::FactionIntegrity.key(), STARTING_INTEGRITY)
        .with(Metric::MoralConditioningIndex.key(), STARTING_MORAL_INDEX);

    let demographics = archetypes
        .demographics
        .iter()
        .map(|demo| {
            let loyalty = if demo.leans_toward(&party.handle) {
                BASE_LOYALTY
            } else {
                OPPOSED_LOYALTY
            };
            Demographic::new(demo.name.clone())
                .with_id(demo.id)
                .with_stat("loyalty", loyalty)
                .with_stat("dissonance", STARTING_DISSONANCE)
                .with_stat("tolerance", demo.base_dissonance_threshold)
                .with_stat("active_narratives", StatTable::new())
        })
        .collect();

    Ok(GameState {
        week: STARTING_WEEK,
        funds: STARTING_FUNDS,
        party_stats,
        demographics,
    })
}
