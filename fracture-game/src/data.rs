//! Briefing content tables: advisor items and strategic directions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::condition::{ConditionError, ConditionEvaluator, OperatorMatching};
use crate::constants::{RANK_HIGH, RANK_LOW, RANK_MEDIUM, RANK_UNKNOWN};
use crate::state::PartyStats;

/// Advisor item priority. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Numeric rank; lower means more urgent.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::High => RANK_HIGH,
            Self::Medium => RANK_MEDIUM,
            Self::Low => RANK_LOW,
            Self::Other(_) => RANK_UNKNOWN,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(label) => label,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        match label.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for Priority {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One advisor message gated by a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorItem {
    pub condition: String,
    pub advisor: String,
    #[serde(default)]
    pub priority: Priority,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_cynical: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A selectable strategic direction gated by a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicDirectionItem {
    pub id: u64,
    pub condition: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub narrative_hook: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub global_modifiers: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Problems found while linting catalog content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("strategic direction id {id} appears more than once")]
    DuplicateDirection { id: u64 },
    #[error("{record} has an invalid condition: {source}")]
    InvalidCondition {
        record: String,
        #[source]
        source: ConditionError,
    },
}

/// Read-only content tables consumed by the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BriefingCatalog {
    #[serde(default)]
    pub advisor_items: Vec<AdvisorItem>,
    #[serde(default)]
    pub strategic_directions: Vec<StrategicDirectionItem>,
}

impl BriefingCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load catalog data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn from_parts(
        advisor_items: Vec<AdvisorItem>,
        strategic_directions: Vec<StrategicDirectionItem>,
    ) -> Self {
        Self {
            advisor_items,
            strategic_directions,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advisor_items.is_empty() && self.strategic_directions.is_empty()
    }

    /// Content lint: every clause of every condition must parse and compare
    /// cleanly, and direction ids must be unique. Briefing generation never calls this;
    /// it tolerates bad content by reading it as `false`.
    #[must_use]
    pub fn lint(&self, matching: OperatorMatching) -> Vec<CatalogError> {
        let party = PartyStats::new();
        let evaluator = ConditionEvaluator::new(&party, &[]).with_matching(matching);
        let mut problems = Vec::new();

        for (index, item) in self.advisor_items.iter().enumerate() {
            if let Err(source) = evaluator.validate(&item.condition) {
                problems.push(CatalogError::InvalidCondition {
                    record: format!("advisor item #{index} ({})", item.advisor),
                    source,
                });
            }
        }

        let mut seen = BTreeSet::new();
        for direction in &self.strategic_directions {
            if !seen.insert(direction.id) {
                problems.push(CatalogError::DuplicateDirection { id: direction.id });
            }
            if let Err(source) = evaluator.validate(&direction.condition) {
                problems.push(CatalogError::InvalidCondition {
                    record: format!("strategic direction `{}`", direction.handle),
                    source,
                });
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_from_json() {
        let json = r#"{
            "advisor_items": [
                {
                    "condition": "party.narrative_coherence < 0.4",
                    "advisor": "Media Director",
                    "priority": "high",
                    "message": "Our story is coming apart.",
                    "message_cynical": "Nobody believes the story. Good.",
                    "tags": ["coherence"]
                }
            ],
            "strategic_directions": [
                {
                    "id": 7,
                    "condition": "true",
                    "handle": "consolidate",
                    "title": "Consolidate the Base",
                    "global_modifiers": { "loyalty": 0.05 }
                }
            ]
        }"#;

        let catalog = BriefingCatalog::from_json(json).unwrap();
        assert_eq!(catalog.advisor_items.len(), 1);
        let item = &catalog.advisor_items[0];
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.message_cynical.as_deref(), Some("Nobody believes the story. Good."));

        let direction = &catalog.strategic_directions[0];
        assert_eq!(direction.id, 7);
        assert!(direction.tags.is_empty());
        assert_eq!(direction.global_modifiers["loyalty"], serde_json::json!(0.05));
    }

    #[test]
    fn empty_catalog() {
        let catalog = BriefingCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(BriefingCatalog::from_json("{}").unwrap(), catalog);
    }

    #[test]
    fn priority_ranks_and_unknown_labels() {
        assert_eq!(Priority::from("high").rank(), 1);
        assert_eq!(Priority::from("medium").rank(), 2);
        assert_eq!(Priority::from("low").rank(), 3);

        let urgent = Priority::from("urgent");
        assert_eq!(urgent.rank(), 4);
        assert_eq!(urgent.label(), "urgent");
        assert_eq!(Priority::from("HIGH").rank(), 4);

        let json = serde_json::to_string(&urgent).unwrap();
        assert_eq!(json, "\"urgent\"");
        let back: Priority = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, Priority::Medium);
    }

    #[test]
    fn lint_reports_bad_conditions_and_duplicate_ids() {
        let direction = |id, condition: &str| StrategicDirectionItem {
            id,
            condition: condition.to_string(),
            handle: format!("dir-{id}"),
            title: String::new(),
            narrative_hook: String::new(),
            description: String::new(),
            global_modifiers: BTreeMap::new(),
            tags: Vec::new(),
        };
        let catalog = BriefingCatalog::from_parts(
            vec![AdvisorItem {
                condition: "party.x ## 0.4".to_string(),
                advisor: "Pollster".to_string(),
                priority: Priority::Low,
                message: "?".to_string(),
                message_cynical: None,
                tags: Vec::new(),
            }],
            vec![direction(1, "true"), direction(1, "party.narrative_control > 0.5")],
        );

        let problems = catalog.lint(OperatorMatching::Reference);
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], CatalogError::InvalidCondition { .. }));
        assert_eq!(problems[1], CatalogError::DuplicateDirection { id: 1 });
    }

    #[test]
    fn lint_checks_every_clause_of_a_join() {
        let item = |condition: &str| AdvisorItem {
            condition: condition.to_string(),
            advisor: "Pollster".to_string(),
            priority: Priority::Medium,
            message: "?".to_string(),
            message_cynical: None,
            tags: Vec::new(),
        };
        let catalog = BriefingCatalog::from_parts(
            vec![
                item("party.narrative_coherence > 0.5 && party.x ## 0.4"),
                item("party.narrative_coherence < 0.5 || party.y ## 0.4"),
                item("party.x ## 0.4"),
                item("party.narrative_control < 0.5 || party.narrative_coherence < 0.3"),
            ],
            Vec::new(),
        );

        for matching in [OperatorMatching::Reference, OperatorMatching::LongestFirst] {
            let problems = catalog.lint(matching);
            assert_eq!(problems.len(), 3, "{problems:?}");
            assert!(problems.iter().all(|problem| matches!(
                problem,
                CatalogError::InvalidCondition {
                    source: ConditionError::MissingOperator { .. },
                    ..
                }
            )));
        }
    }
}
