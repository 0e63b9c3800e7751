//! Game-state snapshot consumed by the briefing phase.
//!
//! The snapshot is produced by the campaign layer and is read-only for the
//! duration of a briefing. Party stats form a tree: leaves are numbers and
//! branches are nested tables, so condition paths can walk into them.
//! Anything else found in the JSON is kept verbatim but never resolves to a
//! number.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    METRIC_FACTION_INTEGRITY, METRIC_MORAL_CONDITIONING, METRIC_NARRATIVE_COHERENCE,
    METRIC_NARRATIVE_CONTROL, STARTING_WEEK,
};

/// Keyed collection of stat values.
pub type StatTable = BTreeMap<String, StatValue>;

/// A single node in a stat tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Table(StatTable),
    /// Strings, booleans, arrays and nulls survive a round-trip but never
    /// satisfy a numeric lookup.
    Other(serde_json::Value),
}

impl StatValue {
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_table(&self) -> Option<&StatTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<StatTable> for StatValue {
    fn from(table: StatTable) -> Self {
        Self::Table(table)
    }
}

/// Walk `segments` through `table`, returning the numeric leaf if every hop
/// lands on a nested table and the final value is a number.
#[must_use]
pub fn walk_stat_path<'a, I>(table: &StatTable, segments: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segments = segments.into_iter();
    let mut current = table.get(segments.next()?)?;
    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }
    current.as_number()
}

/// Party metrics the compositor reads directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    NarrativeCoherence,
    NarrativeControl,
    FactionIntegrity,
    MoralConditioningIndex,
}

impl Metric {
    /// Canonical snake_case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NarrativeCoherence => METRIC_NARRATIVE_COHERENCE,
            Self::NarrativeControl => METRIC_NARRATIVE_CONTROL,
            Self::FactionIntegrity => METRIC_FACTION_INTEGRITY,
            Self::MoralConditioningIndex => METRIC_MORAL_CONDITIONING,
        }
    }

    /// camelCase spelling accepted from older content exports.
    #[must_use]
    pub const fn camel_key(self) -> &'static str {
        match self {
            Self::NarrativeCoherence => "narrativeCoherence",
            Self::NarrativeControl => "narrativeControl",
            Self::FactionIntegrity => "factionIntegrity",
            Self::MoralConditioningIndex => "moralConditioningIndex",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Scalar metrics describing the player's faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PartyStats(StatTable);

impl PartyStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StatValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.0.get(key)
    }

    /// Numeric value stored directly under `key`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StatValue::as_number)
    }

    /// Read a well-known metric, accepting either key spelling.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.number(metric.key())
            .or_else(|| self.number(metric.camel_key()))
    }

    #[must_use]
    pub fn metric_or(&self, metric: Metric, fallback: f64) -> f64 {
        self.metric(metric).unwrap_or(fallback)
    }

    /// Resolve a dotted path below the party namespace.
    #[must_use]
    pub fn resolve_path<'a, I>(&self, segments: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        walk_stat_path(&self.0, segments)
    }

    #[must_use]
    pub const fn as_table(&self) -> &StatTable {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<StatTable> for PartyStats {
    fn from(table: StatTable) -> Self {
        Self(table)
    }
}

/// A named voter bloc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Demographic {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "numeric_id"
    )]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub stats: StatTable,
}

impl Demographic {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            stats: StatTable::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_stat(mut self, key: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.stats.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn stat(&self, key: &str) -> Option<f64> {
        self.stats.get(key).and_then(StatValue::as_number)
    }

    /// Case-insensitive name match. Unnamed records never match.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        !self.name.is_empty() && self.name.to_lowercase() == name.to_lowercase()
    }

    #[must_use]
    pub fn resolve_path<'a, I>(&self, segments: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        walk_stat_path(&self.stats, segments)
    }
}

/// The snapshot handed to the briefing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default = "GameState::default_week")]
    pub week: u32,
    #[serde(default)]
    pub funds: i64,
    #[serde(default, alias = "partyStats", deserialize_with = "null_as_default")]
    pub party_stats: PartyStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demographics: Vec<Demographic>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            week: Self::default_week(),
            funds: 0,
            party_stats: PartyStats::default(),
            demographics: Vec::new(),
        }
    }
}

impl GameState {
    const fn default_week() -> u32 {
        STARTING_WEEK
    }

    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_party_stats(mut self, party_stats: PartyStats) -> Self {
        self.party_stats = party_stats;
        self
    }

    #[must_use]
    pub fn with_demographic(mut self, demographic: Demographic) -> Self {
        self.demographics.push(demographic);
        self
    }

    /// First demographic whose name matches case-insensitively.
    #[must_use]
    pub fn find_demographic(&self, name: &str) -> Option<&Demographic> {
        find_demographic(&self.demographics, name)
    }
}

/// First-match lookup shared by the state and the condition evaluator.
#[must_use]
pub fn find_demographic<'a>(demographics: &'a [Demographic], name: &str) -> Option<&'a Demographic> {
    demographics.iter().find(|demo| demo.matches_name(name))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids that are not non-negative integers are dropped rather than failing
/// the whole snapshot.
fn numeric_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?.and_then(|id| id.as_u64()))
}
