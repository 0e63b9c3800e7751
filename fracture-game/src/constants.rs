//! Centralized tuning constants for the Fracture briefing logic.
//!
//! These values back the `Default` implementations of the configuration
//! types. Deployments may override them through JSON configuration, but the
//! defaults here are the reviewed reference tables.

// Metric keys ---------------------------------------------------------------
pub const METRIC_NARRATIVE_COHERENCE: &str = "narrative_coherence";
pub const METRIC_NARRATIVE_CONTROL: &str = "narrative_control";
pub const METRIC_FACTION_INTEGRITY: &str = "faction_integrity";
pub const METRIC_MORAL_CONDITIONING: &str = "moral_conditioning_index";

// Condition language --------------------------------------------------------
pub(crate) const NAMESPACE_PARTY: &str = "party";
pub(crate) const NAMESPACE_DEMOGRAPHICS: &str = "demographics";
pub(crate) const LITERAL_TRUE: &str = "true";
pub(crate) const LITERAL_FALSE: &str = "false";
pub(crate) const JOIN_ALL: &str = "&&";
pub(crate) const JOIN_ANY: &str = "||";
pub(crate) const PATH_SEPARATOR: char = '.';
pub(crate) const UNRESOLVED_VALUE: f64 = 0.0;

// Advisor reports -----------------------------------------------------------
pub(crate) const CYNICAL_THRESHOLD: f64 = 0.5;
pub(crate) const RANK_HIGH: u8 = 1;
pub(crate) const RANK_MEDIUM: u8 = 2;
pub(crate) const RANK_LOW: u8 = 3;
pub(crate) const RANK_UNKNOWN: u8 = 4;

// Strategic directions ------------------------------------------------------
pub(crate) const MAX_DIRECTIONS: usize = 3;
pub(crate) const MAX_RECOMMENDATION_LEVEL: u8 = 2;
pub(crate) const LOCK_MESSAGE: &str =
    "Strategic direction must be selected before proceeding to Agenda Planning.";
pub(crate) const SELECTION_MESSAGE: &str =
    "You must select a strategic direction to proceed to Agenda Planning.";

// Visual manifest defaults --------------------------------------------------
pub(crate) const DEFAULT_COHERENCE: f64 = 1.0;
pub(crate) const DEFAULT_CONTROL: f64 = 1.0;
pub(crate) const DEFAULT_INTEGRITY: f64 = 1.0;
pub(crate) const DEFAULT_MORAL_INDEX: f64 = 0.0;

pub(crate) const PRISTINE_MIN_COHERENCE: f64 = 0.8;
pub(crate) const PRISTINE_MAX_MORAL: f64 = 0.3;
pub(crate) const UNIFIED_MIN_COHERENCE: f64 = 0.6;
pub(crate) const UNIFIED_MIN_MORAL: f64 = 0.6;
pub(crate) const FRACTURED_MAX_COHERENCE: f64 = 0.5;
pub(crate) const CORRUPTED_MIN_MORAL: f64 = 0.7;

pub(crate) const SHIFT_CORRUPTED: &str = "sickly_yellow_green";
pub(crate) const SHIFT_CLEAN: &str = "cyan";

// Campaign bootstrap --------------------------------------------------------
pub(crate) const STARTING_WEEK: u32 = 1;
pub(crate) const STARTING_FUNDS: i64 = 5_000;
pub(crate) const STARTING_COHERENCE: f64 = 1.0;
pub(crate) const STARTING_CONTROL: f64 = 0.8;
pub(crate) const STARTING_INTEGRITY: f64 = 0.7;
pub(crate) const STARTING_MORAL_INDEX: f64 = 0.0;
pub(crate) const BASE_LOYALTY: f64 = 0.7;
pub(crate) const OPPOSED_LOYALTY: f64 = 0.2;
pub(crate) const STARTING_DISSONANCE: f64 = 0.0;
