//! Output types of a briefing run. Everything serializes to snake_case JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::data::{Priority, StrategicDirectionItem};

/// Everything the UI needs to render one weekly briefing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingPacket {
    pub advisor_reports: Vec<AdvisorReport>,
    pub visual_manifest: VisualManifest,
    pub strategic_directions: StrategicDirections,
    /// Always `true` when freshly generated; agenda planning unlocks once a
    /// direction has been chosen downstream.
    pub agenda_locked: bool,
    pub lock_message: String,
}

/// The single message chosen for one advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorReport {
    pub advisor: String,
    pub priority: Priority,
    pub priority_level: u8,
    pub message: String,
    pub tags: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualManifest {
    pub glitch_intensity: GlitchIntensity,
    pub fracture_state: FractureState,
    pub palette_corruption: PaletteCorruption,
    pub aesthetic_mode: AestheticMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlitchLevel {
    Severe,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlitchIntensity {
    pub level: GlitchLevel,
    pub chromatic_aberration: f64,
    pub ui_noise: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractureLevel {
    Critical,
    Severe,
    Moderate,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractureState {
    pub level: FractureLevel,
    pub icon_corruption: f64,
    pub visual_breaks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteLevel {
    Severe,
    Moderate,
    Low,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteCorruption {
    pub level: PaletteLevel,
    pub shift_direction: String,
    pub primary_color_override: Option<String>,
    pub secondary_color_override: Option<String>,
    pub corruption_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AestheticMode {
    Pristine,
    Unified,
    Fractured,
    Corrupted,
    Standard,
}

impl AestheticMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pristine => "pristine",
            Self::Unified => "unified",
            Self::Fractured => "fractured",
            Self::Corrupted => "corrupted",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for AestheticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direction offered to the player this week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicDirection {
    pub id: u64,
    pub handle: String,
    pub title: String,
    pub narrative_hook: String,
    pub description: String,
    pub global_modifiers: BTreeMap<String, serde_json::Value>,
    pub tags: Vec<String>,
    pub recommendation_level: u8,
}

impl StrategicDirection {
    #[must_use]
    pub fn from_item(item: &StrategicDirectionItem, recommendation_level: u8) -> Self {
        Self {
            id: item.id,
            handle: item.handle.clone(),
            title: item.title.clone(),
            narrative_hook: item.narrative_hook.clone(),
            description: item.description.clone(),
            global_modifiers: item.global_modifiers.clone(),
            tags: item.tags.clone(),
            recommendation_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicDirections {
    pub available_directions: Vec<StrategicDirection>,
    pub count: usize,
    pub selection_required: bool,
    pub message: String,
}

impl StrategicDirections {
    #[must_use]
    pub fn new(available_directions: Vec<StrategicDirection>, message: impl Into<String>) -> Self {
        Self {
            count: available_directions.len(),
            available_directions,
            selection_required: true,
            message: message.into(),
        }
    }

    /// Handles in presentation order.
    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.available_directions
            .iter()
            .map(|direction| direction.handle.as_str())
    }
}
