//! Fracture Briefing Engine
//!
//! Platform-agnostic core logic for the weekly briefing phase of Fracture.
//! This crate evaluates content conditions against a game-state snapshot and
//! composes the briefing packet without any UI or storage dependencies.

pub mod briefing;
pub mod campaign;
pub mod condition;
pub mod config;
pub mod constants;
pub mod data;
pub mod state;

use anyhow::Context;
use chrono::{DateTime, Utc};

// Re-export commonly used types
pub use briefing::{
    AdvisorReport, AestheticMode, BriefingCompositor, BriefingPacket, FractureLevel, FractureState,
    GlitchIntensity, GlitchLevel, PaletteCorruption, PaletteLevel, RecommendationSource,
    RngRecommendations, StrategicDirection, StrategicDirections, VisualManifest, format_timestamp,
};
pub use campaign::{Archetypes, CampaignError, DemographicArchetype, PartyArchetype, initial_state};
pub use condition::{ConditionError, ConditionEvaluator, OperatorMatching, evaluate_condition};
pub use config::{AestheticConfig, BriefingConfig, ConfigError, Tier, TierTable, VisualConfig};
pub use data::{AdvisorItem, BriefingCatalog, CatalogError, Priority, StrategicDirectionItem};
pub use state::{Demographic, GameState, Metric, PartyStats, StatTable, StatValue};

/// Configuration name under which [`BriefingEngine::from_loader`] looks up
/// the briefing configuration.
pub const BRIEFING_CONFIG: &str = "briefing";

/// Trait for abstracting content loading operations
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the advisor and strategic-direction catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<BriefingCatalog, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Briefing engine: a compositor bound to a content source
pub struct BriefingEngine<L>
where
    L: CatalogLoader,
{
    loader: L,
    compositor: BriefingCompositor,
}

impl<L> BriefingEngine<L>
where
    L: CatalogLoader,
{
    /// Create an engine with the default configuration
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, BriefingConfig::default())
    }

    pub const fn with_config(loader: L, config: BriefingConfig) -> Self {
        Self {
            loader,
            compositor: BriefingCompositor::new(config),
        }
    }

    /// Create an engine whose configuration comes from the loader
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or fails validation.
    pub fn from_loader(loader: L) -> anyhow::Result<Self> {
        let config: BriefingConfig = loader
            .load_config(BRIEFING_CONFIG)
            .context("loading briefing configuration")?;
        config
            .validate()
            .context("validating briefing configuration")?;
        Ok(Self::with_config(loader, config))
    }

    #[must_use]
    pub const fn compositor(&self) -> &BriefingCompositor {
        &self.compositor
    }

    #[must_use]
    pub const fn config(&self) -> &BriefingConfig {
        self.compositor.config()
    }

    /// Generate a briefing packet from a freshly loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn generate_briefing<S>(
        &self,
        state: &GameState,
        recommendations: &mut S,
        issued_at: DateTime<Utc>,
    ) -> Result<BriefingPacket, L::Error>
    where
        S: RecommendationSource + ?Sized,
    {
        let catalog = self.loader.load_catalog()?;
        Ok(self
            .compositor
            .generate_briefing(state, &catalog, recommendations, issued_at))
    }

    /// Generate a briefing with recommendation levels drawn from `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn generate_seeded(
        &self,
        state: &GameState,
        seed: u64,
        issued_at: DateTime<Utc>,
    ) -> Result<BriefingPacket, L::Error> {
        let mut recommendations = RngRecommendations::seeded(seed);
        self.generate_briefing(state, &mut recommendations, issued_at)
    }
}
