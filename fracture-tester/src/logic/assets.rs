use fracture_game::{Archetypes, BriefingCatalog, BriefingConfig, CatalogLoader, GameState};
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CATALOG_FILE: &str = "briefing_catalog.json";
pub const ARCHETYPES_FILE: &str = "archetypes.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AssetError> {
    let json = fs::read_to_string(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Content shipped with the game crate.
#[must_use]
pub fn default_data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fracture-game")
        .join("assets")
        .join("data")
}

/// File-backed content source.
///
/// The catalog lives in its own file; configurations are looked up as
/// `<data_dir>/<name>.json`. A missing configuration file reads as `{}` so
/// serde defaults apply.
#[derive(Debug, Clone)]
pub struct FileLoader {
    data_dir: PathBuf,
    catalog_path: PathBuf,
    config_override: Option<PathBuf>,
}

impl FileLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            catalog_path: data_dir.join(CATALOG_FILE),
            data_dir,
            config_override: None,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Read every configuration request from `path` instead of the data dir.
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_override = Some(path.into());
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read the archetype tables from `path`, or from the data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_archetypes(&self, path: Option<&Path>) -> Result<Archetypes, AssetError> {
        let path = path.map_or_else(|| self.data_dir.join(ARCHETYPES_FILE), Path::to_path_buf);
        read_json(&path)
    }

    fn config_path(&self, config_name: &str) -> PathBuf {
        self.config_override
            .clone()
            .unwrap_or_else(|| self.data_dir.join(format!("{config_name}.json")))
    }
}

impl CatalogLoader for FileLoader {
    type Error = AssetError;

    fn load_catalog(&self) -> Result<BriefingCatalog, Self::Error> {
        read_json(&self.catalog_path)
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        let path = self.config_path(config_name);
        if self.config_override.is_none() && !path.exists() {
            return serde_json::from_str("{}").map_err(|source| AssetError::Parse { path, source });
        }
        read_json(&path)
    }
}

/// Everything the scenarios read, loaded once per run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub catalog: BriefingCatalog,
    pub archetypes: Archetypes,
    pub config: BriefingConfig,
}

impl TesterAssets {
    /// Load catalog, archetypes and configuration through `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, or if the
    /// configuration fails validation.
    pub fn load(loader: &FileLoader, archetypes_path: Option<&Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let catalog = loader.load_catalog().context("loading briefing catalog")?;
        let config: BriefingConfig = loader
            .load_config(fracture_game::BRIEFING_CONFIG)
            .context("loading briefing configuration")?;
        config
            .validate()
            .context("validating briefing configuration")?;
        let archetypes = loader
            .load_archetypes(archetypes_path)
            .context("loading archetypes")?;
        debug!(
            "loaded {} advisor items, {} directions, {} parties from {}",
            catalog.advisor_items.len(),
            catalog.strategic_directions.len(),
            archetypes.parties.len(),
            loader.data_dir().display()
        );

        Ok(Self {
            catalog,
            archetypes,
            config,
        })
    }

    /// Load the content shipped with the game crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the shipped assets are missing or invalid.
    #[cfg(test)]
    pub fn load_default() -> anyhow::Result<Self> {
        Self::load(&FileLoader::new(default_data_root()), None)
    }

    /// The opening snapshot for `party_handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archetypes have no such party.
    pub fn bootstrap_state(&self, party_handle: &str) -> anyhow::Result<GameState> {
        Ok(fracture_game::initial_state(party_handle, &self.archetypes)?)
    }
}

/// Read a snapshot from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn load_state(path: &Path) -> Result<GameState, AssetError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fracture-assets-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_assets_load() {
        let assets = TesterAssets::load_default().unwrap();
        assert!(!assets.catalog.advisor_items.is_empty());
        assert!(!assets.archetypes.parties.is_empty());
        assert_eq!(assets.config, BriefingConfig::default());
        assert!(assets.bootstrap_state("unity").is_ok());
        assert!(assets.bootstrap_state("missing").is_err());
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = temp_dir("no-config");
        let loader = FileLoader::new(&dir);
        assert_eq!(loader.data_dir(), dir.as_path());
        let config: BriefingConfig = loader.load_config("briefing").unwrap();
        assert_eq!(config, BriefingConfig::default());
    }

    #[test]
    fn unreadable_catalog_reports_path() {
        let dir = temp_dir("no-catalog");
        let err = FileLoader::new(&dir).load_catalog().unwrap_err();
        assert!(matches!(err, AssetError::Read { .. }));
        assert!(err.to_string().contains(CATALOG_FILE));
    }

    #[test]
    fn malformed_state_is_a_parse_error() {
        let dir = temp_dir("bad-state");
        let path = dir.join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_state(&path), Err(AssetError::Parse { .. })));
    }
}
