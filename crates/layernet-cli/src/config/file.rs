use crate::error::{CliError, Result};
use crate::ingest::SourceSpec;
use layernet::core::io::catalog::CatalogEntry;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLayoutConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius_factor: Option<f64>,
    pub respect_pins: Option<bool>,
    pub apply_grouping: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLinksConfig {
    pub deduplicate: Option<bool>,
}

/// Contents of the TOML configuration file. Every field is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub layout: Option<FileLayoutConfig>,
    pub links: Option<FileLinksConfig>,
    /// Layer catalog file; relative paths are taken from the config file's directory.
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub layers: Vec<CatalogEntry>,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        if let (Some(catalog), Some(dir)) = (&config.catalog, path.parent()) {
            if catalog.is_relative() {
                config.catalog = Some(dir.join(catalog));
            }
        }
        Ok(config)
    }
}
