use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use datagen_core::TextEncoding;
use datagen_generate::GrammarOptions;

use crate::CliError;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "datagen.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub generate: GenerateConfig,
    pub grammar: GrammarOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub hostname: String,
    pub port: u16,
    pub dbname: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 27017,
            dbname: "datagen".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub encoding: TextEncoding,
    pub preserve_database: bool,
    /// Dictionary directory; relative paths resolve against the config file.
    pub data_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load `explicit` if given, else `datagen.toml` when it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::parse(&contents).map_err(|source| CliError::Config {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(data_dir) = config.generate.data_dir.as_mut()
            && data_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            *data_dir = parent.join(&*data_dir);
        }

        tracing::debug!(event = "config_loaded", path = %path.display());
        Ok(config)
    }
}
