use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Files picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["surge.toml", "surge.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn parse<T: DeserializeOwned>(self, path: &Path, content: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|err| ConfigError::Toml {
                path: path.to_path_buf(),
                source: err,
            }),
            Self::Json => serde_json::from_str(content).map_err(|err| ConfigError::Json {
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }
}

/// Loads the explicit config file, or the first default file present.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unknown format,
/// or does not parse.
pub fn load_config(explicit: Option<&str>) -> AppResult<Option<ConfigFile>> {
    let chosen = explicit.map(Path::new).or_else(|| {
        DEFAULT_CONFIG_FILES
            .into_iter()
            .map(Path::new)
            .find(|candidate| candidate.exists())
    });
    chosen.map(load_config_file).transpose()
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let format = ConfigFormat::detect(path).ok_or_else(|| {
        AppError::config(ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        })
    })?;
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::Unreadable {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    format.parse(path, &content).map_err(AppError::config)
}
