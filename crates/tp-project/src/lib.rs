//! tp-project: plant configuration files, validation and weather input.

pub mod legacy;
pub mod schema;
pub mod validate;
pub mod weather;

use std::path::Path;

pub use legacy::LegacyConfig;
pub use schema::*;
pub use validate::{ValidationError, collect_violations, validate_config};
pub use weather::{WeatherPoint, WeatherSeries};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported config format: {what}")]
    Format { what: String },

    #[error("Weather data error: {what}")]
    Weather { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ProjectError::Format {
                what: format!("{} (expected .yaml, .yml or .json)", path.display()),
            }),
        }
    }
}

/// Parse without validating. Flat legacy documents are upgraded.
pub fn parse_config(content: &str, format: ConfigFormat) -> ProjectResult<PlantConfig> {
    let value: serde_json::Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    if legacy::is_legacy(&value) {
        let old: LegacyConfig = serde_json::from_value(value)?;
        return Ok(old.into());
    }
    Ok(serde_json::from_value(value)?)
}

/// Load without validating.
pub fn load_config_unchecked(path: &Path) -> ProjectResult<PlantConfig> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, format)
}

pub fn load_config(path: &Path) -> ProjectResult<PlantConfig> {
    let config = load_config_unchecked(path)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &PlantConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = match ConfigFormat::from_path(path)? {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}
