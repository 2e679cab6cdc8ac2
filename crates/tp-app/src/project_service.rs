//! Configuration loading and validation for front ends.

use std::path::Path;

use tp_project::{PlantConfig, WeatherSeries, collect_violations, load_config, load_config_unchecked};

use crate::error::{AppError, AppResult};

/// Load a plant configuration, validating it unless `validate` is false.
pub fn load_plant_config(path: &Path, validate: bool) -> AppResult<PlantConfig> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    let config = if validate {
        load_config(path)?
    } else {
        load_config_unchecked(path)?
    };
    Ok(config)
}

/// Every range violation in `config`, one message per field.
pub fn validation_messages(config: &PlantConfig) -> Vec<String> {
    collect_violations(config).iter().map(ToString::to_string).collect()
}

pub fn load_weather(path: &Path) -> AppResult<WeatherSeries> {
    Ok(WeatherSeries::load(path)?)
}
