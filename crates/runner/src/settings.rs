//! TOML run configuration files.
//!
//! Any field of [`EvolutionConfig`] may be given; missing fields keep their
//! defaults.
//!
//! ```toml
//! population_size = 64
//! generations_count = 2000
//! mutation_factor = 0.2
//! crossover = "ox"
//! breeding_pool = "sqrt"
//! replacement = "elitist"
//! seed = 7
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;
use tsp_ga_core::EvolutionConfig;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Parses a configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EvolutionConfig, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Reads a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<EvolutionConfig, SettingsError> {
    let content = fs::read_to_string(path.as_ref())?;
    log::debug!("read configuration from {}", path.as_ref().display());
    parse_config(&content)
}
