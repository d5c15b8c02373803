use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// Root configuration structure, deserialized from `.address-expandr/config.toml`.
///
/// Every section is optional; missing sections and keys fall back to the
/// built-in defaults (Berlin-Adlershof, `12489 Berlin`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub locality: LocalityConfig,
    #[serde(default)]
    pub cleaning: CleaningConfig,
    #[serde(default)]
    pub fan_out: FanOutConfig,
    #[serde(default)]
    pub records: RecordsConfig,
}

/// Fallback locality prepended to addresses that lack a postal code.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalityConfig {
    #[serde(default = "default_postal_code")]
    pub postal_code: String,
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_postal_code() -> String {
    "12489".to_string()
}

fn default_city() -> String {
    "Berlin".to_string()
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self {
            postal_code: default_postal_code(),
            city: default_city(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleaningConfig {
    /// Repair UTF-8 text that was decoded as Windows-1252 (`StraÃŸe`).
    #[serde(default = "default_repair_mojibake")]
    pub repair_mojibake: bool,
    /// Literal substring replacements, applied in order.
    #[serde(default = "default_typos")]
    pub typos: Vec<TypoCorrection>,
}

fn default_repair_mojibake() -> bool {
    true
}

fn default_typos() -> Vec<TypoCorrection> {
    vec![TypoCorrection::new("Chausee", "Chaussee")]
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            repair_mojibake: default_repair_mojibake(),
            typos: default_typos(),
        }
    }
}

/// A `find → replace` pair from the typo table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypoCorrection {
    pub find: String,
    pub replace: String,
}

impl TypoCorrection {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FanOutConfig {
    /// Ranges producing more rows than this are not expanded. Unlimited
    /// when unset.
    #[serde(default)]
    pub max_records: Option<usize>,
}

/// Settings for the JSON record reader/writer used by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    #[serde(default = "default_address_field")]
    pub address_field: String,
}

fn default_address_field() -> String {
    "Adresse".to_string()
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            address_field: default_address_field(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("postal code must be exactly five ASCII digits, got {0:?}")]
    InvalidPostalCode(String),
    #[error("city must not be empty")]
    EmptyCity,
    #[error("city {city:?} contains {found:?}, which address cleaning would cut off")]
    ReservedCityCharacter { city: String, found: char },
    #[error("typo correction #{0} has an empty `find` string")]
    EmptyTypo(usize),
    #[error("fan_out.max_records must be at least 1")]
    ZeroFanOut,
    #[error("records.address_field must not be empty")]
    EmptyAddressField,
    #[error("failed to build address pattern: {0}")]
    Pattern(#[from] regex::Error),
}

const RESERVED_CITY_CHARS: [char; 4] = [',', ';', '(', '/'];

impl Config {
    /// Check the configuration and return it with the city's whitespace
    /// collapsed, so that it survives the cleaning pipeline unchanged.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let code = &self.locality.postal_code;
        if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidPostalCode(code.clone()));
        }

        let city = self
            .locality
            .city
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if city.is_empty() {
            return Err(ConfigError::EmptyCity);
        }
        if let Some(found) = city.chars().find(|c| RESERVED_CITY_CHARS.contains(c)) {
            return Err(ConfigError::ReservedCityCharacter { city, found });
        }
        self.locality.city = city;

        if let Some(idx) = self.cleaning.typos.iter().position(|t| t.find.is_empty()) {
            return Err(ConfigError::EmptyTypo(idx + 1));
        }

        if self.fan_out.max_records == Some(0) {
            return Err(ConfigError::ZeroFanOut);
        }

        if self.records.address_field.trim().is_empty() {
            return Err(ConfigError::EmptyAddressField);
        }

        Ok(self)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<working_dir>/.address-expandr/config.toml`
/// 3. `~/.config/address-expandr/config.toml`
/// 4. Built-in [`Config::default`]
///
/// The result is always [validated](Config::validated).
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    let config = match find_config_file(working_dir, config_override) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => {
            tracing::debug!("no config file found, using built-in defaults");
            Config::default()
        }
    };

    Ok(config.validated()?)
}

fn find_config_file(working_dir: &Path, config_override: Option<&Path>) -> Option<std::path::PathBuf> {
    if let Some(path) = config_override {
        return Some(path.to_path_buf());
    }

    let project_config = working_dir.join(".address-expandr").join("config.toml");
    if project_config.exists() {
        return Some(project_config);
    }

    dirs::home_dir()
        .map(|home| {
            home.join(".config")
                .join("address-expandr")
                .join("config.toml")
        })
        .filter(|path| path.exists())
}
