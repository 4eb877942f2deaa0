//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.placebooks/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::location::{FixedLocationProvider, LocationCapability};
use crate::core::model::Location;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlacebookConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub enabled: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fix_delay_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const APP_DIR_NAME: &str = ".placebooks";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_FIX_DELAY_MS: u64 = 1500;

// ============================================================================
// CLI overrides
// ============================================================================

/// Values from command-line flags. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub location: Option<Location>,
    pub no_location: bool,
    pub log_level: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Fixed position to report, or None when location is unavailable.
    pub location: Option<Location>,
    pub fix_delay: Duration,
}

impl ResolvedConfig {
    /// Build the location capability once, at startup.
    pub fn location_capability(&self) -> LocationCapability {
        match self.location {
            Some(location) => LocationCapability::Available(Arc::new(
                FixedLocationProvider::new(location, self.fix_delay),
            )),
            None => LocationCapability::Unavailable,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Per-user application directory: `~/.placebooks/`.
///
/// Falls back to the platform data directory, then to the working directory,
/// when there is no home directory (e.g. sandboxed mobile targets).
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(APP_DIR_NAME))
        .or_else(|| dirs::data_local_dir().map(|d| d.join("placebooks")))
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}

/// Returns the path to `~/.placebooks/config.toml`.
pub fn config_path() -> PathBuf {
    app_dir().join("config.toml")
}

/// Load config from `~/.placebooks/config.toml`.
pub fn load_config() -> Result<PlacebookConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PlacebookConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<PlacebookConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(PlacebookConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PlacebookConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Place Book Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → CLI flags.

# [general]
# data_dir = "/home/me/Documents/placebooks"   # default: ~/.placebooks
# log_level = "info"                           # error, warn, info, debug, trace

# Desktops have no GPS receiver. Configure a fixed position to enable the
# "add current location" action.
# [location]
# enabled = true
# latitude = 52.3731
# longitude = 4.8922
# fix_delay_ms = 1500
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → CLI.
pub fn resolve(config: &PlacebookConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Data dir: CLI → config → default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.general.data_dir.as_deref().map(expand_home))
        .unwrap_or_else(app_dir);

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    ResolvedConfig {
        data_dir,
        log_level,
        location: resolve_location(&config.location, cli),
        fix_delay: Duration::from_millis(
            config.location.fix_delay_ms.unwrap_or(DEFAULT_FIX_DELAY_MS),
        ),
    }
}

/// `--no-location` wins, then `--location`, then the config file.
/// The config position only counts when both coordinates are present.
fn resolve_location(config: &LocationConfig, cli: &CliOverrides) -> Option<Location> {
    if cli.no_location {
        return None;
    }
    if let Some(location) = cli.location {
        return Some(location);
    }
    if config.enabled == Some(false) {
        return None;
    }
    match (config.latitude, config.longitude) {
        (Some(lat), Some(lon)) if in_range(lat, lon) => Some(Location::new(lat, lon)),
        (Some(lat), Some(lon)) => {
            warn!("Config [location] {lat},{lon} is out of range; location disabled");
            None
        }
        (None, None) => None,
        _ => {
            warn!("Config [location] needs both latitude and longitude; location disabled");
            None
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn in_range(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Parse a `LAT,LON` pair as given to `--location`.
pub fn parse_location(s: &str) -> Result<Location, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude '{}': {e}", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude '{}': {e}", lon.trim()))?;
    if !in_range(lat, lon) {
        return Err(format!("coordinates out of range: {lat},{lon}"));
    }
    Ok(Location::new(lat, lon))
}
