//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sprig/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use crossterm::style::Color;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SprigConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub max_depth: Option<usize>,
    pub show_hidden: Option<bool>,
    pub dirs_first: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StyleConfig {
    pub highlight: Option<String>,
}

/// Flags given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub max_depth: Option<usize>,
    pub show_hidden: bool,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_HIGHLIGHT: Color = Color::Yellow;
pub const DEFAULT_DIRS_FIRST: bool = true;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` = unlimited.
    pub max_depth: Option<usize>,
    pub show_hidden: bool,
    pub dirs_first: bool,
    pub highlight: Color,
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

/// Returns `~/.sprig`, where the config file and the default log live.
pub fn sprig_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sprig"))
}

/// Returns the path to `~/.sprig/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    sprig_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.sprig/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SprigConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SprigConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SprigConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SprigConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SprigConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SprigConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# sprig configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# max_depth = 8          # Or SPRIG_MAX_DEPTH / --max-depth. Unlimited if unset.
# show_hidden = false    # Or SPRIG_SHOW_HIDDEN=1 / --all
# dirs_first = true

# [style]
# highlight = "yellow"   # Any crossterm color name, e.g. "cyan", "dark_green"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SprigConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &SprigConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Max depth: CLI → env → config → unlimited
    let max_depth = cli
        .max_depth
        .or_else(|| env("SPRIG_MAX_DEPTH").and_then(|v| parse_env_depth(&v)))
        .or(config.general.max_depth);

    // Hidden files: CLI flag can only turn them on
    let show_hidden = cli.show_hidden
        || env("SPRIG_SHOW_HIDDEN")
            .map(|v| parse_env_bool(&v))
            .or(config.general.show_hidden)
            .unwrap_or(false);

    let highlight = config
        .style
        .highlight
        .as_deref()
        .map(parse_color)
        .unwrap_or(DEFAULT_HIGHLIGHT);

    ResolvedConfig {
        max_depth,
        show_hidden,
        dirs_first: config.general.dirs_first.unwrap_or(DEFAULT_DIRS_FIRST),
        highlight,
    }
}

fn parse_env_depth(value: &str) -> Option<usize> {
    match value.trim().parse() {
        Ok(depth) => Some(depth),
        Err(e) => {
            warn!("Ignoring SPRIG_MAX_DEPTH={:?}: {}", value, e);
            None
        }
    }
}

fn parse_env_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_color(name: &str) -> Color {
    Color::try_from(name).unwrap_or_else(|()| {
        warn!("Unknown highlight color {:?}, using default", name);
        DEFAULT_HIGHLIGHT
    })
}
