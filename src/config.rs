//! Compositor configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user config file; only the keys being changed need to be
//! present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [fonts]
//! dir = "assets/fonts"      # Directory holding the bundled font families
//! system_dirs = ["/usr/share/fonts/truetype/dejavu", "/usr/share/fonts/TTF", ...]
//!
//! [fonts.primary]           # First family tried for each weight
//! regular = "DejaVuSans.ttf"
//! bold = "DejaVuSans-Bold.ttf"
//! semibold = "DejaVuSans-Bold.ttf"
//!
//! [fonts.secondary]         # Second family tried for each weight
//! regular = "Inter-Regular.ttf"
//! bold = "Inter-Bold.ttf"
//! semibold = "Inter-SemiBold.ttf"
//!
//! [fonts.system]            # Font file names searched in system_dirs
//! regular = ["Arial.ttf", "arial.ttf", "DejaVuSans.ttf", "Helvetica.ttf"]
//! bold = ["Arial Bold.ttf", "arialbd.ttf", "DejaVuSans-Bold.ttf"]
//!
//! [fetch]
//! timeout_secs = 30         # Bound on each remote product/logo fetch
//!
//! [output]
//! jpeg_quality = 95         # Quality for JPEG exports (1-100)
//!
//! [processing]
//! max_processes = 4         # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Compositor configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Font families and the system fallback search.
    pub fonts: FontsConfig,
    /// Remote asset fetching.
    pub fetch: FetchConfig,
    /// Export encoding settings.
    pub output: OutputConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl CompositorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One file name per font weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontFamily {
    pub regular: String,
    pub bold: String,
    pub semibold: String,
}

/// System font names to try, per weight. Semibold uses the bold list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemFonts {
    pub regular: Vec<String>,
    pub bold: Vec<String>,
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self {
            regular: ["Arial.ttf", "arial.ttf", "DejaVuSans.ttf", "Helvetica.ttf"]
                .map(String::from)
                .to_vec(),
            bold: ["Arial Bold.ttf", "arialbd.ttf", "DejaVuSans-Bold.ttf"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Font loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Directory holding the primary and secondary families.
    pub dir: PathBuf,
    pub primary: FontFamily,
    pub secondary: FontFamily,
    pub system: SystemFonts,
    /// Directories searched for the system font names, in order.
    pub system_dirs: Vec<PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets/fonts"),
            primary: FontFamily {
                regular: "DejaVuSans.ttf".to_string(),
                bold: "DejaVuSans-Bold.ttf".to_string(),
                // DejaVu has no semibold cut
                semibold: "DejaVuSans-Bold.ttf".to_string(),
            },
            secondary: FontFamily {
                regular: "Inter-Regular.ttf".to_string(),
                bold: "Inter-Bold.ttf".to_string(),
                semibold: "Inter-SemiBold.ttf".to_string(),
            },
            system: SystemFonts::default(),
            system_dirs: [
                "/usr/share/fonts/truetype/dejavu",
                "/usr/share/fonts/dejavu",
                "/usr/share/fonts/TTF",
                "/usr/share/fonts/truetype/msttcorefonts",
                "/Library/Fonts",
                "/System/Library/Fonts/Supplemental",
                "C:\\Windows\\Fonts",
            ]
            .map(PathBuf::from)
            .to_vec(),
        }
    }
}

/// Remote asset fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Export encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG encoding quality (1 = worst, 100 = best). PNG is lossless.
    pub jpeg_quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

/// Parallel batch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of compositions run at once by `batch`.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CompositorConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CompositorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CompositorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<CompositorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Ad Compositor Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
# Each weight walks a fallback chain:
#   primary family -> secondary family -> system fonts -> built-in bitmap font
# Semibold falls back to the bold face when only the built-in font is left.
[fonts]
# Directory holding the primary and secondary family files.
dir = "assets/fonts"

# Directories searched for the [fonts.system] names, in order.
system_dirs = [
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
]

[fonts.primary]
regular = "DejaVuSans.ttf"
bold = "DejaVuSans-Bold.ttf"
semibold = "DejaVuSans-Bold.ttf"

[fonts.secondary]
regular = "Inter-Regular.ttf"
bold = "Inter-Bold.ttf"
semibold = "Inter-SemiBold.ttf"

[fonts.system]
regular = ["Arial.ttf", "arial.ttf", "DejaVuSans.ttf", "Helvetica.ttf"]
bold = ["Arial Bold.ttf", "arialbd.ttf", "DejaVuSans-Bold.ttf"]

# ---------------------------------------------------------------------------
# Remote assets
# ---------------------------------------------------------------------------
[fetch]
# Timeout for each product or logo download, in seconds. No retries.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best). PNG output is lossless.
jpeg_quality = 95

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum compositions run in parallel by `batch`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
