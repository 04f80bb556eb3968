// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::ModuleRef;
use crate::config::consts::{
    DEFAULT_MAX_MODULE_SIZE, DEFAULT_OUTPUT_DIR, DEFAULT_PROGRESS_INTERVAL_MS, MAX_FUEL_LEVEL,
    MIN_FUEL_LEVEL,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for the toolbox.
///
/// Loaded from YAML or TOML; the extension of the file decides which.
///
/// # Fields
/// * `modules` - Where the Ghostscript and pdfcpu WASI builds live
/// * `wasm` - Runtime limits (optional)
/// * `status` - Status/progress forwarding options (optional)
/// * `output_dir` - Directory artifacts are written to (optional, defaults to `out`)
///
/// # Example
/// ```yaml
/// modules:
///   ghostscript: assets/gs.wasm
///   pdfcpu: assets/pdfcpu.wasm
/// wasm:
///   max_module_size: 67108864
///   fuel:
///     limit: 20000000000
/// status:
///   progress_interval_ms: 30
/// output_dir: out
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub modules: ModuleSources,
    #[serde(default)]
    pub wasm: WasmConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Config {
    /// Configuration with default limits for the two given module files.
    pub fn for_modules(ghostscript: impl Into<PathBuf>, pdfcpu: impl Into<PathBuf>) -> Self {
        Self {
            modules: ModuleSources {
                ghostscript: ghostscript.into(),
                pdfcpu: pdfcpu.into(),
            },
            wasm: WasmConfig::default(),
            status: StatusConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Paths of the WASI binaries, one per [`ModuleRef`].
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSources {
    pub ghostscript: PathBuf,
    pub pdfcpu: PathBuf,
}

impl ModuleSources {
    pub fn path_for(&self, module: ModuleRef) -> &Path {
        match module {
            ModuleRef::Ghostscript => &self.ghostscript,
            ModuleRef::Pdfcpu => &self.pdfcpu,
        }
    }
}

/// WASM runtime options.
///
/// # Fields
/// * `fuel` - Optional instruction limit per execution
/// * `max_module_size` - Largest module file accepted, in bytes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
    pub max_module_size: Option<usize>,
}

impl WasmConfig {
    pub fn get_max_module_size(&self) -> usize {
        self.max_module_size.unwrap_or(DEFAULT_MAX_MODULE_SIZE)
    }
}

/// Fuel consumption configuration for WASM execution.
///
/// Without a `limit` the runtime does not meter fuel at all and a hung
/// module runs until it exits. With a limit, the value is clamped into
/// `[minimum, maximum]`.
///
/// # Example
/// ```yaml
/// fuel:
///   limit: 20000000000
///   minimum: 1000000
///   maximum: 50000000000
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuelConfig {
    pub limit: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the minimum fuel level, using built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Validate and clamp a fuel level to configured bounds.
    ///
    /// # Example
    /// ```
    /// use pdfwasm::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// let fuel = config.validate_and_clamp(100_000_000_000); // Too high
    /// assert_eq!(fuel, 50_000_000_000); // Clamped to maximum
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        let min = self.get_minimum();
        let max = self.get_maximum();

        if requested < min || requested > max {
            tracing::warn!(
                requested,
                min,
                max,
                "Configured fuel limit out of bounds, clamping"
            );
        }
        requested.clamp(min, max)
    }

    /// The per-execution fuel limit, or `None` when metering is off.
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.map(|limit| self.validate_and_clamp(limit))
    }
}

/// Status forwarding options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusConfig {
    pub progress_interval_ms: Option<u64>,
}

impl StatusConfig {
    /// Minimum spacing between forwarded progress updates.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(
            self.progress_interval_ms
                .unwrap_or(DEFAULT_PROGRESS_INTERVAL_MS),
        )
    }
}

/// Load a config from a YAML or TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Check a loaded config for values that would only fail later.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    for module in ModuleRef::ALL {
        if config.modules.path_for(module).as_os_str().is_empty() {
            problems.push(format!("Module path for '{}' is empty", module));
        }
    }

    let fuel = &config.wasm.fuel;
    if fuel.get_minimum() > fuel.get_maximum() {
        problems.push(format!(
            "Fuel minimum {} exceeds maximum {}",
            fuel.get_minimum(),
            fuel.get_maximum()
        ));
    }

    if config.wasm.get_max_module_size() == 0 {
        problems.push("max_module_size must be greater than zero".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Load and validate a config file.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(problems) = validate_config(&cfg) {
        return Err(ConfigError::Invalid(problems.join("\n")));
    }

    Ok(cfg)
}
