/// Minimum allowed fuel level when a fuel limit is configured (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (50 billion instructions) - Ghostscript on a large PDF needs a lot
pub const MAX_FUEL_LEVEL: u64 = 50_000_000_000;
/// Largest module the loader accepts (64 MB); the Ghostscript build is well under this
pub const DEFAULT_MAX_MODULE_SIZE: usize = 64 * 1024 * 1024;
/// Minimum spacing between two forwarded progress updates
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 30;
/// Where artifacts are written when neither the config nor the CLI says otherwise
pub const DEFAULT_OUTPUT_DIR: &str = "out";
/// Config file the CLI reads when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "configs/toolbox.yaml";
