/// Name used for the binary and in log output
pub const APP_NAME: &str = "cadence";

/// Prefix of environment variables read into the settings
pub const ENV_PREFIX: &str = "CADENCE";

/// Optional configuration file, overridden by environment variables
pub const CONFIG_FILE_STEM: &str = "config";
pub const CONFIG_FILE_NAME: &str = const_str::concat!(CONFIG_FILE_STEM, ".toml");

/// Result cap applied when a caller does not supply one
pub const DEFAULT_LIMIT: u16 = 100;

/// Window boundaries are inclusive unless configured otherwise
pub const DEFAULT_INCLUSIVE: bool = true;

/// Consecutive empty periods tolerated before a rule is treated as exhausted
pub const MAX_EMPTY_PERIODS: u32 = 100_000;

/// Last year the generator will advance into
pub const MAX_YEAR: i32 = 9999;

/// Log filter used until the configuration is read
pub const DEFAULT_LOG_LEVEL: &str = "warn";
