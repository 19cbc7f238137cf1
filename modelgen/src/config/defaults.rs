//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Default destination directory
pub const DIR: &str = ".";

/// Whether generated models carry a cache by default
pub const CACHE: bool = false;

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "modelgen";

/// Prefix of configuration environment variables (`MODELGEN_DIR`, ...)
pub const ENV_PREFIX: &str = "MODELGEN";
