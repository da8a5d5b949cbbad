//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Collect log and storage settings in one value.
//! - Read overrides from `THYME_*` environment variables.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Missing `db_path` means an in-memory database.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "THYME_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "THYME_LOG_DIR";
pub const ENV_DB_PATH: &str = "THYME_DB_PATH";

/// Settings consumed by `init_logging` and `db::open_db`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    /// SQLite file path. `None` keeps data in memory.
    pub db_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl CoreConfig {
    /// Builds config from process environment over defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup over defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        config.db_path = read(ENV_DB_PATH).map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults_and_ignores_blanks() {
        let env = HashMap::from([
            (ENV_LOG_LEVEL, "warn".to_string()),
            (ENV_LOG_DIR, "   ".to_string()),
            (ENV_DB_PATH, "/tmp/thyme.sqlite3".to_string()),
        ]);
        let config = CoreConfig::from_lookup(|key| env.get(key).cloned());

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/thyme.sqlite3")));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: CoreConfig = serde_json::from_str(r#"{"db_path":"projects.db"}"#).unwrap();
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.db_path, Some(PathBuf::from("projects.db")));
    }
}
