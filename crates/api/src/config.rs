//! Server configuration, read once from the environment at startup.

use std::path::PathBuf;

use stockroom_catalog::DEFAULT_ACTIVITY_CAPACITY;

pub const BIND_ENV: &str = "STOCKROOM_BIND";
pub const DB_PATH_ENV: &str = "STOCKROOM_DB_PATH";
pub const ACTIVITY_CAPACITY_ENV: &str = "STOCKROOM_ACTIVITY_CAPACITY";

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_DB_PATH: &str = "inventory_db.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub db_path: PathBuf,
    pub activity_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            let value = lookup(key)?;
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let mut config = Self::default();

        if let Some(bind) = get(BIND_ENV) {
            config.bind = bind;
        }
        if let Some(path) = get(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ACTIVITY_CAPACITY_ENV) {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.activity_capacity = n,
                _ => tracing::warn!(
                    value = %raw,
                    default = DEFAULT_ACTIVITY_CAPACITY,
                    "invalid activity capacity; using default"
                ),
            }
        }
        config
    }
}
