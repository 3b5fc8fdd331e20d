use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub default_database: Option<String>,
    pub preload_databases: Vec<String>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_database = lookup("MEMDOCDB_DEFAULT_DATABASE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let preload_str = lookup("MEMDOCDB_PRELOAD").unwrap_or_default();

        let preload_databases = preload_str
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect();

        let log_dir = lookup("LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            default_database,
            preload_databases,
            log_dir,
        })
    }
}
