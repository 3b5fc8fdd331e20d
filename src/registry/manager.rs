use crate::config::Config;
use crate::error::{RegistryError, Result};
use crate::registry::database::{Database, DatabaseHandle};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Process-local registry of named databases.
///
/// Handles are created lazily on first request and live as long as the
/// registry. Every request for a name returns the same `Arc`.
pub struct Registry<D: DatabaseHandle = Database> {
    databases: DashMap<String, Arc<D>>,
    default_database: Option<String>,
    created_at: DateTime<Utc>,
    self_ref: Weak<Registry<D>>,
}

/// Point-in-time view of a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub databases: Vec<String>,
    pub master: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_database: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl<D: DatabaseHandle> Registry<D> {
    pub fn new() -> Arc<Self> {
        Self::build(None)
    }

    /// Create a registry with the configured default database name, then
    /// create every configured preload database.
    pub fn with_config(config: &Config) -> Result<Arc<Self>> {
        let registry = Self::build(config.default_database.clone());

        for name in &config.preload_databases {
            registry.get_database(name)?;
        }

        if !config.preload_databases.is_empty() {
            info!(
                "Preloaded {} database(s): {:?}",
                config.preload_databases.len(),
                config.preload_databases
            );
        }

        Ok(registry)
    }

    fn build(default_database: Option<String>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            databases: DashMap::new(),
            default_database,
            created_at: Utc::now(),
            self_ref: self_ref.clone(),
        })
    }

    /// Sorted names of every database created so far.
    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .databases
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Get the database named `name`, creating it on first use.
    ///
    /// Concurrent first-time callers for the same name all receive the one
    /// handle constructed under the shard lock.
    pub fn get_database(&self, name: &str) -> Result<Arc<D>> {
        validate_name(name)?;

        if let Some(entry) = self.databases.get(name) {
            debug!("Reusing database handle: {}", name);
            return Ok(Arc::clone(entry.value()));
        }

        let entry = self
            .databases
            .entry(name.to_string())
            .or_insert_with(|| {
                info!("Created database: {}", name);
                Arc::new(D::open(self.self_ref.clone(), name))
            });

        Ok(Arc::clone(entry.value()))
    }

    /// Always `true`. There is no primary/replica topology in memory; this
    /// exists so callers written against a replicated server keep working.
    pub fn get_master(&self) -> bool {
        true
    }

    pub fn default_database_name(&self) -> Option<&str> {
        self.default_database.as_deref()
    }

    pub fn get_default_database(&self) -> Result<Arc<D>> {
        match self.default_database.as_deref() {
            Some(name) => self.get_database(name),
            None => Err(RegistryError::invalid_argument(
                "no default database configured",
            )),
        }
    }

    /// Whether `name` has been created. Never creates.
    pub fn contains(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            databases: self.database_names(),
            master: self.get_master(),
            default_database: self.default_database.clone(),
            created_at: self.created_at,
        }
    }
}

impl<D: DatabaseHandle> fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("databases", &self.database_names())
            .field("default_database", &self.default_database)
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        warn!("Rejected empty database name");
        return Err(RegistryError::invalid_argument(
            "database name must not be empty",
        ));
    }
    Ok(())
}
