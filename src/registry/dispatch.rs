//! Name-based access to a registry
//!
//! `registry.database("users")` and `registry.invoke("users", &[])` are
//! shorthand for `registry.get_database("users")`. `invoke` resolves the
//! symbol against the registry's own operations first and only falls back
//! to treating it as a database name when nothing matches.

use crate::error::{RegistryError, Result};
use crate::registry::database::DatabaseHandle;
use crate::registry::manager::{Registry, RegistrySummary};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Every public operation on [`Registry`]. None of these is ever treated
/// as a database name by `invoke`.
pub const DEFINED_OPERATIONS: &[&str] = &[
    "contains",
    "created_at",
    "database",
    "database_names",
    "default_database_name",
    "get_database",
    "get_default_database",
    "get_master",
    "invoke",
    "is_empty",
    "len",
    "new",
    "summary",
    "with_config",
];

/// Result of a dynamic invocation
#[derive(Debug)]
pub enum Invocation<D> {
    DatabaseNames(Vec<String>),
    Database(Arc<D>),
    Master(bool),
    Contains(bool),
    Len(usize),
    IsEmpty(bool),
    Summary(RegistrySummary),
    DefaultDatabaseName(Option<String>),
    CreatedAt(DateTime<Utc>),
}

impl<D> Invocation<D> {
    /// The database handle, if this invocation produced one.
    pub fn into_database(self) -> Option<Arc<D>> {
        match self {
            Invocation::Database(db) => Some(db),
            _ => None,
        }
    }
}

pub fn is_defined_operation(symbol: &str) -> bool {
    DEFINED_OPERATIONS.contains(&symbol)
}

impl<D: DatabaseHandle> Registry<D> {
    /// Same as [`Registry::get_database`].
    pub fn database(&self, name: &str) -> Result<Arc<D>> {
        self.get_database(name)
    }

    /// Resolve `symbol` as an operation on this registry.
    ///
    /// Defined operations take their arguments from `args`. Any other symbol
    /// is a database name: `args` are ignored and the call goes to
    /// `get_database(symbol)`.
    pub fn invoke(&self, symbol: &str, args: &[&str]) -> Result<Invocation<D>> {
        match symbol {
            "database_names" => Ok(Invocation::DatabaseNames(self.database_names())),
            "get_database" | "database" => {
                let name = required_arg(symbol, args)?;
                self.get_database(name).map(Invocation::Database)
            }
            "get_default_database" => self.get_default_database().map(Invocation::Database),
            "get_master" => Ok(Invocation::Master(self.get_master())),
            "contains" => {
                let name = required_arg(symbol, args)?;
                Ok(Invocation::Contains(self.contains(name)))
            }
            "len" => Ok(Invocation::Len(self.len())),
            "is_empty" => Ok(Invocation::IsEmpty(self.is_empty())),
            "summary" => Ok(Invocation::Summary(self.summary())),
            "default_database_name" => Ok(Invocation::DefaultDatabaseName(
                self.default_database_name().map(str::to_string),
            )),
            "created_at" => Ok(Invocation::CreatedAt(self.created_at())),
            // Lifecycle operations like `new` and `invoke` land here
            _ if is_defined_operation(symbol) => Err(RegistryError::invalid_argument(format!(
                "operation '{}' cannot be invoked by name",
                symbol
            ))),
            _ => {
                debug!("Resolving '{}' as a database name", symbol);
                self.get_database(symbol).map(Invocation::Database)
            }
        }
    }
}

fn required_arg<'a>(symbol: &str, args: &[&'a str]) -> Result<&'a str> {
    args.first().copied().ok_or_else(|| {
        RegistryError::invalid_argument(format!("'{}' requires a database name", symbol))
    })
}
