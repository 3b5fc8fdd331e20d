//! Database handle contract
//!
//! The registry never looks inside a database. It only needs to construct
//! one from a back-reference and a name, then store and hand it out.

use super::Registry;
use std::sync::{Arc, Weak};

/// A named logical database owned by a [`Registry`].
///
/// `open` runs while the registry holds the write lock for the name's shard,
/// so implementations must not call back into the registry from it.
pub trait DatabaseHandle: Send + Sync + Sized + 'static {
    /// Construct the handle for `name`, bound to the registry that owns it.
    fn open(registry: Weak<Registry<Self>>, name: &str) -> Self;
}

/// Default handle: carries its name and a back-reference, nothing else.
/// Collections and documents live in the query engine layered on top.
#[derive(Debug)]
pub struct Database {
    name: String,
    registry: Weak<Registry<Database>>,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning registry, or `None` once it has been dropped.
    pub fn registry(&self) -> Option<Arc<Registry<Database>>> {
        self.registry.upgrade()
    }
}

impl DatabaseHandle for Database {
    fn open(registry: Weak<Registry<Self>>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            registry,
        }
    }
}
