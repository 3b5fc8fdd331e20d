//! memdocdb Library
//!
//! Process-local registry of named, in-memory document databases.
//! Collections, queries and cursors live in the engine built on the
//! handles this crate hands out.

pub mod config;
pub mod error;
pub mod registry;

pub use config::Config;
pub use error::{RegistryError, Result};
pub use registry::{Database, DatabaseHandle, Invocation, Registry, RegistrySummary};
