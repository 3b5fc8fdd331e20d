//! Database Registry
//!
//! Owns every database handle in the process-local session and creates
//! them on first request. Layout:
//!
//! - `manager`: the registry itself (get-or-create, listing, liveness)
//! - `database`: the handle contract and the default handle
//! - `dispatch`: name-based shorthand over `get_database`

mod database;
mod dispatch;
mod manager;

pub use database::{Database, DatabaseHandle};
pub use dispatch::{is_defined_operation, Invocation, DEFINED_OPERATIONS};
pub use manager::{Registry, RegistrySummary};
