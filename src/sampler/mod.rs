//! Capacity samplers
//!
//! Both samplers start from the same database enumeration: the provider's
//! list minus the reserved `admin`, `local` and `config` databases. A failed
//! enumeration aborts the pass with [`CapacityError::Provider`]; any later
//! per-database or per-collection failure only drops that item.

use crate::error::{CapacityError, Result};
use crate::source::StatsSource;
use crate::types::is_reserved_database;

mod collection;
mod instance;

pub use collection::{CollectionScan, sample_collections};
pub use instance::sample_instance;

/// Names of the databases subject to capacity accounting, in provider order.
pub fn list_included_databases<S: StatsSource + ?Sized>(source: &S) -> Result<Vec<String>> {
    let databases = source.list_databases().map_err(CapacityError::Provider)?;

    Ok(databases
        .into_iter()
        .map(|db| db.name)
        .filter(|name| !is_reserved_database(name))
        .collect())
}
