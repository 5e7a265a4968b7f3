//! Stats provider abstraction
//!
//! Samplers only ever talk to a [`StatsSource`], passed in explicitly. The
//! driver-backed implementation lives behind the `mongo` feature; the
//! in-memory one is always available.

use crate::error::StatsError;
use crate::types::{CollectionStats, DatabaseEntry, DatabaseStats};

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::MemoryStatsSource;
#[cfg(feature = "mongo")]
pub use mongo::MongoStatsSource;

pub type StatsResult<T> = std::result::Result<T, StatsError>;

/// Read-only access to the storage statistics of a deployment.
///
/// Every call blocks until the provider answers. A reply that arrives but
/// does not report success must be returned as an error, so callers only
/// have to look at the `Result`.
pub trait StatsSource {
    /// All databases, in provider order.
    fn list_databases(&self) -> StatsResult<Vec<DatabaseEntry>>;

    /// Collection names of one database.
    fn list_collections(&self, database: &str) -> StatsResult<Vec<String>>;

    fn collection_stats(&self, database: &str, collection: &str) -> StatsResult<CollectionStats>;

    fn database_stats(&self, database: &str) -> StatsResult<DatabaseStats>;

    /// Version string of the server the source is connected to.
    fn server_version(&self) -> StatsResult<String>;
}
