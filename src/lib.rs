//! Storage-capacity sampling for MongoDB deployments.
//!
//! Two single-pass samplers read live statistics through a [`StatsSource`]:
//! [`sample_collections`] reports collections over a document-count or
//! logical-size threshold, [`sample_instance`] sums logical and physical
//! storage over all non-reserved databases.
//!
//! ```rust
//! use mongo_capacity::{
//!     CapacityThresholds, CollectionStats, DatabaseStats, MemoryStatsSource,
//!     sample_collections, sample_instance,
//! };
//!
//! let source = MemoryStatsSource::new()
//!     .with_database(DatabaseStats::new("shop", 100, 10, 120))
//!     .with_collection(CollectionStats::new("shop", "orders", 6_000_000, 100, 10, 120))
//!     .with_collection(CollectionStats::new("shop", "carts", 12, 1, 1, 1));
//!
//! let now = chrono::Utc::now();
//! let lines: Vec<_> = sample_collections(&source, CapacityThresholds::default(), now)?.collect();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].collection, "orders");
//!
//! let instance = sample_instance(&source, now)?;
//! assert_eq!(instance.physical_bytes(), 130);
//! # Ok::<(), mongo_capacity::CapacityError>(())
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod sampler;
pub mod source;
pub mod types;

pub use config::{CapacityThresholds, Config};
pub use error::{CapacityError, Result, StatsError};
pub use report::{CollectionReportLine, InstanceReportLine, ReportWriter};
pub use sampler::{CollectionScan, list_included_databases, sample_collections, sample_instance};
pub use source::{MemoryStatsSource, StatsSource};
#[cfg(feature = "mongo")]
pub use source::MongoStatsSource;
pub use types::{Capacity, CollectionStats, DatabaseEntry, DatabaseStats, ScanStats};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{CapacityThresholds, Config, Result, StatsSource};

    pub use crate::{sample_collections, sample_instance};

    pub use crate::{CollectionReportLine, InstanceReportLine, ReportWriter};

    #[cfg(feature = "mongo")]
    pub use crate::MongoStatsSource;
}
