//! Raw stats records returned by a [`StatsSource`] and the capacity figures
//! derived from them.
//!
//! Providers omit numeric fields for empty or freshly created namespaces, so
//! every raw figure is an `Option<u64>`. Absence is read as zero by the
//! accessors below, never while decoding.
//!
//! [`StatsSource`]: crate::source::StatsSource

use serde::{Deserialize, Serialize};

/// Database names that hold cluster internals and are never accounted.
pub const RESERVED_DATABASES: [&str; 3] = ["admin", "local", "config"];

/// Namespace prefix of internal metadata collections.
pub const SYSTEM_COLLECTION_PREFIX: &str = "system.";

pub fn is_reserved_database(name: &str) -> bool {
    RESERVED_DATABASES.contains(&name)
}

pub fn is_system_collection(name: &str) -> bool {
    name.starts_with(SYSTEM_COLLECTION_PREFIX)
}

/// One element of the "list databases" reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub name: String,
}

impl DatabaseEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Aggregate statistics of one database (`dbStats`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub name: String,
    pub data_size: Option<u64>,
    pub index_size: Option<u64>,
    pub storage_size: Option<u64>,
}

impl DatabaseStats {
    pub fn new(name: impl Into<String>, data_size: u64, index_size: u64, storage_size: u64) -> Self {
        Self {
            name: name.into(),
            data_size: Some(data_size),
            index_size: Some(index_size),
            storage_size: Some(storage_size),
        }
    }

    pub fn capacity(&self) -> Capacity {
        Capacity {
            data_bytes: self.data_size.unwrap_or(0),
            index_bytes: self.index_size.unwrap_or(0),
            storage_bytes: self.storage_size.unwrap_or(0),
        }
    }
}

/// Statistics of one collection (`collStats`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub database: String,
    pub collection: String,
    pub count: Option<u64>,
    pub size: Option<u64>,
    pub total_index_size: Option<u64>,
    pub storage_size: Option<u64>,
}

impl CollectionStats {
    pub fn new(
        database: impl Into<String>,
        collection: impl Into<String>,
        count: u64,
        size: u64,
        total_index_size: u64,
        storage_size: u64,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            count: Some(count),
            size: Some(size),
            total_index_size: Some(total_index_size),
            storage_size: Some(storage_size),
        }
    }

    pub fn document_count(&self) -> u64 {
        self.count.unwrap_or(0)
    }

    pub fn capacity(&self) -> Capacity {
        Capacity {
            data_bytes: self.size.unwrap_or(0),
            index_bytes: self.total_index_size.unwrap_or(0),
            storage_bytes: self.storage_size.unwrap_or(0),
        }
    }
}

/// Data, index and storage volumes of a collection, a database or a sum of
/// databases.
///
/// Sums saturate at `u64::MAX` so an oversized figure stays above any
/// threshold.
///
/// Logical and physical totals are derived on every call:
///
/// ```rust
/// use mongo_capacity::Capacity;
///
/// let capacity = Capacity::new(100, 10, 120);
/// assert_eq!(capacity.logical_total(), 110);
/// assert_eq!(capacity.physical_total(), 130);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub data_bytes: u64,
    pub index_bytes: u64,
    pub storage_bytes: u64,
}

impl Capacity {
    pub const fn new(data_bytes: u64, index_bytes: u64, storage_bytes: u64) -> Self {
        Self {
            data_bytes,
            index_bytes,
            storage_bytes,
        }
    }

    /// Data plus index bytes, independent of on-disk compression.
    pub const fn logical_total(&self) -> u64 {
        self.data_bytes.saturating_add(self.index_bytes)
    }

    /// Allocated storage plus index bytes.
    pub const fn physical_total(&self) -> u64 {
        self.storage_bytes.saturating_add(self.index_bytes)
    }

    /// Add another volume field by field.
    pub fn accumulate(&mut self, other: Capacity) {
        self.data_bytes = self.data_bytes.saturating_add(other.data_bytes);
        self.index_bytes = self.index_bytes.saturating_add(other.index_bytes);
        self.storage_bytes = self.storage_bytes.saturating_add(other.storage_bytes);
    }
}

/// Counters for one collection scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub databases_scanned: u64,
    pub databases_skipped: u64,
    pub collections_sampled: u64,
    pub collections_skipped: u64,
    pub lines_emitted: u64,
}
