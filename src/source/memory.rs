//! In-memory stats source.

use super::{StatsResult, StatsSource};
use crate::error::StatsError;
use crate::types::{CollectionStats, DatabaseEntry, DatabaseStats};

#[derive(Debug, Clone)]
enum Reply<T> {
    Ok(T),
    NotOk,
    Failed(String),
}

impl<T: Clone> Reply<T> {
    fn get(&self, command: &str) -> StatsResult<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::NotOk => Err(StatsError::not_ok(command)),
            Reply::Failed(message) => Err(StatsError::Unavailable(message.clone())),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryDatabase {
    name: String,
    stats: Reply<DatabaseStats>,
    collections: Vec<MemoryCollection>,
    list_failure: Option<String>,
}

impl MemoryDatabase {
    fn collections(&self) -> StatsResult<&[MemoryCollection]> {
        match &self.list_failure {
            Some(message) => Err(StatsError::Unavailable(message.clone())),
            None => Ok(&self.collections),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryCollection {
    name: String,
    stats: Reply<CollectionStats>,
}

/// Stats source backed by fixed, insertion-ordered data.
///
/// Failures can be injected per database, per collection or for the whole
/// listing, which makes it the reference source for exercising the
/// samplers without a server.
///
/// ```rust
/// use mongo_capacity::{CollectionStats, DatabaseStats, MemoryStatsSource, StatsSource};
///
/// let source = MemoryStatsSource::new()
///     .with_database(DatabaseStats::new("shop", 300, 30, 400))
///     .with_collection(CollectionStats::new("shop", "orders", 12, 300, 30, 400))
///     .with_server_version("7.0.4");
///
/// assert_eq!(source.list_collections("shop").unwrap(), vec!["orders"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsSource {
    databases: Vec<MemoryDatabase>,
    list_failure: Option<String>,
    server_version: Option<String>,
}

impl MemoryStatsSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn database_mut(&mut self, name: &str) -> &mut MemoryDatabase {
        let index = match self.databases.iter().position(|db| db.name == name) {
            Some(index) => index,
            None => {
                self.databases.push(MemoryDatabase {
                    name: name.to_string(),
                    stats: Reply::Ok(DatabaseStats {
                        name: name.to_string(),
                        ..DatabaseStats::default()
                    }),
                    collections: Vec::new(),
                    list_failure: None,
                });
                self.databases.len() - 1
            }
        };
        &mut self.databases[index]
    }

    fn set_collection(&mut self, database: &str, name: &str, stats: Reply<CollectionStats>) {
        let collections = &mut self.database_mut(database).collections;
        match collections.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.stats = stats,
            None => collections.push(MemoryCollection {
                name: name.to_string(),
                stats,
            }),
        }
    }

    /// Add a database, or replace the stats of an existing one.
    pub fn with_database(mut self, stats: DatabaseStats) -> Self {
        let name = stats.name.clone();
        self.database_mut(&name).stats = Reply::Ok(stats);
        self
    }

    /// Add a collection, creating its database if needed.
    pub fn with_collection(mut self, stats: CollectionStats) -> Self {
        let (database, name) = (stats.database.clone(), stats.collection.clone());
        self.set_collection(&database, &name, Reply::Ok(stats));
        self
    }

    /// Add a collection whose stats call errors.
    pub fn with_failing_collection(mut self, database: &str, collection: &str) -> Self {
        self.set_collection(
            database,
            collection,
            Reply::Failed(format!("collStats failed for {database}.{collection}")),
        );
        self
    }

    /// Add a collection whose stats reply does not report ok.
    pub fn with_rejected_collection(mut self, database: &str, collection: &str) -> Self {
        self.set_collection(database, collection, Reply::NotOk);
        self
    }

    /// Make the database stats call of `database` error.
    pub fn with_failing_database(mut self, database: &str) -> Self {
        self.database_mut(database).stats =
            Reply::Failed(format!("dbStats failed for {database}"));
        self
    }

    /// Make the database stats reply of `database` not report ok.
    pub fn with_rejected_database(mut self, database: &str) -> Self {
        self.database_mut(database).stats = Reply::NotOk;
        self
    }

    /// Make listing the collections of `database` error.
    pub fn with_unlistable_database(mut self, database: &str) -> Self {
        self.database_mut(database).list_failure =
            Some(format!("listCollections failed for {database}"));
        self
    }

    /// Make the database listing itself fail.
    pub fn with_failing_list(mut self, message: impl Into<String>) -> Self {
        self.list_failure = Some(message.into());
        self
    }

    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    fn database(&self, name: &str) -> StatsResult<&MemoryDatabase> {
        self.databases
            .iter()
            .find(|db| db.name == name)
            .ok_or_else(|| StatsError::Unavailable(format!("database {name} not found")))
    }
}

impl StatsSource for MemoryStatsSource {
    fn list_databases(&self) -> StatsResult<Vec<DatabaseEntry>> {
        if let Some(message) = &self.list_failure {
            return Err(StatsError::Unavailable(message.clone()));
        }
        Ok(self
            .databases
            .iter()
            .map(|db| DatabaseEntry::new(db.name.clone()))
            .collect())
    }

    fn list_collections(&self, database: &str) -> StatsResult<Vec<String>> {
        let collections = self.database(database)?.collections()?;
        Ok(collections.iter().map(|c| c.name.clone()).collect())
    }

    fn collection_stats(&self, database: &str, collection: &str) -> StatsResult<CollectionStats> {
        self.database(database)?
            .collections()?
            .iter()
            .find(|c| c.name == collection)
            .ok_or_else(|| {
                StatsError::Unavailable(format!("collection {database}.{collection} not found"))
            })?
            .stats
            .get("collStats")
    }

    fn database_stats(&self, database: &str) -> StatsResult<DatabaseStats> {
        self.database(database)?.stats.get("dbStats")
    }

    fn server_version(&self) -> StatsResult<String> {
        self.server_version
            .clone()
            .ok_or_else(|| StatsError::missing_field("serverStatus", "version"))
    }
}
