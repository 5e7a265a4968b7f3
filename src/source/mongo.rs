//! Stats source backed by the MongoDB driver.
//!
//! The driver is async; the source owns a current-thread runtime and blocks
//! on every command so the samplers stay synchronous.

use super::{StatsResult, StatsSource};
use crate::config::Config;
use crate::error::StatsError;
use crate::types::{CollectionStats, DatabaseEntry, DatabaseStats};
use mongodb::Client;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use tokio::runtime::{Builder, Runtime};

const ADMIN_DATABASE: &str = "admin";

pub struct MongoStatsSource {
    client: Client,
    runtime: Runtime,
}

impl MongoStatsSource {
    /// Connect using the URI and application name from `config`.
    ///
    /// Connection is lazy on the driver side; an unreachable server surfaces
    /// on the first command.
    pub fn connect(config: &Config) -> StatsResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StatsError::Unavailable(format!("failed to start runtime: {e}")))?;

        let client = runtime.block_on(async {
            let mut options = ClientOptions::parse(config.uri.as_str()).await?;
            options.app_name = Some(config.app_name.clone());
            Client::with_options(options)
        })?;

        Ok(Self { client, runtime })
    }

    fn run_command(&self, database: &str, command: Document) -> StatsResult<Document> {
        let name = command_name(&command);
        let db = self.client.database(database);
        let reply = self
            .runtime
            .block_on(async move { db.run_command(command).await })?;

        if !is_ok(&reply) {
            return Err(StatsError::not_ok(name));
        }
        Ok(reply)
    }
}

impl StatsSource for MongoStatsSource {
    fn list_databases(&self) -> StatsResult<Vec<DatabaseEntry>> {
        let reply = self.run_command(ADMIN_DATABASE, doc! { "listDatabases": 1, "nameOnly": true })?;
        let databases = reply
            .get_array("databases")
            .map_err(|_| StatsError::missing_field("listDatabases", "databases"))?;

        Ok(databases
            .iter()
            .filter_map(|entry| entry.as_document())
            .filter_map(|entry| entry.get_str("name").ok())
            .map(DatabaseEntry::new)
            .collect())
    }

    fn list_collections(&self, database: &str) -> StatsResult<Vec<String>> {
        let db = self.client.database(database);
        let names = self
            .runtime
            .block_on(async move { db.list_collection_names().await })?;
        Ok(names)
    }

    fn collection_stats(&self, database: &str, collection: &str) -> StatsResult<CollectionStats> {
        let reply = self.run_command(database, doc! { "collStats": collection })?;
        Ok(collection_stats_from_reply(database, collection, &reply))
    }

    fn database_stats(&self, database: &str) -> StatsResult<DatabaseStats> {
        let reply = self.run_command(database, doc! { "dbStats": 1 })?;
        Ok(database_stats_from_reply(database, &reply))
    }

    fn server_version(&self) -> StatsResult<String> {
        let reply = self.run_command(ADMIN_DATABASE, doc! { "serverStatus": 1 })?;
        reply
            .get_str("version")
            .map(str::to_string)
            .map_err(|_| StatsError::missing_field("serverStatus", "version"))
    }
}

fn collection_stats_from_reply(database: &str, collection: &str, reply: &Document) -> CollectionStats {
    CollectionStats {
        database: database.to_string(),
        collection: collection.to_string(),
        count: get_u64(reply, "count"),
        size: get_u64(reply, "size"),
        total_index_size: get_u64(reply, "totalIndexSize"),
        storage_size: get_u64(reply, "storageSize"),
    }
}

fn database_stats_from_reply(database: &str, reply: &Document) -> DatabaseStats {
    DatabaseStats {
        name: database.to_string(),
        data_size: get_u64(reply, "dataSize"),
        index_size: get_u64(reply, "indexSize"),
        storage_size: get_u64(reply, "storageSize"),
    }
}

fn command_name(command: &Document) -> String {
    command.keys().next().cloned().unwrap_or_default()
}

/// Servers reply `ok: 1.0`, some proxies `ok: 1`.
fn is_ok(reply: &Document) -> bool {
    match reply.get("ok") {
        Some(Bson::Double(ok)) => *ok == 1.0,
        Some(Bson::Int32(ok)) => *ok == 1,
        Some(Bson::Int64(ok)) => *ok == 1,
        Some(Bson::Boolean(ok)) => *ok,
        _ => false,
    }
}

/// Read a size or count field, whatever numeric type the server chose.
///
/// Negative, non-finite and non-numeric values count as absent.
fn get_u64(reply: &Document, key: &str) -> Option<u64> {
    match reply.get(key)? {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) if v.is_finite() && *v >= 0.0 && *v <= u64::MAX as f64 => Some(*v as u64),
        _ => None,
    }
}
