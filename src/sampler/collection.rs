use super::list_included_databases;
use crate::config::CapacityThresholds;
use crate::error::Result;
use crate::report::CollectionReportLine;
use crate::source::StatsSource;
use crate::types::{ScanStats, is_system_collection};
use chrono::{DateTime, Utc};

/// Start a scan for collections over either threshold.
///
/// Databases are enumerated before this returns, so a failing listing is
/// reported here and no line is ever produced. Collections are then visited
/// lazily as the returned iterator is driven. Every line carries `now`.
pub fn sample_collections<S: StatsSource + ?Sized>(
    source: &S,
    thresholds: CapacityThresholds,
    now: DateTime<Utc>,
) -> Result<CollectionScan<'_, S>> {
    let databases = list_included_databases(source)?;

    Ok(CollectionScan {
        source,
        thresholds,
        timestamp: now,
        databases: databases.into_iter(),
        current: None,
        stats: ScanStats::default(),
    })
}

/// Lazy, sequential walk over every included collection.
pub struct CollectionScan<'a, S: ?Sized> {
    source: &'a S,
    thresholds: CapacityThresholds,
    timestamp: DateTime<Utc>,
    databases: std::vec::IntoIter<String>,
    current: Option<(String, std::vec::IntoIter<String>)>,
    stats: ScanStats,
}

impl<S: StatsSource + ?Sized> CollectionScan<'_, S> {
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn next_database(&mut self) -> Option<()> {
        loop {
            let database = self.databases.next()?;
            match self.source.list_collections(&database) {
                Ok(collections) => {
                    self.stats.databases_scanned += 1;
                    self.current = Some((database, collections.into_iter()));
                    return Some(());
                }
                Err(e) => {
                    log::warn!("Skipping database {}: {}", database, e);
                    self.stats.databases_skipped += 1;
                }
            }
        }
    }
}

impl<S: StatsSource + ?Sized> Iterator for CollectionScan<'_, S> {
    type Item = CollectionReportLine;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((database, collections)) = &mut self.current {
                for collection in collections.by_ref() {
                    if is_system_collection(&collection) {
                        continue;
                    }

                    let stats = match self.source.collection_stats(database, &collection) {
                        Ok(stats) => stats,
                        Err(e) => {
                            log::debug!("Skipping collection {}.{}: {}", database, collection, e);
                            self.stats.collections_skipped += 1;
                            continue;
                        }
                    };
                    self.stats.collections_sampled += 1;

                    let document_count = stats.document_count();
                    let capacity = stats.capacity();
                    if !self.thresholds.is_exceeded_by(document_count, &capacity) {
                        continue;
                    }

                    self.stats.lines_emitted += 1;
                    return Some(CollectionReportLine {
                        timestamp: self.timestamp,
                        database: database.clone(),
                        collection,
                        document_count,
                        capacity,
                    });
                }
                self.current = None;
            }

            self.next_database()?;
        }
    }
}
