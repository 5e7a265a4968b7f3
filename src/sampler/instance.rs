use super::list_included_databases;
use crate::error::Result;
use crate::report::InstanceReportLine;
use crate::source::StatsSource;
use crate::types::Capacity;
use chrono::{DateTime, Utc};

/// Sum data, index and storage bytes over every included database.
///
/// A database whose stats cannot be read contributes nothing. A server that
/// does not disclose its version gets an empty version string.
pub fn sample_instance<S: StatsSource + ?Sized>(
    source: &S,
    now: DateTime<Utc>,
) -> Result<InstanceReportLine> {
    let mut total = Capacity::default();

    for database in list_included_databases(source)? {
        match source.database_stats(&database) {
            Ok(stats) => total.accumulate(stats.capacity()),
            Err(e) => log::warn!("Skipping database {}: {}", database, e),
        }
    }

    let server_version = source.server_version().unwrap_or_else(|e| {
        log::warn!("Server version unavailable: {}", e);
        String::new()
    });

    Ok(InstanceReportLine {
        timestamp: now,
        capacity: total,
        server_version,
    })
}
