//! Report lines and their tab-separated rendering.
//!
//! One record per line, no header. Timestamps are UTC with millisecond
//! precision, e.g. `2024-05-01T12:00:00.000Z`.

use crate::types::Capacity;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One oversized collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionReportLine {
    pub timestamp: DateTime<Utc>,
    pub database: String,
    pub collection: String,
    pub document_count: u64,
    pub capacity: Capacity,
}

impl CollectionReportLine {
    pub fn data_bytes(&self) -> u64 {
        self.capacity.data_bytes
    }

    pub fn index_bytes(&self) -> u64 {
        self.capacity.index_bytes
    }

    pub fn logical_total(&self) -> u64 {
        self.capacity.logical_total()
    }

    pub fn physical_total(&self) -> u64 {
        self.capacity.physical_total()
    }
}

impl fmt::Display for CollectionReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            format_timestamp(&self.timestamp),
            self.database,
            self.collection,
            self.document_count,
            self.data_bytes(),
            self.index_bytes(),
            self.logical_total(),
            self.physical_total()
        )
    }
}

/// Totals over every accounted database of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceReportLine {
    pub timestamp: DateTime<Utc>,
    /// Summed data, index and storage bytes.
    pub capacity: Capacity,
    /// Empty when the server did not disclose it.
    pub server_version: String,
}

impl InstanceReportLine {
    pub fn data_bytes(&self) -> u64 {
        self.capacity.data_bytes
    }

    pub fn index_bytes(&self) -> u64 {
        self.capacity.index_bytes
    }

    pub fn logical_total(&self) -> u64 {
        self.capacity.logical_total()
    }

    /// Sum of storage plus index bytes over all accounted databases.
    pub fn physical_bytes(&self) -> u64 {
        self.capacity.physical_total()
    }
}

impl fmt::Display for InstanceReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            format_timestamp(&self.timestamp),
            self.data_bytes(),
            self.index_bytes(),
            self.logical_total(),
            self.physical_bytes(),
            self.server_version
        )
    }
}

/// Writes report lines, one per line, to any sink.
pub struct ReportWriter<W: Write> {
    out: W,
    lines_written: u64,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines_written: 0,
        }
    }

    pub fn write_line(&mut self, line: &impl fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write every line of `lines`, returning how many were written.
    pub fn write_all<L, I>(&mut self, lines: I) -> io::Result<u64>
    where
        L: fmt::Display,
        I: IntoIterator<Item = L>,
    {
        let before = self.lines_written;
        for line in lines {
            self.write_line(&line)?;
        }
        Ok(self.lines_written - before)
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(&timestamp()), "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_collection_line() {
        let line = CollectionReportLine {
            timestamp: timestamp(),
            database: "shop".into(),
            collection: "orders".into(),
            document_count: 6_000_000,
            capacity: Capacity::new(1000, 200, 700),
        };

        assert_eq!(
            line.to_string(),
            "2024-05-01T12:00:00.000Z\tshop\torders\t6000000\t1000\t200\t1200\t900"
        );
    }

    #[test]
    fn test_instance_line() {
        let line = InstanceReportLine {
            timestamp: timestamp(),
            capacity: Capacity::new(300, 30, 330),
            server_version: "7.0.4".into(),
        };
        assert_eq!(
            line.to_string(),
            "2024-05-01T12:00:00.000Z\t300\t30\t330\t360\t7.0.4"
        );

        let unversioned = InstanceReportLine {
            server_version: String::new(),
            ..line
        };
        assert!(unversioned.to_string().ends_with("\t360\t"));
    }

    #[test]
    fn test_writer_counts_lines() {
        let mut writer = ReportWriter::new(Vec::new());
        let written = writer.write_all(["a", "b"]).unwrap();
        writer.write_line(&"c").unwrap();

        assert_eq!(written, 2);
        assert_eq!(writer.lines_written(), 3);
        assert_eq!(writer.into_inner(), b"a\nb\nc\n");
    }
}
