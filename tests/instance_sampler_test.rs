use chrono::{DateTime, TimeZone, Utc};
use mongo_capacity::{
    CapacityError, DatabaseStats, MemoryStatsSource, ReportWriter, sample_instance,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap()
}

fn three_databases() -> MemoryStatsSource {
    MemoryStatsSource::new()
        .with_database(DatabaseStats::new("shop", 100, 10, 120))
        .with_database(DatabaseStats::new("crm", 200, 20, 210))
        .with_database(DatabaseStats::new("empty", 0, 0, 0))
        .with_server_version("7.0.4")
}

#[test]
fn test_totals_across_databases() {
    let line = sample_instance(&three_databases(), now()).unwrap();

    assert_eq!(line.data_bytes(), 300);
    assert_eq!(line.index_bytes(), 30);
    assert_eq!(line.logical_total(), 330);
    assert_eq!(line.physical_bytes(), 360);
    assert_eq!(line.server_version, "7.0.4");
    assert_eq!(
        line.to_string(),
        "2024-05-01T03:00:00.000Z\t300\t30\t330\t360\t7.0.4"
    );
}

#[test]
fn test_reserved_databases_excluded() {
    let source = three_databases()
        .with_database(DatabaseStats::new("admin", 1_000, 1_000, 1_000))
        .with_database(DatabaseStats::new("local", 1_000, 1_000, 1_000))
        .with_database(DatabaseStats::new("config", 1_000, 1_000, 1_000));

    let line = sample_instance(&source, now()).unwrap();
    assert_eq!(line.logical_total(), 330);
    assert_eq!(line.physical_bytes(), 360);
}

#[test]
fn test_failing_database_contributes_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = three_databases()
        .with_database(DatabaseStats::new("broken", 5_000, 5_000, 5_000))
        .with_failing_database("broken")
        .with_database(DatabaseStats::new("repairing", 7_000, 7_000, 7_000))
        .with_rejected_database("repairing");

    let line = sample_instance(&source, now()).unwrap();
    assert_eq!(line.data_bytes(), 300);
    assert_eq!(line.index_bytes(), 30);
    assert_eq!(line.physical_bytes(), 360);
}

#[test]
fn test_absent_fields_default_to_zero() {
    let source = MemoryStatsSource::new().with_database(DatabaseStats {
        name: "partial".into(),
        data_size: Some(50),
        index_size: None,
        storage_size: Some(20),
    });

    let line = sample_instance(&source, now()).unwrap();
    assert_eq!(line.logical_total(), 50);
    assert_eq!(line.physical_bytes(), 20);
}

#[test]
fn test_missing_version_is_empty() {
    let source = MemoryStatsSource::new().with_database(DatabaseStats::new("shop", 1, 2, 3));

    let line = sample_instance(&source, now()).unwrap();
    assert_eq!(line.server_version, "");
    assert_eq!(line.to_string(), "2024-05-01T03:00:00.000Z\t1\t2\t3\t5\t");
}

#[test]
fn test_no_databases() {
    let line = sample_instance(&MemoryStatsSource::new(), now()).unwrap();
    assert_eq!(line.logical_total(), 0);
    assert_eq!(line.physical_bytes(), 0);
}

#[test]
fn test_enumeration_failure_is_provider_error() {
    let source = three_databases().with_failing_list("connection reset by peer");

    let err = sample_instance(&source, now()).unwrap_err();
    assert!(matches!(err, CapacityError::Provider(_)));
    assert!(err.to_string().contains("connection reset by peer"));
}

#[test]
fn test_extreme_sizes_do_not_wrap() {
    let source = MemoryStatsSource::new()
        .with_database(DatabaseStats::new("huge", u64::MAX, 0, 0))
        .with_database(DatabaseStats::new("small", 1, 0, 0));

    let line = sample_instance(&source, now()).unwrap();
    assert_eq!(line.data_bytes(), u64::MAX);
    assert_eq!(line.logical_total(), u64::MAX);
    assert_eq!(line.physical_bytes(), 0);
}

#[test]
fn test_repeated_samples_render_identically() {
    let source = three_databases()
        .with_failing_database("broken")
        .with_database(DatabaseStats::new("admin", 9, 9, 9));

    let render = || {
        let mut writer = ReportWriter::new(Vec::new());
        writer
            .write_line(&sample_instance(&source, now()).unwrap())
            .unwrap();
        writer.into_inner()
    };

    let first = render();
    assert_eq!(first, render());
    assert_eq!(
        String::from_utf8(first).unwrap(),
        "2024-05-01T03:00:00.000Z\t300\t30\t330\t360\t7.0.4\n"
    );
}
