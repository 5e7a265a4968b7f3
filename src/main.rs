use anyhow::Context;
use clap::{Parser, Subcommand};
use mongo_capacity::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file, or TOML when built with the `toml` feature
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Connection string, overrides the config file
    #[arg(long, env = "MONGODB_URI")]
    uri: Option<String>,

    /// Report collections with more documents than this
    #[arg(long)]
    doc_threshold: Option<u64>,

    /// Report collections whose data plus index bytes exceed this
    #[arg(long)]
    size_threshold: Option<u64>,

    #[command(subcommand)]
    report: Report,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Report {
    /// One line per collection over either threshold
    Collections,
    /// One line with totals for the whole instance
    Instance,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(uri) = &args.uri {
        config = config.with_uri(uri.clone());
    }
    if let Some(count) = args.doc_threshold {
        config.thresholds = config.thresholds.with_document_count(count);
    }
    if let Some(bytes) = args.size_threshold {
        config.thresholds = config.thresholds.with_logical_size_bytes(bytes);
    }

    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mongo_capacity=info,warn".into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let source = MongoStatsSource::connect(&config).context("failed to create client")?;
    let now = chrono::Utc::now();
    let mut writer = ReportWriter::new(io::stdout().lock());

    match args.report {
        Report::Collections => {
            let mut scan = sample_collections(&source, config.thresholds, now)?;
            writer.write_all(scan.by_ref())?;
            let stats = scan.stats();
            info!(
                databases = stats.databases_scanned,
                databases_skipped = stats.databases_skipped,
                collections = stats.collections_sampled,
                collections_skipped = stats.collections_skipped,
                reported = stats.lines_emitted,
                "Collection scan finished"
            );
        }
        Report::Instance => {
            let line = sample_instance(&source, now)?;
            writer.write_line(&line)?;
            info!(
                logical = line.logical_total(),
                physical = line.physical_bytes(),
                "Instance sample finished"
            );
        }
    }

    writer.flush()?;
    Ok(())
}
