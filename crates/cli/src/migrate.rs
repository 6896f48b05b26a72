// ABOUTME: `minitools migrate`: star FreshRSS favorites in a Feedbin account.
// ABOUTME: Prints a per-source report and optionally exports what could not be migrated.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use minitools_feed::{parse_export, Favorite};
use minitools_feedbin::export::{
    missing_feeds_opml, unmigrated_csv, unmigrated_json, unmigrated_json_file_name,
};
use minitools_feedbin::migration::{DEFAULT_BATCH_SIZE, DEFAULT_DELAY_MS};
use minitools_feedbin::{
    Credentials, FeedbinClient, FeedbinError, MigrationConfig, MigrationReport, Migrator,
    DEFAULT_BASE_URL,
};

use crate::output;

pub const UNMIGRATED_CSV: &str = "unmigrated-favorites.csv";
pub const MISSING_FEEDS_OPML: &str = "missing-feeds.opml";

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// FreshRSS favorites export (JSON)
    export: PathBuf,

    #[arg(long, env = "FEEDBIN_EMAIL")]
    email: String,

    #[arg(long, env = "FEEDBIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Favorites per batch (10-1000)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Pause after each batch in milliseconds (0-10000)
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    #[arg(long, env = "FEEDBIN_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Directory for the unmigrated favorites JSON, CSV and missing-feeds OPML
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

pub async fn run(args: MigrateArgs) -> Result<()> {
    let data = fs::read(&args.export)
        .with_context(|| format!("failed to read {}", args.export.display()))?;
    let export = parse_export(&data)?;
    output::info(format!(
        "{} favorites from {} sources",
        export.len(),
        export.source_count()
    ));
    if let Some((first, last)) = export.date_range() {
        output::info(format!(
            "Published between {} and {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        ));
    }

    let credentials = Credentials::new(args.email, args.password);
    credentials.validate()?;
    let config = MigrationConfig {
        batch_size: args.batch_size,
        delay: Duration::from_millis(args.delay_ms),
    };
    config.validate()?;

    let client = FeedbinClient::builder(credentials)
        .base_url(args.api_url)
        .build()?;
    if !client.test_auth().await {
        return Err(FeedbinError::InvalidCredentials.into());
    }
    output::success("Authenticated with Feedbin");

    let favorites = export.favorites();
    let migrator = Migrator::new(&client, config)?;
    let report = migrator
        .run(&favorites, |done, total| {
            output::info(format!("Processed {}/{}", done, total));
        })
        .await;

    print_report(&report);

    if let Some(dir) = &args.export_dir {
        if report.unmigrated.is_empty() {
            output::info("Every favorite was migrated; nothing to export");
        } else {
            let written = write_exports(dir, &report.unmigrated, Utc::now())?;
            for path in written {
                output::success(format!("Wrote {}", path.display()));
            }
        }
    }
    Ok(())
}

fn print_report(report: &MigrationReport) {
    println!("Total favorites: {}", report.total);
    println!("Processed: {}", report.processed);
    println!("Starred: {}", report.starred);
    println!("Failed: {}", report.failed);
    println!("Success rate: {}%", report.success_rate());

    println!();
    println!("By source:");
    for (name, stats) in report.sources_by_starred() {
        println!(
            "  {}: {}/{} ({}%)",
            name,
            stats.starred,
            stats.total,
            stats.rate()
        );
    }

    let failed = report.top_failed_sources(5);
    if !failed.is_empty() {
        println!();
        println!("Most failures:");
        for (name, count) in failed {
            println!("  {}: {}", name, count);
        }
    }
}

/// Writes the three unmigrated-favorites files into `dir`.
pub fn write_exports(dir: &Path, unmigrated: &[Favorite], now: DateTime<Utc>) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let files = [
        (unmigrated_json_file_name(now), unmigrated_json(unmigrated, now)?),
        (UNMIGRATED_CSV.to_string(), unmigrated_csv(unmigrated)),
        (MISSING_FEEDS_OPML.to_string(), missing_feeds_opml(unmigrated, now)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
