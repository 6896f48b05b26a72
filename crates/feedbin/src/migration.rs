// ABOUTME: Batched migration of FreshRSS favorites into Feedbin stars.
// ABOUTME: Each favorite is looked up by URL and starred; results are tallied per source.

use std::collections::BTreeMap;
use std::time::Duration;

use minitools_feed::Favorite;
use serde::Serialize;
use tracing::{debug, info};

use crate::client::FeedbinClient;
use crate::error::FeedbinError;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const MIN_BATCH_SIZE: usize = 10;
pub const MAX_BATCH_SIZE: usize = 1000;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const MAX_DELAY_MS: u64 = 10_000;

/// Batch size and throttle between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationConfig {
    pub batch_size: usize,
    pub delay: Duration,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl MigrationConfig {
    pub fn validate(&self) -> Result<(), FeedbinError> {
        let mut errors = Vec::new();
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            errors.push(format!(
                "Batch size must be between {} and {}",
                MIN_BATCH_SIZE, MAX_BATCH_SIZE
            ));
        }
        if self.delay > Duration::from_millis(MAX_DELAY_MS) {
            errors.push(format!(
                "Delay between batches must be between 0 and {}ms",
                MAX_DELAY_MS
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FeedbinError::invalid(errors.join("; ")))
        }
    }
}

/// Per-source tally. `total` counts every attempted favorite of the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub total: usize,
    pub starred: usize,
}

impl SourceStats {
    pub fn failed(&self) -> usize {
        self.total - self.starred
    }

    /// Rounded percentage of starred items.
    pub fn rate(&self) -> u32 {
        rounded_percent(self.starred, self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub total: usize,
    pub processed: usize,
    pub starred: usize,
    pub failed: usize,
    pub by_source: BTreeMap<String, SourceStats>,
    /// Favorites that could not be starred, in input order.
    pub unmigrated: Vec<Favorite>,
}

impl MigrationReport {
    /// Rounded percentage of favorites starred; 0 for an empty run.
    pub fn success_rate(&self) -> u32 {
        rounded_percent(self.starred, self.total)
    }

    /// Sources with the most failures, ties broken by name.
    pub fn top_failed_sources(&self, n: usize) -> Vec<(String, usize)> {
        let mut failed: Vec<(String, usize)> = self
            .by_source
            .iter()
            .filter(|(_, stats)| stats.failed() > 0)
            .map(|(name, stats)| (name.clone(), stats.failed()))
            .collect();
        failed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        failed.truncate(n);
        failed
    }

    /// Sources ordered by starred count, most first.
    pub fn sources_by_starred(&self) -> Vec<(&str, SourceStats)> {
        let mut sources: Vec<(&str, SourceStats)> = self
            .by_source
            .iter()
            .map(|(name, stats)| (name.as_str(), *stats))
            .collect();
        sources.sort_by(|a, b| b.1.starred.cmp(&a.1.starred).then_with(|| a.0.cmp(b.0)));
        sources
    }

    fn record(&mut self, favorite: &Favorite, starred: bool) {
        self.processed += 1;
        let stats = self
            .by_source
            .entry(favorite.source().to_string())
            .or_default();
        stats.total += 1;
        if starred {
            self.starred += 1;
            stats.starred += 1;
        } else {
            self.failed += 1;
            self.unmigrated.push(favorite.clone());
        }
    }
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Runs a migration against one Feedbin account.
#[derive(Debug, Clone)]
pub struct Migrator<'a> {
    client: &'a FeedbinClient,
    config: MigrationConfig,
}

impl<'a> Migrator<'a> {
    pub fn new(client: &'a FeedbinClient, config: MigrationConfig) -> Result<Self, FeedbinError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// Migrates `favorites` batch by batch, sequentially inside a batch.
    ///
    /// `progress` receives `(done, total)` after each batch. Failures are
    /// recorded in the report and never retried.
    pub async fn run<F>(&self, favorites: &[Favorite], mut progress: F) -> MigrationReport
    where
        F: FnMut(usize, usize),
    {
        let mut report = MigrationReport {
            total: favorites.len(),
            ..MigrationReport::default()
        };

        let mut done = 0;
        for batch in favorites.chunks(self.config.batch_size) {
            for favorite in batch {
                let starred = self.migrate_one(favorite).await;
                report.record(favorite, starred);
            }
            done += batch.len();
            progress(done, favorites.len());
            debug!(done, total = favorites.len(), "migration batch finished");
            tokio::time::sleep(self.config.delay).await;
        }

        info!(
            total = report.total,
            starred = report.starred,
            failed = report.failed,
            "migration finished"
        );
        report
    }

    async fn migrate_one(&self, favorite: &Favorite) -> bool {
        let id = match self.client.find_entry_id(&favorite.url).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!(url = %favorite.url, "no matching feedbin entry");
                return false;
            }
            Err(err) => {
                debug!(url = %favorite.url, error = %err, "entry lookup failed");
                return false;
            }
        };
        match self.client.star_entry(id).await {
            Ok(accepted) => accepted,
            Err(err) => {
                debug!(url = %favorite.url, error = %err, "starring failed");
                false
            }
        }
    }
}
