use crate::browser::BrowserPage;
use crate::config::{Credentials, Settings};
use crate::error::Result;
use crate::merge;
use crate::scrapers::damtomo::{self, CategoryReport};
use crate::stats::ScoreStats;
use crate::storage::SnapshotStore;
use crate::types::ScoreRecord;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

/// Result of one complete scrape run.
#[derive(Debug)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub categories: Vec<CategoryReport>,
    /// Valid records scraped this run, before deduplication.
    pub scraped: usize,
    /// Records appended to the snapshot.
    pub added: usize,
    /// The snapshot as written, best score first. Empty when nothing was scraped.
    pub snapshot: Vec<ScoreRecord>,
    pub written: bool,
}

impl RunSummary {
    pub fn stats(&self) -> Option<ScoreStats> {
        ScoreStats::from_records(&self.snapshot)
    }
}

/// Logs in, walks every category, merges with the stored snapshot and writes
/// the result to all destinations.
///
/// Only authentication and the final write can fail the run; category and
/// row failures are absorbed along the way. Nothing is written when the walk
/// found no scores at all.
#[instrument(skip_all)]
pub async fn run(
    page: &dyn BrowserPage,
    settings: &Settings,
    credentials: &Credentials,
    store: &SnapshotStore,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    let existing = store.load_primary();

    damtomo::login(page, credentials, &settings.site, &settings.timing).await?;

    let walk = damtomo::walk_categories(page, &settings.categories, &settings.timing).await;
    let scraped = walk.records.len();

    if scraped == 0 {
        info!("No scores found.");
        return Ok(RunSummary {
            started_at,
            categories: walk.reports,
            scraped,
            added: 0,
            snapshot: Vec::new(),
            written: false,
        });
    }

    let merged = merge::merge(existing, walk.records);
    info!("Found {} new scores to add", merged.added);

    store.save(&merged.combined)?;

    info!(
        scraped,
        added = merged.added,
        total = merged.combined.len(),
        "Snapshot updated"
    );

    Ok(RunSummary {
        started_at,
        categories: walk.reports,
        scraped,
        added: merged.added,
        snapshot: merged.combined,
        written: true,
    })
}
