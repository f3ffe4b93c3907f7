use super::paginator::{self, CategoryPages};
use crate::browser::{wait, BrowserPage};
use crate::config::TimingSettings;
use crate::error::{Result, ScraperError};
use crate::types::{Category, ScoreRecord};
use std::fmt;
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Scraped { pages: u32, records: usize },
    /// The site rendered an explicit "no results" marker.
    NoResults,
    /// Trigger absent, container never rendered, or the category failed mid-way.
    Unavailable(String),
}

impl fmt::Display for CategoryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryOutcome::Scraped { pages, records } => {
                write!(f, "{} scores across {} page(s)", records, pages)
            }
            CategoryOutcome::NoResults => write!(f, "no results"),
            CategoryOutcome::Unavailable(reason) => write!(f, "skipped ({})", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: String,
    pub outcome: CategoryOutcome,
}

#[derive(Debug, Default)]
pub struct WalkResult {
    /// Records in category-then-page discovery order.
    pub records: Vec<ScoreRecord>,
    pub reports: Vec<CategoryReport>,
}

/// Walks every category in order, folding each category's records into the result.
///
/// A failing category contributes zero records and never stops the walk.
pub async fn walk_categories(
    page: &dyn BrowserPage,
    categories: &[Category],
    timing: &TimingSettings,
) -> WalkResult {
    let mut walk = WalkResult::default();

    for category in categories {
        let span = info_span!("category", name = %category.display_name);
        info!("=== Checking {} ===", category.display_name);

        let (records, outcome) = match scrape_category(page, category, timing).instrument(span).await {
            Ok(Visit::Scraped(CategoryPages { pages, records })) => {
                let count = records.len();
                (records, CategoryOutcome::Scraped { pages, records: count })
            }
            Ok(Visit::NoResults) => {
                info!("No data found for {}", category.display_name);
                (Vec::new(), CategoryOutcome::NoResults)
            }
            Ok(Visit::LinkMissing) => {
                info!("Link not found for {}", category.display_name);
                (Vec::new(), CategoryOutcome::Unavailable(LINK_MISSING.to_string()))
            }
            Err(e) => {
                warn!("Error processing {}: {}", category.display_name, e);
                (Vec::new(), CategoryOutcome::Unavailable(e.to_string()))
            }
        };

        info!("Total scores for {}: {}", category.display_name, records.len());
        walk.records.extend(records);
        walk.reports.push(CategoryReport {
            category: category.display_name.clone(),
            outcome,
        });
    }

    info!("=== Total scores found: {} ===", walk.records.len());
    walk
}

const LINK_MISSING: &str = "link not found";

/// How far a single category visit got.
enum Visit {
    Scraped(CategoryPages),
    NoResults,
    LinkMissing,
}

async fn scrape_category(
    page: &dyn BrowserPage,
    category: &Category,
    timing: &TimingSettings,
) -> Result<Visit> {
    let trigger = category.trigger_selector();
    if page.count(&trigger).await? == 0 {
        return Ok(Visit::LinkMissing);
    }
    page.click(&trigger).await?;

    let container = category.result_selector();
    wait::wait_for_selector(page, &container, timing.container_timeout(), timing.poll_interval())
        .await
        .map_err(|e| unavailable(category, &e.to_string()))?;

    let first_page = wait::wait_until_settled(page, &container, None, timing.settle(), timing.poll_interval())
        .await?
        .ok_or_else(|| unavailable(category, "result container vanished"))?;

    if page.count(&category.no_result_selector()).await? > 0 {
        return Ok(Visit::NoResults);
    }

    paginator::scrape_pages(page, category, first_page, timing)
        .await
        .map(Visit::Scraped)
}

fn unavailable(category: &Category, reason: &str) -> ScraperError {
    ScraperError::CategoryUnavailable {
        category: category.display_name.clone(),
        reason: reason.to_string(),
    }
}
