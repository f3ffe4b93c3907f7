use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, warn};

use karaoke_scraper::browser::WebDriverPage;
use karaoke_scraper::config::{Credentials, Settings, DEFAULT_CONFIG_PATH};
use karaoke_scraper::constants::TOP_SCORES_SHOWN;
use karaoke_scraper::pipeline::{self, RunSummary};
use karaoke_scraper::report::{self, ReportQuery, SortDirection, SortKey};
use karaoke_scraper::stats;
use karaoke_scraper::storage::{self, SnapshotStore};
use karaoke_scraper::logging;

#[derive(Parser)]
#[command(name = "karaoke_scraper")]
#[command(about = "DAM tomo karaoke score scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML settings file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, scrape every scoring category and update the snapshot (default)
    Scrape,
    /// Print a filtered, sorted view of a saved snapshot
    Report {
        /// Snapshot to read (defaults to the dashboard snapshot)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Case-insensitive match against song name or artist
        #[arg(long)]
        search: Option<String>,
        /// Hide scores below this value
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
        #[arg(long, value_enum, default_value_t = SortKey::Score)]
        sort: SortKey,
        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?.with_env_overrides();

    match cli.command.unwrap_or(Commands::Scrape) {
        Commands::Scrape => scrape(&settings).await,
        Commands::Report {
            path,
            search,
            min_score,
            sort,
            ascending,
            limit,
        } => {
            let path = path.unwrap_or_else(|| settings.snapshot.dashboard.clone());
            let records = storage::load(&path);
            let query = ReportQuery {
                search,
                min_score,
                sort,
                direction: if ascending {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                },
            };
            print!("{}", report::render(&query.apply(&records), limit));
            Ok(())
        }
    }
}

async fn scrape(settings: &Settings) -> anyhow::Result<()> {
    // Credentials are checked before any network activity.
    let credentials = Credentials::from_env()?;
    let store = SnapshotStore::new(settings.snapshot.destinations());

    let page = WebDriverPage::connect(&settings.site.webdriver_url, settings.site.headless)
        .await
        .with_context(|| format!("connecting to WebDriver at {}", settings.site.webdriver_url))?;

    let outcome = pipeline::run(&page, settings, &credentials, &store).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close browser session: {}", e);
    }

    match outcome {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            error!("Failed to scrape karaoke scores: {}", e);
            Err(e.into())
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Run started {}", summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    for report in &summary.categories {
        println!("   {}: {}", report.category, report.outcome);
    }

    if !summary.written {
        println!("\nNo scores found.");
        return;
    }

    println!("\nScraped: {}  New: {}  Total: {}", summary.scraped, summary.added, summary.snapshot.len());

    println!("\n=== Top {} scores ===", TOP_SCORES_SHOWN);
    for (index, record) in stats::top(&summary.snapshot, TOP_SCORES_SHOWN).iter().enumerate() {
        println!("{}", stats::format_entry(index + 1, record));
    }

    if let Some(stats) = summary.stats() {
        println!("\n=== Statistics ===");
        println!("Total songs: {}", stats.count);
        println!("Average score: {:.2}", stats.average);
        println!("Highest score: {}", stats.highest);
        println!("Lowest score: {}", stats.lowest);
    }

    println!("\n✅ Scraping completed successfully! Total scores: {}", summary.snapshot.len());
}
