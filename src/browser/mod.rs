// Browser boundary: one authenticated page handle driven by the scraper.

pub mod wait;
pub mod webdriver;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use webdriver::WebDriverPage;

/// The page-level primitives the scraper drives.
///
/// Implementations operate on a single page; callers never issue a second
/// command before the previous one resolves.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigates and waits for the document to load, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// True once the document has finished loading.
    async fn is_ready(&self) -> Result<bool>;

    /// Number of elements matching a CSS selector.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Inner HTML of the first match, `None` when nothing matches.
    async fn inner_html(&self, selector: &str) -> Result<Option<String>>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Clicks the first element matching `selector` whose trimmed text equals `label`.
    async fn click_link_with_text(&self, selector: &str, label: &str) -> Result<()>;
}
