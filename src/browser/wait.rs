use super::BrowserPage;
use crate::error::{Result, ScraperError};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Hex SHA-256 of rendered markup, used to detect in-place re-renders.
pub fn digest(html: &str) -> String {
    hex::encode(Sha256::digest(html.as_bytes()))
}

/// Polls until `selector` matches at least one element.
pub async fn wait_for_selector(
    page: &dyn BrowserPage,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.count(selector).await? > 0 {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(ScraperError::Timeout(timeout, selector.to_string()));
        }
        sleep(poll).await;
    }
}

/// Waits for a form submission to leave `from_url`.
///
/// Navigation counts as complete once the URL changed or `gone_selector` no
/// longer matches, and the new document reports ready.
pub async fn wait_for_navigation(
    page: &dyn BrowserPage,
    from_url: &str,
    gone_selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<String> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = page.current_url().await?;
        let left_page = url != from_url || page.count(gone_selector).await? == 0;
        if left_page && page.is_ready().await? {
            return Ok(url);
        }
        if Instant::now() >= deadline {
            return Err(ScraperError::Timeout(timeout, format!("navigation away from {}", from_url)));
        }
        sleep(poll).await;
    }
}

/// Polls the markup of `selector` until it has changed from `previous` (when
/// given) and two consecutive polls agree.
///
/// Returns the settled markup. If `budget` runs out first, the last markup
/// observed is returned as-is; `None` only when the container never rendered.
pub async fn wait_until_settled(
    page: &dyn BrowserPage,
    selector: &str,
    previous: Option<&str>,
    budget: Duration,
    poll: Duration,
) -> Result<Option<String>> {
    let deadline = Instant::now() + budget;
    let mut last: Option<(String, String)> = None;

    loop {
        let current = page.inner_html(selector).await?.map(|html| {
            let hash = digest(&html);
            (hash, html)
        });

        let settled = match (&current, &last) {
            (Some((hash, _)), Some((last_hash, _))) => {
                previous.map_or(true, |p| p != hash.as_str()) && hash == last_hash
            }
            _ => false,
        };
        if settled {
            return Ok(current.map(|(_, html)| html));
        }

        if current.is_some() {
            last = current;
        }
        if Instant::now() >= deadline {
            debug!("{} did not settle within {:?}; using last render", selector, budget);
            return Ok(last.map(|(_, html)| html));
        }
        sleep(poll).await;
    }
}
