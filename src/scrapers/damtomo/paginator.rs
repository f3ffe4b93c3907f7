use super::parser;
use crate::browser::{wait, BrowserPage};
use crate::config::TimingSettings;
use crate::error::{Result, ScraperError};
use crate::types::{Category, ScoreRecord};
use tracing::info;

/// Records gathered from every page of one category.
#[derive(Debug, Default)]
pub struct CategoryPages {
    pub pages: u32,
    pub records: Vec<ScoreRecord>,
}

/// Reads pages 1..=N of a category whose result container is already rendered.
///
/// Pages are strictly sequential: page N's pager link exists only once page
/// N-1 has rendered.
pub async fn scrape_pages(
    page: &dyn BrowserPage,
    category: &Category,
    first_page: String,
    timing: &TimingSettings,
) -> Result<CategoryPages> {
    let container = category.result_selector();
    let total_pages = parser::page_count(&first_page);
    info!("Found {} pages of data", total_pages);

    let mut records = Vec::new();
    let mut html = first_page;

    for page_number in 1..=total_pages {
        info!("Extracting page {}/{}...", page_number, total_pages);

        if page_number > 1 {
            let before = wait::digest(&html);
            page.click_link_with_text(&category.pager_link_selector(), &page_number.to_string())
                .await?;
            html = wait::wait_until_settled(
                page,
                &container,
                Some(&before),
                timing.settle(),
                timing.poll_interval(),
            )
            .await?
            .ok_or_else(|| ScraperError::CategoryUnavailable {
                category: category.display_name.clone(),
                reason: format!("result container vanished on page {}", page_number),
            })?;
        }

        let page_records = parser::extract_scores(&html, &category.display_name);
        info!("Found {} scores on page {}", page_records.len(), page_number);
        records.extend(page_records);
    }

    Ok(CategoryPages {
        pages: total_pages,
        records,
    })
}
