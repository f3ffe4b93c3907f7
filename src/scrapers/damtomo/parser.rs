use crate::constants::{PAGER_ITEMS, RESULT_TABLE};
use crate::error::{Result, ScraperError};
use crate::types::ScoreRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse(RESULT_TABLE).expect("valid table selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid cell selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid link selector"));
static BREAK: Lazy<Selector> = Lazy::new(|| Selector::parse("br").expect("valid br selector"));
static PAGER: Lazy<Selector> = Lazy::new(|| Selector::parse(PAGER_ITEMS).expect("valid pager selector"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid number regex"));

/// Extracts every valid score from one rendered page of a category's result
/// container. Malformed tables are skipped; invalid records are dropped.
pub fn extract_scores(html: &str, scoring_type: &str) -> Vec<ScoreRecord> {
    let fragment = Html::parse_fragment(html);
    let mut records = Vec::new();

    for (index, table) in fragment.select(&TABLE).enumerate() {
        match parse_table(table, scoring_type) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => warn!("Skipping result table {}: {}", index + 1, e),
        }
    }
    records
}

/// Number of result pages announced by the pager; 1 when there is no pager.
pub fn page_count(html: &str) -> u32 {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&PAGER)
        .filter_map(|item| text_of(item).parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1)
}

/// First ASCII decimal or integer number in `text`, `0.0` when there is none.
pub fn parse_score(text: &str) -> Result<f64> {
    let Some(found) = NUMBER.find(text) else {
        return Ok(0.0);
    };
    let score: f64 = found
        .as_str()
        .parse()
        .map_err(|e| ScraperError::RowParse(format!("score '{}': {}", found.as_str(), e)))?;
    if !score.is_finite() {
        return Err(ScraperError::RowParse(format!("score '{}' out of range", found.as_str())));
    }
    Ok(score)
}

fn parse_table(table: ElementRef<'_>, scoring_type: &str) -> Result<Option<ScoreRecord>> {
    let Some(row) = table.select(&ROW).next() else {
        return Ok(None);
    };
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < 3 {
        return Ok(None);
    }

    let date = text_of(cells[0]);
    let song_name = cells[1].select(&LINK).next().map(text_of).unwrap_or_default();
    let artist = artist_after_break(cells[1]);
    let score = parse_score(&text_of(cells[2]))?;

    let record = ScoreRecord::new(song_name, artist, score, Some(date), scoring_type);
    if !record.is_valid() {
        debug!("Discarding invalid row: song='{}' score={}", record.song_name, record.score);
        return Ok(None);
    }
    Ok(Some(record))
}

/// The artist is the node that follows the `<br>` in the song cell.
fn artist_after_break(cell: ElementRef<'_>) -> Option<String> {
    let br = cell.select(&BREAK).next()?;
    let sibling = br.next_sibling()?;
    let text = match ElementRef::wrap(sibling) {
        Some(element) => element.text().collect::<String>(),
        None => sibling.value().as_text().map(|t| t.to_string()).unwrap_or_default(),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
