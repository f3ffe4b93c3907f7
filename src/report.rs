//! Read-only views over a persisted snapshot: filtering, ordering and score
//! bands, matching what the dashboard shows.

use crate::stats::ScoreStats;
use crate::types::ScoreRecord;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Score,
    Song,
    Artist,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    /// Case-insensitive substring matched against song name or artist.
    pub search: Option<String>,
    pub min_score: f64,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            search: None,
            min_score: 0.0,
            sort: SortKey::Score,
            direction: SortDirection::Descending,
        }
    }
}

impl ReportQuery {
    pub fn matches(&self, record: &ScoreRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.song_name.to_lowercase().contains(&term)
                    || record.artist.to_lowercase().contains(&term)
            }
        };
        matches_search && record.score >= self.min_score
    }

    /// Filters and orders `records`; the input is left untouched.
    pub fn apply<'a>(&self, records: &'a [ScoreRecord]) -> Vec<&'a ScoreRecord> {
        let mut view: Vec<&ScoreRecord> = records.iter().filter(|r| self.matches(r)).collect();
        view.sort_by(|a, b| {
            let ordering = compare(self.sort, a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        view
    }
}

fn compare(key: SortKey, a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    match key {
        SortKey::Score => a.score.total_cmp(&b.score),
        SortKey::Song => a.song_name.to_lowercase().cmp(&b.song_name.to_lowercase()),
        SortKey::Artist => a.artist.to_lowercase().cmp(&b.artist.to_lowercase()),
        SortKey::Date => a.date.cmp(&b.date),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 90.0 {
            ScoreBand::Excellent
        } else if score >= 80.0 {
            ScoreBand::Good
        } else if score >= 70.0 {
            ScoreBand::Average
        } else {
            ScoreBand::Poor
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Average => "average",
            ScoreBand::Poor => "poor",
        };
        f.write_str(label)
    }
}

/// Renders a filtered view as text lines, followed by its statistics.
pub fn render(view: &[&ScoreRecord], limit: Option<usize>) -> String {
    let mut out = String::new();
    let shown = limit.unwrap_or(view.len()).min(view.len());

    for (index, record) in view.iter().take(shown).enumerate() {
        out.push_str(&format!(
            "{:>4}. {:>6.1}  [{:<9}] {} / {}  <{}> {}\n",
            index + 1,
            record.score,
            ScoreBand::of(record.score).to_string(),
            record.song_name,
            record.artist,
            record.scoring_type,
            record.date.as_deref().unwrap_or("")
        ));
    }

    match ScoreStats::from_records(view.iter().copied()) {
        Some(stats) => out.push_str(&format!(
            "\nSongs: {}  Average: {:.1}  Highest: {:.1}\n",
            stats.count, stats.average, stats.highest
        )),
        None => out.push_str("No scores match.\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<ScoreRecord> {
        vec![
            ScoreRecord::new("Lemon", Some("米津玄師".into()), 91.2, Some("2024/03/01".into()), "T"),
            ScoreRecord::new("夜に駆ける", Some("YOASOBI".into()), 84.0, Some("2024/01/01".into()), "T"),
            ScoreRecord::new("idol", Some("YOASOBI".into()), 72.3, Some("2024/02/01".into()), "T"),
            ScoreRecord::new("Pretender", Some("Official髭男dism".into()), 65.0, None, "T"),
        ]
    }

    #[test]
    fn default_query_orders_best_first() {
        let records = snapshot();
        let view = ReportQuery::default().apply(&records);
        let scores: Vec<f64> = view.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![91.2, 84.0, 72.3, 65.0]);
    }

    #[test]
    fn search_matches_song_or_artist_case_insensitively() {
        let records = snapshot();
        let query = ReportQuery {
            search: Some("yoasobi".into()),
            ..ReportQuery::default()
        };
        assert_eq!(query.apply(&records).len(), 2);

        let by_song = ReportQuery {
            search: Some("LEM".into()),
            ..ReportQuery::default()
        };
        assert_eq!(by_song.apply(&records)[0].song_name, "Lemon");
    }

    #[test]
    fn min_score_filters() {
        let records = snapshot();
        let query = ReportQuery {
            min_score: 80.0,
            ..ReportQuery::default()
        };
        assert_eq!(query.apply(&records).len(), 2);
    }

    #[test]
    fn sorts_text_keys_ascending() {
        let records = snapshot();
        let query = ReportQuery {
            sort: SortKey::Song,
            direction: SortDirection::Ascending,
            ..ReportQuery::default()
        };
        let names: Vec<&str> = query.apply(&records).iter().map(|r| r.song_name.as_str()).collect();
        assert_eq!(names, vec!["idol", "Lemon", "Pretender", "夜に駆ける"]);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::of(90.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::of(89.9), ScoreBand::Good);
        assert_eq!(ScoreBand::of(70.0), ScoreBand::Average);
        assert_eq!(ScoreBand::of(69.9), ScoreBand::Poor);
    }

    #[test]
    fn render_reports_empty_view() {
        assert_eq!(render(&[], None), "No scores match.\n");
    }

    #[test]
    fn render_respects_limit() {
        let records = snapshot();
        let view = ReportQuery::default().apply(&records);
        let text = render(&view, Some(2));
        assert!(text.contains("Lemon"));
        assert!(text.contains("夜に駆ける"));
        assert!(!text.contains("idol"));
        assert!(text.contains("Songs: 4"));
    }
}
