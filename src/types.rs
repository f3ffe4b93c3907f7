use crate::constants::{NO_RESULT_MARKER, PAGER_LINKS, SCORING_CATEGORIES, UNKNOWN_ARTIST};
use serde::{Deserialize, Serialize};

/// One scored karaoke performance as persisted in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub song_name: String,
    pub artist: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub scoring_type: String,
}

impl ScoreRecord {
    /// Builds a record from extracted cell values, substituting the unknown-artist
    /// sentinel for a missing or blank artist.
    pub fn new(
        song_name: impl Into<String>,
        artist: Option<String>,
        score: f64,
        date: Option<String>,
        scoring_type: impl Into<String>,
    ) -> Self {
        let artist = artist
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        Self {
            song_name: song_name.into(),
            artist,
            score,
            date,
            scoring_type: scoring_type.into(),
        }
    }

    /// A record is kept only with a song name and a positive score.
    pub fn is_valid(&self) -> bool {
        !self.song_name.is_empty() && self.score > 0.0
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            song_name: self.song_name.clone(),
            artist: self.artist.clone(),
            date: self.date.clone(),
            scoring_type: self.scoring_type.clone(),
        }
    }
}

/// Deduplication key: two records with equal keys are the same observation.
/// A missing date and an empty date are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub song_name: String,
    pub artist: String,
    pub date: Option<String>,
    pub scoring_type: String,
}

/// A scoring-mode section of the history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Element id prefix, e.g. `DamHistoryMarkingAi`.
    pub id: String,
    /// Name stamped onto every record scraped from this category.
    pub display_name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn defaults() -> Vec<Category> {
        SCORING_CATEGORIES
            .iter()
            .map(|(id, name)| Category::new(*id, *name))
            .collect()
    }

    /// Control that expands the category.
    pub fn trigger_selector(&self) -> String {
        format!("#{}ListLink a", self.id)
    }

    /// Container the site renders the category's results into.
    pub fn result_selector(&self) -> String {
        format!("#{}ListResult", self.id)
    }

    pub fn no_result_selector(&self) -> String {
        format!("{} {}", self.result_selector(), NO_RESULT_MARKER)
    }

    pub fn pager_link_selector(&self) -> String {
        format!("{} {}", self.result_selector(), PAGER_LINKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artist_defaults_to_unknown() {
        let record = ScoreRecord::new("Song", None, 90.1, Some("2024-01-01".into()), "T");
        assert_eq!(record.artist, "Unknown");

        let blank = ScoreRecord::new("Song", Some("  ".into()), 90.1, None, "T");
        assert_eq!(blank.artist, "Unknown");
    }

    #[test]
    fn validity_requires_song_and_positive_score() {
        assert!(ScoreRecord::new("A", Some("X".into()), 0.1, None, "T").is_valid());
        assert!(!ScoreRecord::new("", Some("X".into()), 85.0, None, "T").is_valid());
        assert!(!ScoreRecord::new("A", Some("X".into()), 0.0, None, "T").is_valid());
    }

    #[test]
    fn identity_key_distinguishes_missing_and_empty_date() {
        let a = ScoreRecord::new("A", Some("X".into()), 80.0, None, "T");
        let b = ScoreRecord::new("A", Some("X".into()), 80.0, Some(String::new()), "T");
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn identity_key_ignores_score() {
        let a = ScoreRecord::new("A", Some("X".into()), 80.0, Some("d".into()), "T");
        let b = ScoreRecord::new("A", Some("X".into()), 91.5, Some("d".into()), "T");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_date() {
        let record = ScoreRecord::new("A", Some("X".into()), 85.0, None, "T");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["songName"], "A");
        assert_eq!(json["scoringType"], "T");
        assert!(json.get("date").is_none());
    }

    #[test]
    fn category_selectors() {
        let category = Category::new("DamHistoryMarkingAi", "精密採点Ai");
        assert_eq!(category.trigger_selector(), "#DamHistoryMarkingAiListLink a");
        assert_eq!(category.result_selector(), "#DamHistoryMarkingAiListResult");
        assert_eq!(category.no_result_selector(), "#DamHistoryMarkingAiListResult .no_result");
        assert_eq!(category.pager_link_selector(), "#DamHistoryMarkingAiListResult .ppage li a");
        assert_eq!(Category::defaults().len(), 3);
    }
}
