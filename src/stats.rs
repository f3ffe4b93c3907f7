use crate::types::ScoreRecord;

/// Aggregate figures over a set of scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStats {
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl ScoreStats {
    /// `None` for an empty slice.
    pub fn from_records<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ScoreRecord>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut highest = f64::MIN;
        let mut lowest = f64::MAX;

        for record in records {
            count += 1;
            sum += record.score;
            highest = highest.max(record.score);
            lowest = lowest.min(record.score);
        }

        (count > 0).then(|| ScoreStats {
            count,
            average: sum / count as f64,
            highest,
            lowest,
        })
    }
}

/// The first `n` records of a snapshot already sorted best-first.
pub fn top(records: &[ScoreRecord], n: usize) -> &[ScoreRecord] {
    &records[..records.len().min(n)]
}

/// One leaderboard line: `rank. song - artist: score (date)`.
pub fn format_entry(rank: usize, record: &ScoreRecord) -> String {
    format!(
        "{}. {} - {}: {} ({})",
        rank,
        record.song_name,
        record.artist,
        record.score,
        record.date.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: f64) -> ScoreRecord {
        ScoreRecord::new("S", Some("A".into()), score, Some("2024/05/01".into()), "T")
    }

    #[test]
    fn empty_has_no_stats() {
        assert_eq!(ScoreStats::from_records(&Vec::<ScoreRecord>::new()), None);
    }

    #[test]
    fn computes_average_and_extremes() {
        let records = vec![record(90.0), record(80.0), record(70.0)];
        let stats = ScoreStats::from_records(&records).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.average - 80.0).abs() < f64::EPSILON);
        assert_eq!(stats.highest, 90.0);
        assert_eq!(stats.lowest, 70.0);
    }

    #[test]
    fn top_is_bounded_by_length() {
        let records = vec![record(90.0), record(80.0)];
        assert_eq!(top(&records, 10).len(), 2);
        assert_eq!(top(&records, 1)[0].score, 90.0);
    }

    #[test]
    fn formats_leaderboard_line() {
        assert_eq!(format_entry(1, &record(92.5)), "1. S - A: 92.5 (2024/05/01)");
    }
}
