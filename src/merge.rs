use crate::types::{IdentityKey, ScoreRecord};
use std::collections::HashSet;

/// Outcome of merging a fresh scrape into the persisted snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// Existing and new records, sorted by score descending.
    pub combined: Vec<ScoreRecord>,
    /// How many fresh records were not already in the snapshot.
    pub added: usize,
}

/// Appends the fresh records whose identity key is not already known, then
/// sorts the whole snapshot by score descending.
///
/// First-seen wins: an existing record is never replaced, and a key repeated
/// within `fresh` is only taken once. The sort is stable, so equal scores keep
/// existing-before-new and discovery order.
pub fn merge(existing: Vec<ScoreRecord>, fresh: Vec<ScoreRecord>) -> MergeResult {
    let mut seen: HashSet<IdentityKey> = existing.iter().map(ScoreRecord::identity_key).collect();

    let new_records: Vec<ScoreRecord> = fresh
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect();
    let added = new_records.len();

    let mut combined = existing;
    combined.extend(new_records);
    combined.sort_by(|a, b| b.score.total_cmp(&a.score));

    MergeResult { combined, added }
}
