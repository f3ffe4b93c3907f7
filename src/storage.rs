use crate::error::{Result, ScraperError};
use crate::types::ScoreRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Owns the on-disk snapshot: one JSON array of score records, mirrored to
/// every destination path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    destinations: Vec<PathBuf>,
}

impl SnapshotStore {
    /// The first destination is the primary snapshot the next run reads back.
    pub fn new(destinations: Vec<PathBuf>) -> Self {
        Self { destinations }
    }

    pub fn primary(&self) -> Option<&Path> {
        self.destinations.first().map(PathBuf::as_path)
    }

    /// Reads the primary snapshot; empty when there is none yet.
    pub fn load_primary(&self) -> Vec<ScoreRecord> {
        self.primary().map(load).unwrap_or_default()
    }

    /// Writes the same serialized snapshot to every destination.
    pub fn save(&self, records: &[ScoreRecord]) -> Result<()> {
        save(&self.destinations, records)
    }
}

/// Parses the snapshot at `path`. A missing or unparseable file is treated as
/// an empty snapshot so a first run starts from nothing.
pub fn load(path: &Path) -> Vec<ScoreRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            info!("No existing scores at {} ({}), starting fresh", path.display(), e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<ScoreRecord>>(&content) {
        Ok(records) => {
            info!("Loaded {} existing scores from {}", records.len(), path.display());
            records
        }
        Err(e) => {
            warn!("Ignoring unreadable snapshot {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Serializes `records` once and writes the identical bytes to each path.
///
/// Every destination is attempted; the first failure is returned naming its path.
pub fn save(paths: &[PathBuf], records: &[ScoreRecord]) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    let mut first_failure: Option<ScraperError> = None;

    for path in paths {
        match write_replacing(path, &bytes) {
            Ok(()) => info!("Scores saved to {} (total: {})", path.display(), records.len()),
            Err(source) => {
                warn!("Failed to write snapshot to {}: {}", path.display(), source);
                first_failure.get_or_insert(ScraperError::Persistence {
                    path: path.clone(),
                    source,
                });
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Writes to a sibling temp file and renames it over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<ScoreRecord> {
        vec![
            ScoreRecord::new("A", Some("X".into()), 95.5, Some("2024/01/01".into()), "精密採点Ai"),
            ScoreRecord::new("B", None, 80.0, None, "精密採点Ai Heart"),
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        assert!(load(&dir.path().join("scores.json")).is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn loads_records_without_date() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(
            &path,
            r#"[{"songName":"A","artist":"X","score":85,"scoringType":"T"}]"#,
        )
        .unwrap();
        let records = load(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].score, 85.0);
    }

    #[test]
    fn save_writes_identical_bytes_everywhere() {
        let dir = tempdir().unwrap();
        let primary = dir.path().join("scores.json");
        let dashboard = dir.path().join("public").join("scores.json");
        let store = SnapshotStore::new(vec![primary.clone(), dashboard.clone()]);

        store.save(&sample()).unwrap();

        let a = fs::read(&primary).unwrap();
        let b = fs::read(&dashboard).unwrap();
        assert_eq!(a, b);
        assert_eq!(store.load_primary(), sample());
        assert!(!dir.path().join("scores.json.tmp").exists());
    }

    #[test]
    fn save_replaces_rather_than_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let store = SnapshotStore::new(vec![path.clone()]);
        store.save(&sample()).unwrap();
        store.save(&sample()[..1]).unwrap();
        assert_eq!(load(&path).len(), 1);
    }

    #[test]
    fn failing_destination_is_named_and_others_still_written() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let bad = blocker.join("scores.json");
        let good = dir.path().join("scores.json");

        let err = save(&[bad.clone(), good.clone()], &sample()).unwrap_err();
        match err {
            ScraperError::Persistence { path, .. } => assert_eq!(path, bad),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(load(&good), sample());
    }
}
