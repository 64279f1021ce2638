//! Per-stage progress: best score and whether the stage was ever passed.
//! Stored as JSON.

use crate::loader::{DataLoadError, Format, deserialize_str};
use nimons_core::session::GameReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub best_score: u32,
    pub passed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStore {
    stages: BTreeMap<String, StageProgress>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a progress file. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        if !path.exists() {
            debug!(file = %path.display(), "no progress file yet");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        deserialize_str(&content, Format::Json, path)
    }

    /// Write the store as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), DataLoadError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| DataLoadError::Serialize {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, stage_id: &str) -> Option<StageProgress> {
        self.stages.get(stage_id).copied()
    }

    pub fn is_passed(&self, stage_id: &str) -> bool {
        self.get(stage_id).is_some_and(|p| p.passed)
    }

    /// Fold a finished game in. Keeps the best score; a pass is never
    /// revoked. Returns true when the score is a new best.
    pub fn record(&mut self, report: &GameReport) -> bool {
        let entry = self.stages.entry(report.stage_id.clone()).or_default();
        let new_best = report.score > entry.best_score;
        if new_best {
            entry.best_score = report.score;
        }
        entry.passed |= report.passed;
        info!(
            stage = %report.stage_id,
            score = report.score,
            best = entry.best_score,
            passed = entry.passed,
            "progress recorded"
        );
        new_best
    }

    pub fn stages(&self) -> impl Iterator<Item = (&str, StageProgress)> {
        self.stages.iter().map(|(id, p)| (id.as_str(), *p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{cleanup, make_test_dir};

    fn report(stage: &str, score: u32, passed: bool) -> GameReport {
        GameReport {
            stage_id: stage.to_string(),
            score,
            passed,
            completed: 0,
            failed: 0,
            expired: 0,
        }
    }

    #[test]
    fn best_score_is_kept() {
        let mut store = ProgressStore::new();
        assert!(store.record(&report("stage-1", 80, false)));
        assert!(!store.record(&report("stage-1", 50, false)));
        assert!(store.record(&report("stage-1", 120, true)));
        assert_eq!(
            store.get("stage-1"),
            Some(StageProgress {
                best_score: 120,
                passed: true
            })
        );
    }

    #[test]
    fn pass_is_sticky() {
        let mut store = ProgressStore::new();
        store.record(&report("stage-2", 150, true));
        store.record(&report("stage-2", 10, false));
        assert!(store.is_passed("stage-2"));
        assert!(!store.is_passed("stage-3"));
    }

    #[test]
    fn save_then_load() {
        let dir = make_test_dir("progress_save");
        let path = dir.join("saves").join("progress.json");
        let mut store = ProgressStore::new();
        store.record(&report("stage-1", 90, false));
        store.record(&report("stage-2", 130, true));
        store.save(&path).unwrap();

        let loaded = ProgressStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.stages().count(), 2);
        cleanup(&dir);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = make_test_dir("progress_missing");
        let store = ProgressStore::load(&dir.join("progress.json")).unwrap();
        assert_eq!(store, ProgressStore::new());
        cleanup(&dir);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = make_test_dir("progress_corrupt");
        let path = dir.join("progress.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ProgressStore::load(&path),
            Err(DataLoadError::Parse { .. })
        ));
        cleanup(&dir);
    }
}
