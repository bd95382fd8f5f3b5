//! Timer session persistence with file locking.
//!
//! This module handles saving and loading the contraction timer session
//! with proper file locking to prevent concurrent access issues.

use crate::timer::ContractionTimer;
use crate::{AlertThresholds, Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl ContractionTimer {
    /// Load a timer session from a file with shared locking
    ///
    /// Returns an empty session if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty session.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No timer session found, starting a new one");
            return Ok(Self::new());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open timer session {:?}: {}. Starting a new one.",
                    path,
                    e
                );
                return Ok(Self::new());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock timer session {:?}: {}. Starting a new one.",
                path,
                e
            );
            return Ok(Self::new());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read timer session {:?}: {}. Starting a new one.",
                path,
                e
            );
            return Ok(Self::new());
        }

        file.unlock()?;

        match serde_json::from_str::<ContractionTimer>(&contents) {
            Ok(mut timer) => {
                let dropped = timer.discard_incomplete();
                if dropped > 0 {
                    tracing::warn!(
                        "Dropped {} unfinished contractions from history in {:?}",
                        dropped,
                        path
                    );
                }
                timer.recompute_stats();
                tracing::debug!(
                    "Loaded timer session from {:?} ({} contractions)",
                    path,
                    timer.history().len()
                );
                Ok(timer)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse timer session {:?}: {}. Starting a new one.",
                    path,
                    e
                );
                Ok(Self::new())
            }
        }
    }

    /// Save the timer session to a file with exclusive locking
    ///
    /// Atomically writes the session by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("session path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(parent)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old session file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved timer session to {:?}", path);
        Ok(())
    }

    /// Load the session, apply `thresholds`, modify it, and save it back
    pub fn update<F, T>(path: &Path, thresholds: AlertThresholds, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut ContractionTimer) -> Result<T>,
    {
        let mut timer = Self::load(path)?;
        timer.set_thresholds(thresholds);
        let outcome = f(&mut timer)?;
        timer.save(path)?;
        Ok((timer, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimerState;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_timer() -> ContractionTimer {
        let t0 = Utc.with_ymd_and_hms(2025, 8, 10, 3, 0, 0).unwrap();
        let mut timer = ContractionTimer::new();
        timer.start(t0).unwrap();
        timer.stop(t0 + Duration::seconds(70)).unwrap();
        timer.start(t0 + Duration::seconds(240)).unwrap();
        timer.stop(t0 + Duration::seconds(320)).unwrap();
        timer
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("timer").join("session.json");

        let mut timer = sample_timer();
        let running_start = Utc.with_ymd_and_hms(2025, 8, 10, 3, 10, 0).unwrap();
        timer.start(running_start).unwrap();
        timer.save(&path).unwrap();

        let loaded = ContractionTimer::load(&path).unwrap();
        assert_eq!(loaded.history(), timer.history());
        assert_eq!(loaded.state(), TimerState::Running);
        assert_eq!(loaded.current().unwrap().start_time, running_start);

        // Stats are recomputed rather than stored
        assert_eq!(loaded.stats(), timer.stats());
        assert!(loaded.should_alert());
    }

    #[test]
    fn test_load_nonexistent_returns_new() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let timer = ContractionTimer::load(&path).unwrap();
        assert!(timer.history().is_empty());
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_corrupted_session_returns_new() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");

        std::fs::write(&path, "{ invalid json }").unwrap();

        let timer = ContractionTimer::load(&path).unwrap();
        assert!(timer.history().is_empty());
        assert!(timer.current().is_none());
    }

    #[test]
    fn test_unfinished_history_entries_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");

        let contents = r#"{
            "contractions": [
                {
                    "id": "6f1c2d0e-8d1a-4a57-9a0e-3c1f2b7a9e10",
                    "start_time": "2025-08-10T03:04:00Z",
                    "end_time": null,
                    "duration_seconds": null
                },
                {
                    "id": "0b7e5a52-1f3e-4c8e-a6b9-2e9d4f6c1a33",
                    "start_time": "2025-08-10T03:00:00Z",
                    "end_time": "2025-08-10T03:01:10Z",
                    "duration_seconds": 70
                }
            ],
            "current": null
        }"#;
        std::fs::write(&path, contents).unwrap();

        let timer = ContractionTimer::load(&path).unwrap();
        assert_eq!(timer.history().len(), 1);
        assert_eq!(timer.history()[0].duration_seconds, Some(70));
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        sample_timer().save(&path).unwrap();

        let newest = ContractionTimer::load(&path).unwrap().history()[0].id;
        let (timer, deleted) =
            ContractionTimer::update(&path, AlertThresholds::default(), |timer| {
                Ok(timer.delete(&newest))
            })
            .unwrap();

        assert!(deleted);
        assert_eq!(timer.history().len(), 1);

        let loaded = ContractionTimer::load(&path).unwrap();
        assert_eq!(loaded.history().len(), 1);
        assert!(!loaded.should_alert());
    }

    #[test]
    fn test_update_error_does_not_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        sample_timer().save(&path).unwrap();

        let result = ContractionTimer::update(&path, AlertThresholds::default(), |timer| {
            timer.clear();
            timer.stop(Utc::now()).map(|_| ())
        });
        assert!(matches!(result, Err(Error::NoContractionRunning)));

        let loaded = ContractionTimer::load(&path).unwrap();
        assert_eq!(loaded.history().len(), 2);
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");

        ContractionTimer::new().save(&path).unwrap();

        // Verify session file exists and no stray temp files remain
        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "session.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only session.json, found extras: {:?}",
            extras
        );
    }
}
