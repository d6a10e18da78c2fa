//! JSON save files.
//!
//! A save is a pretty-printed [`GameSnapshot`]. Writes go to a sibling
//! temporary file first and are renamed into place, so an interrupted
//! write never leaves a truncated save behind.

use std::path::Path;

use founder_core::GameSnapshot;
use tracing::{debug, info};

use crate::error::EngineError;

/// Read the snapshot at `path`. A missing file is `Ok(None)`.
pub fn load_snapshot(path: &Path) -> Result<Option<GameSnapshot>, EngineError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no save file");
            return Ok(None);
        }
        Err(err) => return Err(save_error(path, &err)),
    };
    let snapshot = serde_json::from_str(&contents).map_err(|err| save_error(path, &err))?;
    info!(path = %path.display(), "save file loaded");
    Ok(Some(snapshot))
}

/// Write `snapshot` to `path`, replacing any previous save.
pub fn write_snapshot(path: &Path, snapshot: &GameSnapshot) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|err| save_error(path, &err))?;
    let staging = path.with_extension("tmp");
    std::fs::write(&staging, json).map_err(|err| save_error(&staging, &err))?;
    std::fs::rename(&staging, path).map_err(|err| save_error(path, &err))?;
    info!(path = %path.display(), captured_at = %snapshot.captured_at, "game saved");
    Ok(())
}

fn save_error(path: &Path, err: &dyn std::error::Error) -> EngineError {
    EngineError::Save {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use founder_core::{FounderConfig, Game, ManualTimeSource};
    use founder_types::Catalog;

    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("founder-save-{}.json", uuid::Uuid::new_v4()))
    }

    fn game() -> Game {
        let time = ManualTimeSource::new(Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap());
        Game::new(FounderConfig::default(), Catalog::new(), Arc::new(time))
    }

    #[test]
    fn missing_file_is_not_an_error() {
        assert!(load_snapshot(&scratch_path()).unwrap().is_none());
    }

    #[test]
    fn written_save_loads_back() {
        let path = scratch_path();
        let snapshot = game().capture_state();
        write_snapshot(&path, &snapshot).unwrap();

        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded.captured_at, snapshot.captured_at);
        assert_eq!(loaded.clock.tick, snapshot.clock.tick);
        assert!(!path.with_extension("tmp").exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_save_is_reported() {
        let path = scratch_path();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&path), Err(EngineError::Save { .. })));
        std::fs::remove_file(&path).unwrap();
    }
}
