//! Snapshot persistence for the application state
//!
//! The whole state tree is written as one JSON blob under a versioned
//! key on every change. Bumping [`STATE_VERSION`] is the only
//! migration mechanism: old snapshots are abandoned, not transformed.

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::store::AppState;

/// Bump to abandon snapshots written by incompatible versions.
pub const STATE_VERSION: u32 = 1;

/// Coarse-grained whole-tree persistence.
pub trait SnapshotStore: Send + Sync {
    /// Persist the full state tree.
    fn save(&self, state: &AppState) -> io::Result<()>;

    /// Load the last persisted tree, if a readable one exists under
    /// the current version key.
    fn load(&self) -> Option<AppState>;
}

/// JSON-file snapshot under a versioned file name.
#[derive(Debug)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir
                .as_ref()
                .join(format!("dashboard_state_v{STATE_VERSION}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshot {
    fn save(&self, state: &AppState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(state).map_err(io::Error::other)?;
        std::fs::write(&self.path, json)
    }

    fn load(&self) -> Option<AppState> {
        let json = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "discarding unreadable snapshot: {e}");
                None
            }
        }
    }
}

/// In-memory snapshot, for tests.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    blob: Mutex<Option<String>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshot {
    fn save(&self, state: &AppState) -> io::Result<()> {
        let json = serde_json::to_string(state).map_err(io::Error::other)?;
        *self.blob.lock() = Some(json);
        Ok(())
    }

    fn load(&self) -> Option<AppState> {
        let guard = self.blob.lock();
        serde_json::from_str(guard.as_deref()?).ok()
    }
}
