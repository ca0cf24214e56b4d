//! Integration Model
//!
//! A single process-wide record describing the remote sheet endpoint
//! and the outcome of the most recent synchronization attempt.

use serde::{Deserialize, Serialize};

pub const GLOBAL_SYNC_ID: &str = "global-sync";

/// Connection state of the sheet integration. `SyncFailed` is set
/// when a write is rejected or unreachable, so the UI can surface the
/// difference between "saved and synced" and "saved locally only".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationStatus {
    #[default]
    Disconnected,
    Connected,
    SyncFailed,
}

/// The sheet-endpoint integration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: IntegrationStatus,
    /// Unix millis of the last successful sync, 0 if never.
    #[serde(default)]
    pub last_sync: i64,
    #[serde(default)]
    pub url: String,
}

impl Integration {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: GLOBAL_SYNC_ID.to_string(),
            name: "Google Sheets & Drive direct integration".to_string(),
            status: IntegrationStatus::Disconnected,
            last_sync: 0,
            url: url.into(),
        }
    }

    /// Stamp a successful sync.
    pub fn mark_connected(&mut self, now: i64) {
        self.status = IntegrationStatus::Connected;
        self.last_sync = now;
    }

    /// Record a failed write without touching `last_sync`.
    pub fn mark_sync_failed(&mut self) {
        self.status = IntegrationStatus::SyncFailed;
    }
}
