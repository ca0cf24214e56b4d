//! Client configuration

use std::path::PathBuf;

/// Configuration for the sheet sync engine.
///
/// The endpoint is a scripted spreadsheet, not a scalable API; the
/// stagger and debounce defaults exist to keep it from being hammered
/// by back-to-back requests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Apps Script web endpoint URL
    pub endpoint_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Trailing-edge debounce for post-mutation resyncs, per property
    pub resync_debounce_ms: u64,

    /// Delay between sequential property fetches during startup
    pub startup_stagger_ms: u64,

    /// Directory for the persisted state snapshot; `None` disables
    /// persistence
    pub snapshot_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration pointing at the given endpoint.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout: 30,
            resync_debounce_ms: 2_000,
            startup_stagger_ms: 1_500,
            snapshot_dir: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the post-mutation resync debounce window
    pub fn with_resync_debounce_ms(mut self, millis: u64) -> Self {
        self.resync_debounce_ms = millis;
        self
    }

    /// Set the startup inter-property fetch delay
    pub fn with_startup_stagger_ms(mut self, millis: u64) -> Self {
        self.startup_stagger_ms = millis;
        self
    }

    /// Enable snapshot persistence under the given directory
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }
}
