//! Sheet Client - synchronization client for the operations dashboard
//!
//! Keeps a local, fully typed copy of every property's operational data
//! in sync with a spreadsheet-backed web endpoint: fetch and normalize
//! on startup, optimistic local writes with best-effort POSTs, and
//! debounced re-fetches after mutations that other stations may race
//! on.

pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod store;
pub mod sync;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::SheetClient;
pub use store::{Action, AppState, StateStore, StoreEvent};
pub use sync::{MutationDispatcher, Refresher, SyncWorker, fetch_and_apply};

// Re-export shared types for convenience
pub use shared::models::{PropertyData, PropertyId};
pub use shared::wire::{MutationKind, MutationRequest, RawPropertyData, SheetEnvelope};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::store::FileSnapshot;

/// A fully wired sync engine. Spawn [`Engine::worker`] with
/// `tokio::spawn(worker.run())` and drive mutations through the
/// dispatcher.
pub struct Engine {
    pub store: Arc<StateStore>,
    pub dispatcher: MutationDispatcher,
    pub worker: SyncWorker,
}

/// Assemble store, dispatcher and worker from one configuration.
///
/// When `snapshot_dir` is set, state is reloaded from the snapshot and
/// persisted on every change; otherwise the store is memory-only.
pub fn bootstrap(config: &ClientConfig, shutdown: CancellationToken) -> Engine {
    let store = match &config.snapshot_dir {
        Some(dir) => Arc::new(StateStore::load_or_new(
            &config.endpoint_url,
            Box::new(FileSnapshot::new(dir)),
        )),
        None => Arc::new(StateStore::new(AppState::new(&config.endpoint_url), None)),
    };
    let client = SheetClient::new(config);
    let dispatcher = MutationDispatcher::new(store.clone(), client.clone());
    let worker = SyncWorker::new(store.clone(), client, config, shutdown);
    Engine {
        store,
        dispatcher,
        worker,
    }
}
