//! Background resynchronization worker
//!
//! Owns the startup fetch of every property and the debounced
//! re-fetches triggered by store events. Debouncing is trailing-edge
//! and per property: each resync hint re-arms that property's deadline,
//! so a burst of saves costs one fetch after the burst goes quiet.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::models::PropertyId;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::SheetClient;
use crate::config::ClientConfig;
use crate::store::StateStore;
use crate::sync::fetch_and_apply_logged;

pub struct SyncWorker {
    store: Arc<StateStore>,
    client: SheetClient,
    debounce: Duration,
    stagger: Duration,
    shutdown: CancellationToken,
    refreshing: Arc<AtomicBool>,
}

impl SyncWorker {
    pub fn new(
        store: Arc<StateStore>,
        client: SheetClient,
        config: &ClientConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            client,
            debounce: Duration::from_millis(config.resync_debounce_ms),
            stagger: Duration::from_millis(config.startup_stagger_ms),
            shutdown,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for on-demand refreshes of the active property.
    pub fn refresher(&self) -> Refresher {
        Refresher {
            store: self.store.clone(),
            client: self.client.clone(),
            refreshing: self.refreshing.clone(),
        }
    }

    pub async fn run(self) {
        tracing::info!("sync worker started");

        // Subscribe before the startup fetches so saves made while they
        // run still get their resync.
        let mut events = self.store.subscribe();

        // Active property first, the rest staggered behind it.
        let first = self.store.active_property();
        fetch_and_apply_logged(&self.client, &self.store, first).await;
        for property in PropertyId::ALL {
            if property == first {
                continue;
            }
            sleep(self.stagger).await;
            if self.shutdown.is_cancelled() {
                tracing::info!("sync worker stopped");
                return;
            }
            fetch_and_apply_logged(&self.client, &self.store, property).await;
        }

        let mut pending: HashMap<PropertyId, Instant> = HashMap::new();
        loop {
            // Far-future placeholder keeps the select arm alive when
            // nothing is pending.
            let deadline = pending
                .values()
                .min()
                .copied()
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    // Flush anything still armed so the last save is
                    // not lost between machines.
                    for property in pending.into_keys() {
                        fetch_and_apply_logged(&self.client, &self.store, property).await;
                    }
                    break;
                }
                _ = sleep_until(deadline), if !pending.is_empty() => {
                    let now = Instant::now();
                    let due: Vec<PropertyId> = pending
                        .iter()
                        .filter(|(_, at)| **at <= now)
                        .map(|(p, _)| *p)
                        .collect();
                    for property in due {
                        pending.remove(&property);
                        fetch_and_apply_logged(&self.client, &self.store, property).await;
                    }
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        if let Some(property) = event.resync {
                            // Trailing edge: every hint pushes the
                            // deadline out again.
                            pending.insert(property, Instant::now() + self.debounce);
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "store events lagged, scheduling full resync");
                        let at = Instant::now() + self.debounce;
                        for property in PropertyId::ALL {
                            pending.insert(property, at);
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }

        tracing::info!("sync worker stopped");
    }
}

/// On-demand refresh of the active property, with a visible
/// in-progress flag for the UI.
#[derive(Clone)]
pub struct Refresher {
    store: Arc<StateStore>,
    client: SheetClient,
    refreshing: Arc<AtomicBool>,
}

impl Refresher {
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Relaxed)
    }

    /// Fetch the active property now, bypassing the debounce.
    pub async fn refresh_now(&self) {
        let property = self.store.active_property();
        self.refreshing.store(true, Ordering::Relaxed);
        fetch_and_apply_logged(&self.client, &self.store, property).await;
        self.refreshing.store(false, Ordering::Relaxed);
    }
}
