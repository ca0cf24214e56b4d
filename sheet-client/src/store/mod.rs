//! Local State Store
//!
//! Single source of truth for the UI. Components read through
//! [`StateStore::with`] and change state exclusively by dispatching
//! [`Action`]s; the store applies the reducer, persists the whole tree
//! and broadcasts a [`StoreEvent`] so the sync worker can react.
//!
//! Dispatching never contacts the remote backend itself; telling the
//! sheet script is the mutation dispatcher's job.

mod actions;
mod snapshot;

pub use actions::{Action, reduce};
pub use snapshot::{FileSnapshot, MemorySnapshot, STATE_VERSION, SnapshotStore};

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::models::{Integration, PropertyData, PropertyId};
use tokio::sync::broadcast;

/// Top-level navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewType {
    #[default]
    Dashboard,
    Apartments,
    Budgets,
    Employees,
    Inventory,
    Reports,
    Settings,
}

/// Access level of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Manager,
    Staff,
}

/// The signed-in user. Not persisted: a reload keeps the data but
/// forces re-authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
}

/// The whole application state tree, persisted wholesale on every
/// change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_view: ViewType,
    pub current_property: PropertyId,
    pub properties: HashMap<PropertyId, PropertyData>,
    pub selected_floor: Option<u32>,
    pub selected_apartment_id: Option<String>,
    pub selected_sector_id: Option<String>,
    pub integration: Integration,
    #[serde(skip)]
    pub current_user: Option<CurrentUser>,
}

impl AppState {
    /// Fresh state: all three properties empty, dashboard view,
    /// Village active.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            current_view: ViewType::Dashboard,
            current_property: PropertyId::Village,
            properties: PropertyId::ALL
                .iter()
                .map(|p| (*p, PropertyData::default()))
                .collect(),
            selected_floor: None,
            selected_apartment_id: None,
            selected_sector_id: None,
            integration: Integration::new(endpoint_url),
            current_user: None,
        }
    }

    /// The dataset of `property`, created empty on first touch.
    pub fn property_mut(&mut self, property: PropertyId) -> &mut PropertyData {
        self.properties.entry(property).or_default()
    }

    /// The active property's dataset.
    pub fn active_data(&self) -> &PropertyData {
        static EMPTY: std::sync::OnceLock<PropertyData> = std::sync::OnceLock::new();
        self.properties
            .get(&self.current_property)
            .unwrap_or_else(|| EMPTY.get_or_init(PropertyData::default))
    }
}

/// Notification that an action was applied.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    /// Property whose remote copy should be re-fetched, when the
    /// applied action warrants it.
    pub resync: Option<PropertyId>,
}

/// Thread-safe state container.
pub struct StateStore {
    inner: RwLock<AppState>,
    snapshot: Option<Box<dyn SnapshotStore>>,
    events: broadcast::Sender<StoreEvent>,
}

impl StateStore {
    const EVENT_CAPACITY: usize = 256;

    /// Wrap an existing state, persisting through `snapshot` if given.
    pub fn new(state: AppState, snapshot: Option<Box<dyn SnapshotStore>>) -> Self {
        let (events, _) = broadcast::channel(Self::EVENT_CAPACITY);
        Self {
            inner: RwLock::new(state),
            snapshot,
            events,
        }
    }

    /// Load the persisted state if one exists, otherwise start fresh.
    /// The loaded session field is always empty (see [`AppState`]).
    pub fn load_or_new(endpoint_url: &str, snapshot: Box<dyn SnapshotStore>) -> Self {
        let state = snapshot
            .load()
            .unwrap_or_else(|| AppState::new(endpoint_url));
        Self::new(state, Some(snapshot))
    }

    /// Apply an action, persist the tree, and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        let event = StoreEvent {
            resync: action.resync_property(),
        };
        {
            let mut state = self.inner.write();
            reduce(&mut state, action);
            if let Some(snapshot) = &self.snapshot {
                if let Err(e) = snapshot.save(&state) {
                    tracing::warn!("failed to persist state snapshot: {e}");
                }
            }
        }
        // Nobody listening is fine (tests, headless use).
        let _ = self.events.send(event);
    }

    /// Read access to the state tree.
    pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Clone of the full state, for callers that need ownership.
    pub fn state(&self) -> AppState {
        self.inner.read().clone()
    }

    /// The currently active property.
    pub fn active_property(&self) -> PropertyId {
        self.inner.read().current_property
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &self.inner.read())
            .field("persistent", &self.snapshot.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Supplier;

    #[test]
    fn dispatch_persists_every_change() {
        let snapshot = MemorySnapshot::new();
        let store = StateStore::load_or_new("https://example.test/exec", Box::new(snapshot));

        store.dispatch(Action::UpsertSupplier {
            property: PropertyId::Village,
            supplier: Supplier {
                id: "7".into(),
                name: "Acme".into(),
                ..Default::default()
            },
        });

        assert_eq!(
            store.with(|s| s.properties[&PropertyId::Village].suppliers.len()),
            1
        );
    }

    #[test]
    fn reload_keeps_data_but_drops_session() {
        let snapshot = std::sync::Arc::new(MemorySnapshot::new());

        {
            let store = StateStore::new(
                AppState::new("https://example.test/exec"),
                Some(Box::new(SharedSnapshot(snapshot.clone()))),
            );
            store.dispatch(Action::Login(CurrentUser {
                name: "Ana".into(),
                role: UserRole::Manager,
                sector_id: None,
            }));
            store.dispatch(Action::SetView(ViewType::Inventory));
        }

        let reloaded = StateStore::load_or_new(
            "https://example.test/exec",
            Box::new(SharedSnapshot(snapshot)),
        );
        assert_eq!(reloaded.with(|s| s.current_view), ViewType::Inventory);
        assert!(reloaded.with(|s| s.current_user.is_none()));
    }

    #[test]
    fn events_carry_resync_hint() {
        let store = StateStore::new(AppState::new("https://example.test/exec"), None);
        let mut rx = store.subscribe();

        store.dispatch(Action::UpsertSector {
            property: PropertyId::Village,
            sector: Default::default(),
        });
        store.dispatch(Action::SelectFloor(Some(1)));

        assert_eq!(rx.try_recv().unwrap().resync, Some(PropertyId::Village));
        assert_eq!(rx.try_recv().unwrap().resync, None);
    }

    #[test]
    fn snapshot_failure_does_not_block_dispatch() {
        struct FailingSnapshot;

        impl SnapshotStore for FailingSnapshot {
            fn save(&self, _: &AppState) -> std::io::Result<()> {
                Err(std::io::Error::other("disk full"))
            }
            fn load(&self) -> Option<AppState> {
                None
            }
        }

        let store = StateStore::new(
            AppState::new("https://example.test/exec"),
            Some(Box::new(FailingSnapshot)),
        );
        store.dispatch(Action::SetView(ViewType::Reports));
        // Persistence is best-effort; the in-memory state still moves.
        assert_eq!(store.with(|s| s.current_view), ViewType::Reports);
    }

    /// Adapter so two stores can share one in-memory snapshot.
    struct SharedSnapshot(std::sync::Arc<MemorySnapshot>);

    impl SnapshotStore for SharedSnapshot {
        fn save(&self, state: &AppState) -> std::io::Result<()> {
            self.0.save(state)
        }
        fn load(&self) -> Option<AppState> {
            self.0.load()
        }
    }
}
