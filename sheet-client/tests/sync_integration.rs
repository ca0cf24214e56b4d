//! End-to-end tests against a mock sheet endpoint.
//!
//! The mock serves canned GET envelopes per hotel and records every
//! POST body, which lets these tests observe the full loop: fetch,
//! normalize, optimistic write, ack handling, debounced resync.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;

use shared::models::{IntegrationStatus, PropertyId, Supplier};
use sheet_client::store::MemorySnapshot;
use sheet_client::{
    Action, AppState, ClientConfig, MutationDispatcher, SheetClient, StateStore, SyncWorker,
    bootstrap, fetch_and_apply,
};

#[derive(Default)]
struct MockSheet {
    /// Canned `data` payload served per hotel id.
    data: Mutex<HashMap<String, Value>>,
    /// GET counter per hotel id.
    fetches: Mutex<HashMap<String, usize>>,
    /// Every POST body received, in order.
    posts: Mutex<Vec<Value>>,
    /// Answer POSTs with an error envelope when set.
    fail_posts: AtomicBool,
}

impl MockSheet {
    fn fetch_count(&self, property: PropertyId) -> usize {
        self.fetches
            .lock()
            .get(property.as_str())
            .copied()
            .unwrap_or(0)
    }
}

async fn handle_get(
    State(sheet): State<Arc<MockSheet>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let hotel = params.get("hotel").cloned().unwrap_or_default();
    *sheet.fetches.lock().entry(hotel.clone()).or_insert(0) += 1;
    let data = sheet
        .data
        .lock()
        .get(&hotel)
        .cloned()
        .unwrap_or_else(|| json!({}));
    Json(json!({ "status": "success", "data": data }))
}

async fn handle_post(State(sheet): State<Arc<MockSheet>>, Json(body): Json<Value>) -> Json<Value> {
    sheet.posts.lock().push(body);
    if sheet.fail_posts.load(Ordering::Relaxed) {
        Json(json!({ "status": "error", "message": "script failure" }))
    } else {
        Json(json!({ "status": "success" }))
    }
}

/// Bind the mock on an ephemeral port and return its endpoint URL.
async fn spawn_mock(sheet: Arc<MockSheet>) -> String {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let app = Router::new()
        .route("/", get(handle_get).post(handle_post))
        .with_state(sheet);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

/// Poll `cond` until it holds, panicking after five seconds.
async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        sleep(Duration::from_millis(25)).await;
    }
    panic!("timed out waiting for: {what}");
}

fn test_config(endpoint: &str) -> ClientConfig {
    ClientConfig::new(endpoint)
        .with_resync_debounce_ms(150)
        .with_startup_stagger_ms(10)
}

fn test_store() -> Arc<StateStore> {
    Arc::new(StateStore::new(
        AppState::new("https://example.test/exec"),
        Some(Box::new(MemorySnapshot::new())),
    ))
}

#[tokio::test]
async fn fetch_normalizes_sheet_payload() {
    let sheet = Arc::new(MockSheet::default());
    // Numeric ids, a JSON-encoded array cell, no suppliers collection.
    sheet.data.lock().insert(
        "VILLAGE".into(),
        json!({
            "apartments": {
                "0-5": { "id": 5, "floor": 0, "roomNumber": 5, "hasSafe": "Sim" }
            },
            "employees": [
                { "id": 5, "name": "Ana", "role": "Camareira", "sectorId": 3,
                  "active": true, "uniforms": "[{\"name\":\"Camisa\",\"quantity\":2}]" },
                { "id": 12, "name": "Bia", "active": true }
            ]
        }),
    );
    let endpoint = spawn_mock(sheet).await;

    let store = test_store();
    let client = SheetClient::new(&test_config(&endpoint));
    fetch_and_apply(&client, &store, PropertyId::Village)
        .await
        .unwrap();

    store.with(|s| {
        let data = &s.properties[&PropertyId::Village];
        assert_eq!(data.apartments["0-5"].id, "5");
        assert!(data.apartments["0-5"].has_safe);
        let ids: Vec<&str> = data.employees.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["5", "12"]);
        assert_eq!(data.employees[0].sector_id, "3");
        assert_eq!(data.employees[0].uniforms[0].name, "Camisa");
        assert!(data.suppliers.is_empty());
        assert_eq!(s.integration.status, IntegrationStatus::Connected);
        assert!(s.integration.last_sync > 0);
    });
}

#[tokio::test]
async fn save_posts_tagged_flattened_body() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let client = SheetClient::new(&test_config(&endpoint));
    let dispatcher = MutationDispatcher::new(store.clone(), client);

    dispatcher
        .save_supplier(Supplier {
            id: "7".into(),
            name: "Acme".into(),
            contact: "11 99999-0000".into(),
            category: "Limpeza".into(),
        })
        .unwrap();

    // Local copy is updated before the POST resolves.
    assert_eq!(
        store.with(|s| s.properties[&PropertyId::Village].suppliers.len()),
        1
    );

    wait_until("mutation POST", || !sheet.posts.lock().is_empty()).await;
    let body = sheet.posts.lock()[0].clone();
    assert_eq!(body["hotel"], "VILLAGE");
    assert_eq!(body["dataType"], "SUPPLIER");
    // Entity fields sit at the top level, not nested.
    assert_eq!(body["name"], "Acme");
    assert!(body.get("newFiles").is_none());

    wait_until("sync ack", || {
        store.with(|s| s.integration.status == IntegrationStatus::Connected)
    })
    .await;
}

#[tokio::test]
async fn rejected_ack_marks_sync_failed_and_keeps_local_data() {
    let sheet = Arc::new(MockSheet::default());
    sheet.fail_posts.store(true, Ordering::Relaxed);
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let client = SheetClient::new(&test_config(&endpoint));
    let dispatcher = MutationDispatcher::new(store.clone(), client);

    dispatcher
        .save_supplier(Supplier {
            id: "7".into(),
            name: "Acme".into(),
            ..Default::default()
        })
        .unwrap();

    wait_until("failure indicator", || {
        store.with(|s| s.integration.status == IntegrationStatus::SyncFailed)
    })
    .await;
    // The optimistic write is never rolled back.
    assert_eq!(
        store.with(|s| s.properties[&PropertyId::Village].suppliers.len()),
        1
    );
}

#[tokio::test]
async fn worker_startup_fetches_every_property() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let config = test_config(&endpoint);
    let client = SheetClient::new(&config);
    let shutdown = CancellationToken::new();
    let worker = SyncWorker::new(store, client, &config, shutdown.clone());
    tokio::spawn(worker.run());

    wait_until("startup fetch of all properties", || {
        PropertyId::ALL.iter().all(|p| sheet.fetch_count(*p) >= 1)
    })
    .await;
    shutdown.cancel();
}

#[tokio::test]
async fn rapid_saves_coalesce_into_one_refetch() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let config = test_config(&endpoint);
    let client = SheetClient::new(&config);
    let dispatcher = MutationDispatcher::new(store.clone(), client.clone());
    let shutdown = CancellationToken::new();
    let worker = SyncWorker::new(store.clone(), client, &config, shutdown.clone());
    tokio::spawn(worker.run());

    wait_until("startup fetch of all properties", || {
        PropertyId::ALL.iter().all(|p| sheet.fetch_count(*p) >= 1)
    })
    .await;
    let baseline = sheet.fetch_count(PropertyId::Village);

    // Two saves well inside the debounce window.
    dispatcher
        .save_employee(shared::models::Employee {
            id: "1".into(),
            name: "Ana".into(),
            active: true,
            ..Default::default()
        })
        .unwrap();
    sleep(Duration::from_millis(30)).await;
    dispatcher
        .save_employee(shared::models::Employee {
            id: "1".into(),
            name: "Ana Paula".into(),
            active: true,
            ..Default::default()
        })
        .unwrap();

    sleep(Duration::from_millis(600)).await;
    assert_eq!(sheet.fetch_count(PropertyId::Village), baseline + 1);
    shutdown.cancel();
}

#[tokio::test]
async fn shutdown_flushes_pending_resync() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let config = ClientConfig::new(&endpoint)
        .with_resync_debounce_ms(10_000)
        .with_startup_stagger_ms(10);
    let client = SheetClient::new(&config);
    let shutdown = CancellationToken::new();
    let worker = SyncWorker::new(store.clone(), client, &config, shutdown.clone());
    tokio::spawn(worker.run());

    wait_until("startup fetch of all properties", || {
        PropertyId::ALL.iter().all(|p| sheet.fetch_count(*p) >= 1)
    })
    .await;
    let baseline = sheet.fetch_count(PropertyId::Village);

    // Arm a resync that would only fire in ten seconds, then shut
    // down; the worker flushes it instead of dropping it.
    store.dispatch(Action::UpsertSector {
        property: PropertyId::Village,
        sector: Default::default(),
    });
    sleep(Duration::from_millis(50)).await;
    shutdown.cancel();

    wait_until("flush fetch", || {
        sheet.fetch_count(PropertyId::Village) > baseline
    })
    .await;
}

#[tokio::test]
async fn bootstrapped_engine_persists_state_across_restarts() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&endpoint).with_snapshot_dir(dir.path());

    {
        let engine = bootstrap(&config, CancellationToken::new());
        engine
            .dispatcher
            .save_supplier(Supplier {
                id: "7".into(),
                name: "Acme".into(),
                ..Default::default()
            })
            .unwrap();
        wait_until("mutation POST", || !sheet.posts.lock().is_empty()).await;
    }

    // A fresh engine over the same snapshot directory sees the data.
    let engine = bootstrap(&config, CancellationToken::new());
    engine.store.with(|s| {
        assert_eq!(s.properties[&PropertyId::Village].suppliers[0].name, "Acme");
        assert!(s.current_user.is_none());
    });
}

#[tokio::test]
async fn manual_refresh_fetches_active_property() {
    let sheet = Arc::new(MockSheet::default());
    let endpoint = spawn_mock(sheet.clone()).await;

    let store = test_store();
    let config = test_config(&endpoint);
    let client = SheetClient::new(&config);
    let worker = SyncWorker::new(store.clone(), client, &config, CancellationToken::new());
    let refresher = worker.refresher();

    assert!(!refresher.is_refreshing());
    refresher.refresh_now().await;
    assert!(!refresher.is_refreshing());
    assert_eq!(sheet.fetch_count(PropertyId::Village), 1);
    store.with(|s| assert_eq!(s.integration.status, IntegrationStatus::Connected));
}
