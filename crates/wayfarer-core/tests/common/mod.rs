#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use wayfarer_core::{
    params::ListItineraries, CacheConfig, Itinerary, ItineraryApi, ItineraryCache,
    ItineraryCacheBuilder, Result, WayfarerError,
};

/// Scripted stand-in for the itinerary server.
///
/// Mutation failures are keyed by itinerary id for updates and deletes, and
/// by payload title for creates.
pub struct MockApi {
    online: AtomicBool,
    list_body: Mutex<Value>,
    list_failure: Mutex<Option<u16>>,
    failures: Mutex<HashMap<String, u16>>,
    next_id: AtomicUsize,
    latency: Mutex<Duration>,
    in_flight: AtomicUsize,
    /// Highest number of list or mutation calls seen running at once
    pub peak_in_flight: AtomicUsize,
    pub probes: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub created: Mutex<Vec<Value>>,
    pub updated: Mutex<Vec<(String, Value)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            online: AtomicBool::new(true),
            list_body: Mutex::new(json!([])),
            list_failure: Mutex::new(None),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            latency: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        })
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn set_list_body(&self, body: Value) {
        *self.list_body.lock().unwrap() = body;
        *self.list_failure.lock().unwrap() = None;
    }

    pub fn fail_list(&self, status: u16) {
        *self.list_failure.lock().unwrap() = Some(status);
    }

    pub fn fail_mutation(&self, key: &str, status: u16) {
        self.failures.lock().unwrap().insert(key.to_string(), status);
    }

    pub fn heal_mutation(&self, key: &str) {
        self.failures.lock().unwrap().remove(key);
    }

    /// Makes every list and mutation call take `latency` to answer.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    async fn respond_slowly(&self) {
        let latency = *self.latency.lock().unwrap();
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn reachable(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(WayfarerError::Timeout {
                operation: "request".to_string(),
            })
        }
    }

    fn scripted_failure(&self, key: &str) -> Result<()> {
        match self.failures.lock().unwrap().get(key) {
            Some(401) => Err(WayfarerError::Unauthorized),
            Some(status) => Err(WayfarerError::Http {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ItineraryApi for MockApi {
    async fn health(&self) -> Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.reachable()
    }

    async fn list_itineraries(&self, _params: &ListItineraries) -> Result<Value> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        self.respond_slowly().await;
        match *self.list_failure.lock().unwrap() {
            Some(401) => Err(WayfarerError::Unauthorized),
            Some(status) => Err(WayfarerError::Http {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(self.list_body.lock().unwrap().clone()),
        }
    }

    async fn create_itinerary(&self, payload: &Value) -> Result<Itinerary> {
        self.reachable()?;
        self.respond_slowly().await;
        let title = payload.get("title").and_then(Value::as_str).unwrap_or("");
        self.scripted_failure(title)?;

        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.lock().unwrap().push(payload.clone());
        Ok(Itinerary::from_payload(&id, payload))
    }

    async fn update_itinerary(&self, id: &str, payload: &Value) -> Result<Itinerary> {
        self.reachable()?;
        self.respond_slowly().await;
        self.scripted_failure(id)?;

        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), payload.clone()));
        Ok(Itinerary::from_payload(id, payload))
    }

    async fn delete_itinerary(&self, id: &str) -> Result<()> {
        self.reachable()?;
        self.respond_slowly().await;
        self.scripted_failure(id)?;

        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

/// Configuration that probes on every check, so tests can flip the mock
/// between online and offline without waiting.
pub fn test_config() -> CacheConfig {
    CacheConfig::default().with_freshness_window(Duration::ZERO)
}

/// Builds a cache over a fresh SQLite file and the given mock server.
pub async fn create_test_cache(api: Arc<MockApi>) -> (TempDir, ItineraryCache) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let cache = open_cache(temp_dir.path(), api).await;
    (temp_dir, cache)
}

/// Builds a cache over the database in `dir`, as a restarted process would.
pub async fn open_cache(dir: &Path, api: Arc<MockApi>) -> ItineraryCache {
    ItineraryCacheBuilder::new()
        .with_database_path(Some(dir.join("wayfarer.db")))
        .with_config(test_config())
        .with_api(api)
        .build()
        .await
        .expect("Failed to create cache")
}

pub fn itinerary_json(id: &str, title: &str) -> Value {
    json!({ "_id": id, "title": title })
}
