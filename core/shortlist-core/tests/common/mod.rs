//! Shared fixtures for shortlist-core integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Map;
use shortlist_core::{
    CandidateItem, ComparisonItem, MemoryStore, RecordingBadgeSink, RemoteService, Result,
    ShortlistConfig, ShortlistEngine, ShortlistError,
};
use shortlist_protocol::{CreateSessionRequest, RemoveProductRequest};

/// Remote double that records every call and answers from a script.
#[derive(Default)]
pub struct ScriptedRemote {
    server_products: Mutex<Vec<ComparisonItem>>,
    offline: AtomicBool,
    pub created: Mutex<Vec<CreateSessionRequest>>,
    pub fetched: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<RemoveProductRequest>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serving(products: Vec<ComparisonItem>) -> Self {
        let remote = Self::default();
        *remote.server_products.lock().unwrap() = products;
        remote
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn total_calls(&self) -> usize {
        self.created.lock().unwrap().len()
            + self.fetched.lock().unwrap().len()
            + self.removed.lock().unwrap().len()
    }

    fn check_online(&self, operation: &str) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ShortlistError::remote(operation, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteService for ScriptedRemote {
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<String> {
        self.created.lock().unwrap().push(request.clone());
        self.check_online("create-session")?;
        Ok(request.session_id.clone())
    }

    async fn fetch_products(&self, session_id: &str) -> Result<Vec<ComparisonItem>> {
        self.fetched.lock().unwrap().push(session_id.to_string());
        self.check_online("fetch-products")?;
        Ok(self.server_products.lock().unwrap().clone())
    }

    async fn remove_product(&self, request: &RemoveProductRequest) -> Result<()> {
        self.removed.lock().unwrap().push(request.clone());
        self.check_online("remove-product")?;
        Ok(())
    }
}

pub struct Harness {
    pub engine: ShortlistEngine,
    pub store: Arc<MemoryStore>,
    pub remote: Arc<ScriptedRemote>,
    pub badge: Arc<RecordingBadgeSink>,
}

pub fn harness_with(config: ShortlistConfig, remote: ScriptedRemote) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let remote = Arc::new(remote);
    let badge = Arc::new(RecordingBadgeSink::new());
    let engine = ShortlistEngine::with_parts(config, store.clone(), remote.clone(), badge.clone());
    Harness {
        engine,
        store,
        remote,
        badge,
    }
}

pub fn harness() -> Harness {
    harness_with(ShortlistConfig::default(), ScriptedRemote::new())
}

pub fn candidate(id: &str, title: &str) -> CandidateItem {
    CandidateItem {
        product_id: Some(id.to_string()),
        title: title.to_string(),
        price: "$49.99".to_string(),
        image: format!("https://img.example/{}.jpg", id),
        retailer: "example-shop".to_string(),
        extra: Map::new(),
    }
}

pub fn ids(items: &[ComparisonItem]) -> Vec<String> {
    items.iter().map(|item| item.product_id.clone()).collect()
}
