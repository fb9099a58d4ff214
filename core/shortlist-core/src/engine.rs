//! ShortlistEngine - the entry point for Shortlist surfaces.
//!
//! Wires the List Manager, Reconciler, Badge Projector and Session Initiator
//! around one injected store. Each surface (popup, background handler, CLI)
//! owns its own engine; nothing is shared through globals, and a surface sees
//! other contexts' writes by calling [`ShortlistEngine::reload`].
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use shortlist_core::ShortlistEngine;
//!
//! let engine = ShortlistEngine::new()?;
//! engine.add(candidate, Some(page_url)).await?;
//! let link = engine.create_session().await?;
//! ```

use std::sync::Arc;

use tracing::warn;

use crate::badge::{project, Badge, BadgeSink, TracingBadgeSink};
use crate::config::{load_config_with_storage, ShortlistConfig};
use crate::error::Result;
use crate::identity::get_or_create_identity;
use crate::list::{AddOutcome, ListManager, RemoveOutcome};
use crate::reconcile::{Reconciler, RefreshOutcome};
use crate::remote::{HttpRemoteService, RemoteService};
use crate::session::SessionInitiator;
use crate::storage::StorageConfig;
use crate::store::{IdentityStore, ItemStore, JsonFileStore, SessionCache};
use crate::types::{BrowserIdentity, CandidateItem, ComparisonItem, Session, SessionLink};

pub struct ShortlistEngine {
    items: Arc<dyn ItemStore>,
    identity: Arc<dyn IdentityStore>,
    list: ListManager,
    reconciler: Reconciler,
    sessions: SessionInitiator,
    badge: Arc<dyn BadgeSink>,
}

impl ShortlistEngine {
    /// Creates an engine over `~/.shortlist` (or `SHORTLIST_HOME`).
    pub fn new() -> Result<Self> {
        Self::with_storage(StorageConfig::default())
    }

    /// Creates an engine with file storage under a custom root.
    pub fn with_storage(storage: StorageConfig) -> Result<Self> {
        let config = load_config_with_storage(&storage);
        let remote = Arc::new(HttpRemoteService::from_config(&config)?);
        let store = Arc::new(JsonFileStore::new(&storage));
        Ok(Self::with_parts(
            config,
            store,
            remote,
            Arc::new(TracingBadgeSink),
        ))
    }

    /// Assembles an engine from explicit collaborators.
    pub fn with_parts<S>(
        config: ShortlistConfig,
        store: Arc<S>,
        remote: Arc<dyn RemoteService>,
        badge: Arc<dyn BadgeSink>,
    ) -> Self
    where
        S: ItemStore + IdentityStore + SessionCache + 'static,
    {
        let items: Arc<dyn ItemStore> = store.clone();
        let identity: Arc<dyn IdentityStore> = store.clone();
        let cache: Arc<dyn SessionCache> = store;

        let list = ListManager::new(items.clone()).with_policy(config.reactivation);
        let reconciler = Reconciler::new(items.clone(), remote.clone());
        let sessions = SessionInitiator::new(
            items.clone(),
            identity.clone(),
            cache,
            remote,
            config.app_base_url(),
        );

        Self {
            items,
            identity,
            list,
            reconciler,
            sessions,
            badge,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    /// Active items for rendering. An unavailable store renders as empty.
    pub async fn get_active(&self) -> Vec<ComparisonItem> {
        match self.list.get_active().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "Falling back to empty list");
                Vec::new()
            }
        }
    }

    pub async fn try_get_active(&self) -> Result<Vec<ComparisonItem>> {
        self.list.get_active().await
    }

    /// Re-reads the full list (tombstones included) written by any context.
    pub async fn reload(&self) -> Result<Vec<ComparisonItem>> {
        self.list.reload().await
    }

    pub async fn identity(&self) -> Result<BrowserIdentity> {
        get_or_create_identity(self.identity.as_ref()).await
    }

    pub async fn last_session(&self) -> Result<Option<Session>> {
        self.sessions.last_session().await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn add(
        &self,
        candidate: CandidateItem,
        fallback_id: Option<&str>,
    ) -> Result<AddOutcome> {
        let mutation = self.list.add(candidate, fallback_id).await?;
        self.render_badge(&mutation.items);
        Ok(mutation.outcome)
    }

    /// Removes locally, then tells the service if a session was submitted.
    /// A failed remote call is logged; the local removal stands.
    pub async fn remove(&self, product_id: &str) -> Result<RemoveOutcome> {
        let mutation = self.list.remove(product_id).await?;
        self.render_badge(&mutation.items);

        if mutation.outcome == RemoveOutcome::Removed {
            if let Err(err) = self.sessions.retract_product(product_id).await {
                warn!(error = %err, product_id = %product_id, "Remote removal failed");
            }
        }
        Ok(mutation.outcome)
    }

    /// Merges the service's list into the local one.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let identity = self.identity().await?;
        let outcome = self.reconciler.refresh(&identity.session_id()).await?;
        self.render_badge(outcome.items());
        Ok(outcome)
    }

    pub async fn create_session(&self) -> Result<SessionLink> {
        self.sessions.create_session().await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Badge
    // ─────────────────────────────────────────────────────────────────────────────

    /// Recomputes the badge from the store and pushes it to the sink.
    pub async fn badge(&self) -> Badge {
        let items = match self.items.load().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "Badge falling back to empty list");
                Vec::new()
            }
        };
        self.render_badge(&items)
    }

    fn render_badge(&self, items: &[ComparisonItem]) -> Badge {
        let badge = project(items);
        self.badge.render(&badge);
        badge
    }
}
