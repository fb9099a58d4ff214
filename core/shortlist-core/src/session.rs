//! Session Initiator: submits the active items for comparison.
//!
//! The session id is the browser identity, so every session from one
//! installation shares the same id and the service keeps a single product
//! list per browser. Submission is not transactional with local state: a
//! failed call leaves the local list exactly as it was.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use shortlist_protocol::{CreateSessionRequest, RemoveProductRequest};

use crate::error::{Result, ShortlistError};
use crate::identity::get_or_create_identity;
use crate::remote::RemoteService;
use crate::store::{IdentityStore, ItemStore, SessionCache};
use crate::types::{active_items, Session, SessionLink, MIN_SESSION_ITEMS};

/// Builds the deep link that opens a session in the web app.
pub fn deep_link(app_base_url: &str, session_id: &str) -> String {
    format!(
        "{}/compare/{}",
        app_base_url.trim_end_matches('/'),
        session_id
    )
}

pub struct SessionInitiator {
    items: Arc<dyn ItemStore>,
    identity: Arc<dyn IdentityStore>,
    cache: Arc<dyn SessionCache>,
    remote: Arc<dyn RemoteService>,
    app_base_url: String,
}

impl SessionInitiator {
    pub fn new(
        items: Arc<dyn ItemStore>,
        identity: Arc<dyn IdentityStore>,
        cache: Arc<dyn SessionCache>,
        remote: Arc<dyn RemoteService>,
        app_base_url: impl Into<String>,
    ) -> Self {
        Self {
            items,
            identity,
            cache,
            remote,
            app_base_url: app_base_url.into(),
        }
    }

    /// Submits the current active items and returns the link to open.
    ///
    /// Fails with `MinimumItemsRequired` before any network traffic when
    /// fewer than two items are active.
    pub async fn create_session(&self) -> Result<SessionLink> {
        let products = active_items(&self.items.load().await?);
        if products.len() < MIN_SESSION_ITEMS {
            return Err(ShortlistError::MinimumItemsRequired {
                required: MIN_SESSION_ITEMS,
                active: products.len(),
            });
        }

        let identity = get_or_create_identity(self.identity.as_ref()).await?;
        let request = CreateSessionRequest {
            session_id: identity.session_id(),
            products,
            timestamp: Utc::now(),
        };
        request
            .validate()
            .map_err(|info| ShortlistError::malformed(info.to_string()))?;

        let session_id = self.remote.create_session(&request).await?;
        let url = deep_link(&self.app_base_url, &session_id);

        let session = Session {
            session_id: session_id.clone(),
            products: request.products,
            created_at: request.timestamp,
        };
        if let Err(err) = self.cache.save_last_session(&session).await {
            warn!(error = %err, "Failed to cache submitted session");
        }

        info!(
            session_id = %session_id,
            products = session.products.len(),
            "Comparison session created"
        );
        Ok(SessionLink { session_id, url })
    }

    /// The last successfully submitted session, if any.
    pub async fn last_session(&self) -> Result<Option<Session>> {
        self.cache.load_last_session().await
    }

    /// Tells the service a product left the list.
    ///
    /// Returns `false` without a network call when no session was ever
    /// submitted, since the service has nothing to remove.
    pub async fn retract_product(&self, product_id: &str) -> Result<bool> {
        let Some(session) = self.cache.load_last_session().await? else {
            return Ok(false);
        };

        let request = RemoveProductRequest {
            session_id: session.session_id,
            product_id: product_id.to_string(),
        };
        request
            .validate()
            .map_err(|info| ShortlistError::malformed(info.to_string()))?;

        self.remote.remove_product(&request).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_link_format() {
        assert_eq!(
            deep_link("https://shortlist.app/", "abc"),
            "https://shortlist.app/compare/abc"
        );
        assert_eq!(
            deep_link("http://localhost:3000", "abc"),
            "http://localhost:3000/compare/abc"
        );
    }
}
