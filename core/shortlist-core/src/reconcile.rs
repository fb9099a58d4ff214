//! Reconciler: merges the server's view of the list with the local one.
//!
//! # Merge Rule
//!
//! Keyed by `product_id`:
//!
//! 1. **Both sides**: the server record replaces the local one wholesale,
//!    even if the local copy was edited after the last sync.
//! 2. **Local only**: kept unchanged (added here, not yet seen by the server).
//! 3. **Server only**: appended after the local entries, in server order.
//!
//! Local entries keep their positions, so the display order a user built up
//! survives a refresh. The result holds exactly one entry per id in the union.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::remote::RemoteService;
use crate::store::ItemStore;
use crate::types::ComparisonItem;

/// Merges `server` into `local` with server precedence on id collisions.
pub fn reconcile(server: &[ComparisonItem], local: &[ComparisonItem]) -> Vec<ComparisonItem> {
    // Later server duplicates win, but the first occurrence fixes the position.
    let mut server_order: Vec<&str> = Vec::with_capacity(server.len());
    let mut server_by_id: HashMap<&str, &ComparisonItem> = HashMap::with_capacity(server.len());
    for item in server {
        if server_by_id.insert(item.product_id.as_str(), item).is_none() {
            server_order.push(item.product_id.as_str());
        }
    }

    let mut merged = Vec::with_capacity(local.len() + server_order.len());
    let mut placed: HashSet<&str> = HashSet::with_capacity(local.len());

    for item in local {
        if !placed.insert(item.product_id.as_str()) {
            continue;
        }
        match server_by_id.get(item.product_id.as_str()) {
            Some(server_item) => merged.push((*server_item).clone()),
            None => merged.push(item.clone()),
        }
    }

    for id in server_order {
        if placed.contains(id) {
            continue;
        }
        if let Some(server_item) = server_by_id.get(id) {
            merged.push((*server_item).clone());
        }
    }

    merged
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The server list was merged and saved.
    Merged {
        items: Vec<ComparisonItem>,
        server_count: usize,
    },
    /// The service could not be reached; the local list was left as it was.
    Degraded {
        items: Vec<ComparisonItem>,
        reason: String,
    },
}

impl RefreshOutcome {
    pub fn items(&self) -> &[ComparisonItem] {
        match self {
            RefreshOutcome::Merged { items, .. } | RefreshOutcome::Degraded { items, .. } => items,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RefreshOutcome::Degraded { .. })
    }
}

pub struct Reconciler {
    store: Arc<dyn ItemStore>,
    remote: Arc<dyn RemoteService>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ItemStore>, remote: Arc<dyn RemoteService>) -> Self {
        Self { store, remote }
    }

    /// Pulls the server list for `session_id` and merges it into the store.
    ///
    /// Only store failures are errors; an unreachable service yields
    /// [`RefreshOutcome::Degraded`].
    pub async fn refresh(&self, session_id: &str) -> Result<RefreshOutcome> {
        // Fetch before loading so the local read is as fresh as possible.
        let fetched = self.remote.fetch_products(session_id).await;

        let local = self.store.load().await?;
        let server = match fetched {
            Ok(server) => server,
            Err(err) => {
                warn!(error = %err, "Refresh skipped, keeping local list");
                return Ok(RefreshOutcome::Degraded {
                    items: local,
                    reason: err.to_string(),
                });
            }
        };

        let merged = reconcile(&server, &local);
        self.store.save(&merged).await?;

        info!(
            server = server.len(),
            local = local.len(),
            merged = merged.len(),
            "Comparison list reconciled"
        );
        Ok(RefreshOutcome::Merged {
            items: merged,
            server_count: server.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;

    use crate::types::ItemStatus;

    fn item(id: &str, title: &str) -> ComparisonItem {
        ComparisonItem {
            product_id: id.to_string(),
            title: title.to_string(),
            price: "$5".to_string(),
            image: String::new(),
            retailer: "shop".to_string(),
            status: ItemStatus::Active,
            added_at: Utc::now(),
            updated_at: None,
            removed_at: None,
            reactivated_at: None,
            extra: Map::new(),
        }
    }

    fn ids(items: &[ComparisonItem]) -> Vec<&str> {
        items.iter().map(|i| i.product_id.as_str()).collect()
    }

    #[test]
    fn test_server_record_wins_and_local_only_survives() {
        let local = vec![item("a", "A local"), item("b", "B local")];
        let server = vec![item("a", "A server")];

        let merged = reconcile(&server, &local);

        assert_eq!(ids(&merged), vec!["a", "b"]);
        assert_eq!(merged[0].title, "A server");
        assert_eq!(merged[1], local[1]);
    }

    #[test]
    fn test_server_only_items_are_appended_in_server_order() {
        let local = vec![item("b", "B")];
        let server = vec![item("z", "Z"), item("b", "B'"), item("y", "Y")];

        let merged = reconcile(&server, &local);
        assert_eq!(ids(&merged), vec!["b", "z", "y"]);
    }

    #[test]
    fn test_server_tombstone_overrides_local_active() {
        let local = vec![item("a", "A")];
        let mut removed = item("a", "A");
        removed.status = ItemStatus::Removed;

        let merged = reconcile(&[removed], &local);
        assert!(merged[0].is_removed());
    }

    #[test]
    fn test_result_size_is_union_of_ids() {
        let local = vec![item("a", ""), item("b", ""), item("c", "")];
        let server = vec![item("b", ""), item("d", ""), item("d", "dup"), item("e", "")];

        let merged = reconcile(&server, &local);

        let union: HashSet<_> = local
            .iter()
            .chain(server.iter())
            .map(|i| i.product_id.clone())
            .collect();
        assert_eq!(merged.len(), union.len());
        let d = merged.iter().find(|i| i.product_id == "d").unwrap();
        assert_eq!(d.title, "dup");
    }

    #[test]
    fn test_empty_server_keeps_local() {
        let local = vec![item("a", "A"), item("b", "B")];
        assert_eq!(reconcile(&[], &local), local);
    }

    #[test]
    fn test_empty_local_takes_server() {
        let server = vec![item("a", "A")];
        assert_eq!(reconcile(&server, &[]), server);
    }
}
