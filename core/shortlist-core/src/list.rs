//! List Manager: validates and applies add/remove against the item store.
//!
//! # Rules
//!
//! | Existing entry | Active < MAX | Result |
//! |----------------|--------------|--------|
//! | none           | yes          | appended, `Added` |
//! | none           | no           | `CapacityExceeded`, nothing written |
//! | removed        | any          | replaced in place, `Reactivated` (see [`ReactivationPolicy`]) |
//! | active         | any          | replaced in place, `Updated` |
//!
//! Removal marks the entry as a tombstone; it is never deleted, so adding the
//! same id later reactivates it in its original position.
//!
//! Every mutation is a whole-list read → modify → write against the store.
//! Repeating a call with the same arguments leaves the list in the same state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shortlist_protocol::strip_item_fields;
use tracing::{debug, info};

use crate::config::ReactivationPolicy;
use crate::error::{Result, ShortlistError};
use crate::store::ItemStore;
use crate::types::{active_count, CandidateItem, ComparisonItem, ItemStatus, MAX_ITEMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Updated,
    Reactivated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// No active entry matched; nothing was written.
    Unchanged,
}

/// The list after a mutation, so callers can project it without reloading.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub outcome: T,
    pub items: Vec<ComparisonItem>,
}

pub struct ListManager {
    store: Arc<dyn ItemStore>,
    policy: ReactivationPolicy,
    max_items: usize,
}

impl ListManager {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            policy: ReactivationPolicy::default(),
            max_items: MAX_ITEMS,
        }
    }

    pub fn with_policy(mut self, policy: ReactivationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Re-reads the whole list from the store, tombstones included.
    pub async fn reload(&self) -> Result<Vec<ComparisonItem>> {
        self.store.load().await
    }

    /// Active items in insertion order.
    pub async fn get_active(&self) -> Result<Vec<ComparisonItem>> {
        let items = self.store.load().await?;
        Ok(items.into_iter().filter(|item| item.is_active()).collect())
    }

    pub async fn active_count(&self) -> Result<usize> {
        Ok(active_count(&self.store.load().await?))
    }

    /// Adds or refreshes an item.
    ///
    /// `fallback_id` is used when the extractor could not find a product id
    /// (typically the page URL). Without either, the item is `MalformedItem`.
    pub async fn add(
        &self,
        candidate: CandidateItem,
        fallback_id: Option<&str>,
    ) -> Result<Mutation<AddOutcome>> {
        let product_id = candidate.resolve_id(fallback_id).ok_or_else(|| {
            ShortlistError::malformed("product_id is missing and no fallback id was supplied")
        })?;

        let mut items = self.store.load().await?;
        let outcome = apply_add(
            &mut items,
            product_id.clone(),
            candidate,
            Utc::now(),
            self.max_items,
            self.policy,
        )?;
        self.store.save(&items).await?;

        info!(
            product_id = %product_id,
            outcome = ?outcome,
            active = active_count(&items),
            "Comparison item added"
        );
        Ok(Mutation { outcome, items })
    }

    /// Marks an item as removed. Absent or already removed ids are a no-op.
    pub async fn remove(&self, product_id: &str) -> Result<Mutation<RemoveOutcome>> {
        let mut items = self.store.load().await?;
        let outcome = apply_remove(&mut items, product_id, Utc::now());

        if outcome == RemoveOutcome::Removed {
            self.store.save(&items).await?;
            info!(
                product_id = %product_id,
                active = active_count(&items),
                "Comparison item removed"
            );
        } else {
            debug!(product_id = %product_id, "Remove skipped, no active entry");
        }
        Ok(Mutation { outcome, items })
    }
}

/// Applies the add rules to an in-memory list.
pub fn apply_add(
    items: &mut Vec<ComparisonItem>,
    product_id: String,
    candidate: CandidateItem,
    now: DateTime<Utc>,
    max_items: usize,
    policy: ReactivationPolicy,
) -> Result<AddOutcome> {
    let active = active_count(items);

    let Some(index) = items.iter().position(|item| item.product_id == product_id) else {
        if active >= max_items {
            return Err(ShortlistError::CapacityExceeded { max: max_items });
        }
        items.push(new_item(product_id, candidate, now));
        return Ok(AddOutcome::Added);
    };
    let existing = &mut items[index];

    match existing.status {
        ItemStatus::Removed => {
            if policy == ReactivationPolicy::Enforce && active >= max_items {
                return Err(ShortlistError::CapacityExceeded { max: max_items });
            }
            replace_payload(existing, candidate);
            existing.status = ItemStatus::Active;
            existing.reactivated_at = Some(now);
            existing.removed_at = None;
            existing.updated_at = None;
            Ok(AddOutcome::Reactivated)
        }
        ItemStatus::Active => {
            replace_payload(existing, candidate);
            existing.updated_at = Some(now);
            Ok(AddOutcome::Updated)
        }
    }
}

/// Applies a removal to an in-memory list.
pub fn apply_remove(
    items: &mut [ComparisonItem],
    product_id: &str,
    now: DateTime<Utc>,
) -> RemoveOutcome {
    match items
        .iter_mut()
        .find(|item| item.product_id == product_id && item.is_active())
    {
        Some(item) => {
            item.status = ItemStatus::Removed;
            item.removed_at = Some(now);
            RemoveOutcome::Removed
        }
        None => RemoveOutcome::Unchanged,
    }
}

fn new_item(
    product_id: String,
    mut candidate: CandidateItem,
    now: DateTime<Utc>,
) -> ComparisonItem {
    strip_item_fields(&mut candidate.extra);
    ComparisonItem {
        product_id,
        title: candidate.title,
        price: candidate.price,
        image: candidate.image,
        retailer: candidate.retailer,
        status: ItemStatus::Active,
        added_at: now,
        updated_at: None,
        removed_at: None,
        reactivated_at: None,
        extra: candidate.extra,
    }
}

// Whole-record overwrite: fields absent from the candidate do not survive.
fn replace_payload(item: &mut ComparisonItem, mut candidate: CandidateItem) {
    strip_item_fields(&mut candidate.extra);
    item.title = candidate.title;
    item.price = candidate.price;
    item.image = candidate.image;
    item.retailer = candidate.retailer;
    item.extra = candidate.extra;
}
