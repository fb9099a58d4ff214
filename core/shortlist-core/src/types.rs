//! Shared types for the comparison list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use shortlist_protocol::{ComparisonItem, ItemStatus};

/// Most items that may be active at once.
pub const MAX_ITEMS: usize = 5;

/// Fewest active items a comparison session accepts.
pub const MIN_SESSION_ITEMS: usize = shortlist_protocol::MIN_SESSION_PRODUCTS;

/// A product record as produced by a page extractor, before it enters the list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    #[serde(
        default,
        rename = "product_id",
        alias = "productId",
        deserialize_with = "lenient_id"
    )]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "shortlist_protocol::string_or_number")]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub retailer: String,
    /// Retailer-specific fields, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateItem {
    /// Returns the trimmed product id, falling back to `fallback_id` when the
    /// extractor supplied nothing usable.
    pub fn resolve_id(&self, fallback_id: Option<&str>) -> Option<String> {
        [self.product_id.as_deref(), fallback_id]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
            .map(str::to_string)
    }
}

/// Numeric SKUs become text; any other shape counts as missing so the
/// fallback id can apply.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Anonymous identity used as the session key for every remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserIdentity {
    pub browser_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl BrowserIdentity {
    pub fn generate() -> Self {
        Self {
            browser_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> String {
        self.browser_id.to_string()
    }
}

/// A snapshot of active items submitted to the comparison service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub products: Vec<ComparisonItem>,
    pub created_at: DateTime<Utc>,
}

/// What the UI needs to open a created session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLink {
    pub session_id: String,
    pub url: String,
}

pub fn active_count(items: &[ComparisonItem]) -> usize {
    items.iter().filter(|item| item.is_active()).count()
}

pub fn active_items(items: &[ComparisonItem]) -> Vec<ComparisonItem> {
    items.iter().filter(|item| item.is_active()).cloned().collect()
}
