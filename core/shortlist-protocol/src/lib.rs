//! Wire types and validation for the Shortlist comparison service.
//!
//! This crate is shared by the core library and its clients to prevent schema
//! drift. The remote service remains the authority on validation, but clients
//! reuse the same types to construct valid requests.
//!
//! Endpoints (relative to the API base URL):
//!
//! - `POST create-session` with [`CreateSessionRequest`] → [`CreateSessionResponse`]
//! - `GET fetch-products?sessionId=…` → [`FetchProductsResponse`]
//! - `POST remove-product` with [`RemoveProductRequest`] → [`Ack`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const CREATE_SESSION_PATH: &str = "create-session";
pub const FETCH_PRODUCTS_PATH: &str = "fetch-products";
pub const REMOVE_PRODUCT_PATH: &str = "remove-product";

/// Fewest products the service will analyze in one session.
pub const MIN_SESSION_PRODUCTS: usize = 2;
pub const MAX_ID_LEN: usize = 512;

// ═══════════════════════════════════════════════════════════════════════════════
// Item Model
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Removed,
}

/// One entry of the comparison list, as persisted locally and exchanged with
/// the service.
///
/// Fields the extractor produced beyond the common five are kept in `extra`
/// and round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonItem {
    #[serde(rename = "product_id")]
    pub product_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub retailer: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactivated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON keys owned by the modelled fields of [`ComparisonItem`].
pub const ITEM_FIELDS: &[&str] = &[
    "product_id",
    "productId",
    "title",
    "price",
    "image",
    "retailer",
    "status",
    "addedAt",
    "updatedAt",
    "removedAt",
    "reactivatedAt",
];

/// Drops payload keys that would be written twice next to the modelled fields.
pub fn strip_item_fields(extra: &mut Map<String, Value>) {
    for key in ITEM_FIELDS {
        extra.remove(*key);
    }
}

impl ComparisonItem {
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn is_removed(&self) -> bool {
        self.status == ItemStatus::Removed
    }
}

/// Scraped prices arrive either as display text ("$19.99") or as bare numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "price must be a string or number, got {}",
            other
        ))),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Requests / Responses
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub products: Vec<ComparisonItem>,
    pub timestamp: DateTime<Utc>,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        require_id(&self.session_id, "sessionId")?;

        if self.products.len() < MIN_SESSION_PRODUCTS {
            return Err(ErrorInfo::new(
                "minimum_items_required",
                format!(
                    "at least {} products are required, got {}",
                    MIN_SESSION_PRODUCTS,
                    self.products.len()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            require_id(&product.product_id, "product_id")?;
            if !product.is_active() {
                return Err(ErrorInfo::new(
                    "invalid_product",
                    format!("product {} is not active", product.product_id),
                ));
            }
            if !seen.insert(product.product_id.as_str()) {
                return Err(ErrorInfo::new(
                    "duplicate_product",
                    format!("product {} appears more than once", product.product_id),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchProductsResponse {
    #[serde(default)]
    pub products: Vec<ComparisonItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveProductRequest {
    pub session_id: String,
    pub product_id: String,
}

impl RemoveProductRequest {
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        require_id(&self.session_id, "sessionId")?;
        require_id(&self.product_id, "productId")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Structured failure shared by the service responses and local UI surfaces.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

fn require_id(value: &str, field: &str) -> Result<(), ErrorInfo> {
    if value.trim().is_empty() {
        return Err(ErrorInfo::new(
            "missing_field",
            format!("{} is required", field),
        ));
    }
    if value.len() > MAX_ID_LEN {
        return Err(ErrorInfo::new(
            "invalid_id",
            format!("{} must be {} characters or fewer", field, MAX_ID_LEN),
        ));
    }
    Ok(())
}
