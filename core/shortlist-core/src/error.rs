//! Error types for shortlist-core operations.
//! Keep the `code()` strings stable; UI surfaces match on them.

use std::path::PathBuf;

use shortlist_protocol::ErrorInfo;

/// All errors that can occur in shortlist-core operations.
///
/// This is the rich error type used internally in Rust code.
/// For UI boundaries, convert to [`Failure`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    // ─────────────────────────────────────────────────────────────────────
    // List Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Comparison list is full ({max} active items)")]
    CapacityExceeded { max: usize },

    #[error("At least {required} active items are required to compare, found {active}")]
    MinimumItemsRequired { required: usize, active: usize },

    #[error("Item has no usable product identifier: {reason}")]
    MalformedItem { reason: String },

    // ─────────────────────────────────────────────────────────────────────
    // Store Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Item store unavailable: {context}: {source}")]
    StoreUnavailable {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Item store encoding failed: {context}: {source}")]
    StoreEncoding {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Remote Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Comparison service unreachable: {operation}: {details}")]
    RemoteUnreachable { operation: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },
}

impl ShortlistError {
    pub fn store(context: impl Into<String>, source: std::io::Error) -> Self {
        ShortlistError::StoreUnavailable {
            context: context.into(),
            source,
        }
    }

    pub fn remote(operation: impl Into<String>, details: impl ToString) -> Self {
        ShortlistError::RemoteUnreachable {
            operation: operation.into(),
            details: details.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        ShortlistError::MalformedItem {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ShortlistError::CapacityExceeded { .. } => "capacity_exceeded",
            ShortlistError::MinimumItemsRequired { .. } => "minimum_items_required",
            ShortlistError::MalformedItem { .. } => "malformed_item",
            // An unreadable or unwritable document is the same condition to callers.
            ShortlistError::StoreUnavailable { .. } | ShortlistError::StoreEncoding { .. } => {
                "store_unavailable"
            }
            ShortlistError::RemoteUnreachable { .. } => "remote_unreachable",
            ShortlistError::ConfigMalformed { .. } => "config_malformed",
        }
    }

    pub fn is_store_unavailable(&self) -> bool {
        self.code() == "store_unavailable"
    }
}

/// Convenience type alias for Results using ShortlistError.
pub type Result<T> = std::result::Result<T, ShortlistError>;

/// Structured failure value handed to UI surfaces.
pub type Failure = ErrorInfo;

impl From<ShortlistError> for Failure {
    fn from(err: ShortlistError) -> Self {
        ErrorInfo::new(err.code(), err.to_string())
    }
}
