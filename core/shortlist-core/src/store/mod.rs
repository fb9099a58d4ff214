//! Persistence for the comparison list and its companions.
//!
//! # Contract
//!
//! The list is always read and written whole. There is no partial-field
//! update and no compare-and-swap: two contexts that interleave
//! load → modify → save will lose one of the updates. Callers that need a
//! consistent view await each operation before issuing the next.
//!
//! # Module Structure
//!
//! - [`file`]: JSON files under the storage root (production)
//! - [`memory`]: in-process store for tests and embedders

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BrowserIdentity, ComparisonItem, Session};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Sole holder of the persisted comparison list, tombstones included.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns the full list in insertion order. A store with nothing saved
    /// yet returns an empty list.
    async fn load(&self) -> Result<Vec<ComparisonItem>>;

    /// Replaces the full list.
    async fn save(&self, items: &[ComparisonItem]) -> Result<()>;
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn load_identity(&self) -> Result<Option<BrowserIdentity>>;

    async fn save_identity(&self, identity: &BrowserIdentity) -> Result<()>;
}

/// Local cache of the last session submitted to the service.
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn load_last_session(&self) -> Result<Option<Session>>;

    async fn save_last_session(&self, session: &Session) -> Result<()>;
}
