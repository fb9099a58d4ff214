//! In-process store. Same whole-document semantics as the file store, without
//! touching disk.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{IdentityStore, ItemStore, SessionCache};
use crate::error::{Result, ShortlistError};
use crate::types::{BrowserIdentity, ComparisonItem, Session};

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<ComparisonItem>>,
    identity: Mutex<Option<BrowserIdentity>>,
    last_session: Mutex<Option<Session>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ComparisonItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail with `StoreUnavailable`, the way a
    /// storage host does once its context has been torn down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, operation: &str) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ShortlistError::store(
                operation.to_string(),
                std::io::Error::new(std::io::ErrorKind::NotConnected, "store context invalidated"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ComparisonItem>> {
        self.check_available("load items")?;
        Ok(self.items.lock().await.clone())
    }

    async fn save(&self, items: &[ComparisonItem]) -> Result<()> {
        self.check_available("save items")?;
        *self.items.lock().await = items.to_vec();
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn load_identity(&self) -> Result<Option<BrowserIdentity>> {
        self.check_available("load identity")?;
        Ok(self.identity.lock().await.clone())
    }

    async fn save_identity(&self, identity: &BrowserIdentity) -> Result<()> {
        self.check_available("save identity")?;
        *self.identity.lock().await = Some(identity.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionCache for MemoryStore {
    async fn load_last_session(&self) -> Result<Option<Session>> {
        self.check_available("load last session")?;
        Ok(self.last_session.lock().await.clone())
    }

    async fn save_last_session(&self, session: &Session) -> Result<()> {
        self.check_available("save last session")?;
        *self.last_session.lock().await = Some(session.clone());
        Ok(())
    }
}
