//! Anonymous browser identity.
//!
//! Generated on first use and persisted; every later call returns the same
//! identity for the lifetime of the installation.

use tracing::info;

use crate::error::Result;
use crate::store::IdentityStore;
use crate::types::BrowserIdentity;

pub async fn get_or_create_identity(store: &dyn IdentityStore) -> Result<BrowserIdentity> {
    if let Some(identity) = store.load_identity().await? {
        return Ok(identity);
    }

    let identity = BrowserIdentity::generate();
    store.save_identity(&identity).await?;
    info!(browser_id = %identity.browser_id, "Generated browser identity");
    Ok(identity)
}
