//! Integration tests for user-triggered refresh against the service.

mod common;

use chrono::Utc;
use common::{candidate, harness_with, ids, ScriptedRemote};
use serde_json::Map;
use shortlist_core::{ComparisonItem, ItemStatus, ShortlistConfig};

fn server_item(id: &str, title: &str) -> ComparisonItem {
    ComparisonItem {
        product_id: id.to_string(),
        title: title.to_string(),
        price: "$10".to_string(),
        image: String::new(),
        retailer: "server".to_string(),
        status: ItemStatus::Active,
        added_at: Utc::now(),
        updated_at: None,
        removed_at: None,
        reactivated_at: None,
        extra: Map::new(),
    }
}

#[tokio::test]
async fn refresh_takes_server_record_and_keeps_local_only() {
    let remote = ScriptedRemote::serving(vec![server_item("a", "A from server")]);
    let h = harness_with(ShortlistConfig::default(), remote);
    h.engine.add(candidate("a", "A local"), None).await.unwrap();
    h.engine.add(candidate("b", "B local"), None).await.unwrap();
    let local_b = h.engine.reload().await.unwrap()[1].clone();

    let outcome = h.engine.refresh().await.unwrap();

    assert!(!outcome.is_degraded());
    let items = h.engine.reload().await.unwrap();
    assert_eq!(ids(&items), vec!["a", "b"]);
    assert_eq!(items[0].title, "A from server");
    assert_eq!(items[0].retailer, "server");
    assert_eq!(items[1], local_b);
}

#[tokio::test]
async fn refresh_uses_browser_identity_as_session_id() {
    let h = harness_with(ShortlistConfig::default(), ScriptedRemote::new());
    let identity = h.engine.identity().await.unwrap();

    h.engine.refresh().await.unwrap();

    assert_eq!(
        h.remote.fetched.lock().unwrap().as_slice(),
        &[identity.session_id()]
    );
}

#[tokio::test]
async fn refresh_appends_server_only_items_and_updates_badge() {
    let remote = ScriptedRemote::serving(vec![server_item("z", "Z"), server_item("y", "Y")]);
    let h = harness_with(ShortlistConfig::default(), remote);
    h.engine.add(candidate("a", "A"), None).await.unwrap();

    h.engine.refresh().await.unwrap();

    assert_eq!(ids(&h.engine.reload().await.unwrap()), vec!["a", "z", "y"]);
    assert_eq!(h.badge.last().unwrap().text, "3");
}

#[tokio::test]
async fn unreachable_service_keeps_local_list() {
    let remote = ScriptedRemote::serving(vec![server_item("a", "A from server")]);
    remote.set_offline(true);
    let h = harness_with(ShortlistConfig::default(), remote);
    h.engine.add(candidate("a", "A local"), None).await.unwrap();
    let before = h.engine.reload().await.unwrap();

    let outcome = h.engine.refresh().await.unwrap();

    assert!(outcome.is_degraded());
    assert_eq!(outcome.items(), before.as_slice());
    assert_eq!(h.engine.reload().await.unwrap(), before);
}

#[tokio::test]
async fn server_tombstone_hides_local_item() {
    let mut removed = server_item("a", "A");
    removed.status = ItemStatus::Removed;
    let h = harness_with(ShortlistConfig::default(), ScriptedRemote::serving(vec![removed]));
    h.engine.add(candidate("a", "A"), None).await.unwrap();

    h.engine.refresh().await.unwrap();

    assert!(h.engine.get_active().await.is_empty());
    assert!(h.badge.last().unwrap().is_cleared());
}
