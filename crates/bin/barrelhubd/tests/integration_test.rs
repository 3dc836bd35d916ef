//! End-to-end tests for the full barrelhub stack.
//!
//! Each test starts a seeded virtual server, wires a real client to it and
//! pumps the server feed into the client, the same way the daemon does.

use std::sync::Arc;
use std::time::Duration;

use barrelhub_adapter_virtual::{VirtualServer, feed, seed};
use barrelhub_app::client::{Client, ClientOptions};
use barrelhub_app::store::{LoadPhase, Snapshot};
use barrelhub_domain::barrel::{Barrel, BarrelState};
use barrelhub_domain::id::{BarrelId, TeamId, UserId};
use serde_json::json;
use tokio::sync::mpsc;

type TestClient = Client<Arc<VirtualServer>>;

/// Seeded server plus a client whose feed is pumped in the background.
fn stack() -> (Arc<VirtualServer>, Arc<TestClient>) {
    let server = Arc::new(VirtualServer::new(seed::demo(), 64));
    let client = Arc::new(
        Client::new(Arc::clone(&server), ClientOptions::default())
            .expect("client should wire"),
    );
    let receiver = server.subscribe_feed();
    let pump_client = Arc::clone(&client);
    tokio::spawn(async move { feed::pump(receiver, &pump_client).await });
    (server, client)
}

async fn logged_in() -> (Arc<VirtualServer>, Arc<TestClient>) {
    let (server, client) = stack();
    client.auth_service().check_ip_address().await.unwrap();
    client.wait_until_ready().await;
    (server, client)
}

async fn next_change(changes: &mut mpsc::UnboundedReceiver<Snapshot<Barrel>>) -> Snapshot<Barrel> {
    tokio::time::timeout(Duration::from_secs(1), changes.recv())
        .await
        .expect("a change notification")
        .expect("subscription alive")
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_load_seeded_collections_after_ip_login() {
    let (_server, client) = logged_in().await;

    assert_eq!(client.teams().len(), 3);
    assert_eq!(client.users().len(), 3);
    assert_eq!(client.alert_buttons().len(), 2);
    assert_eq!(client.barrels().len(), 4);
    assert_eq!(
        client.teams().team_name(&TeamId::new("t1")).as_deref(),
        Some("Red Bar")
    );
}

#[tokio::test]
async fn should_stay_uninitialized_before_login() {
    let (_server, client) = stack();

    client.resynchronize();

    assert_eq!(client.barrels().phase(), LoadPhase::Uninitialized);
    assert!(client.barrels().is_empty());
}

#[tokio::test]
async fn should_end_ready_and_empty_when_load_fails() {
    let (server, client) = stack();
    server.fail_next("/barrel", 1);

    client.auth_service().check_ip_address().await.unwrap();
    client.wait_until_ready().await;

    assert_eq!(client.barrels().phase(), LoadPhase::Ready);
    assert!(client.barrels().is_empty());
    assert_eq!(client.teams().len(), 3);
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_apply_own_write_through_the_feed() {
    let (_server, client) = logged_in().await;
    let (tx, mut changes) = mpsc::unbounded_channel();
    let _sub = client.barrels().on_change(move |snapshot| {
        let _ = tx.send(Arc::clone(snapshot));
    });
    let barrel = client.barrels().find(&BarrelId::new("b1")).unwrap();

    client.barrel_service().advance_state(&barrel).await.unwrap();
    let snapshot = next_change(&mut changes).await;

    assert_eq!(snapshot[0].id, BarrelId::new("b1"));
    assert_eq!(snapshot[0].state, BarrelState::Opened);
    assert_eq!(snapshot.len(), 4);
}

#[tokio::test]
async fn should_track_creation_and_deletion() {
    let (_server, client) = logged_in().await;
    let (tx, mut changes) = mpsc::unbounded_channel();
    let _sub = client.barrels().on_change(move |snapshot| {
        let _ = tx.send(Arc::clone(snapshot));
    });

    client
        .barrel_service()
        .create(json!({"num": 5, "state": "new", "type": "stout"}))
        .await
        .unwrap();
    let created = next_change(&mut changes).await;
    client
        .barrel_service()
        .delete(&BarrelId::new("b3"))
        .await
        .unwrap();
    let destroyed = next_change(&mut changes).await;

    assert_eq!(created.len(), 5);
    assert_eq!(created[4].num, 5);
    assert_eq!(destroyed.len(), 4);
    assert!(!client.barrels().contains(&BarrelId::new("b3")));
}

#[tokio::test]
async fn should_move_barrel_between_teams() {
    let (_server, client) = logged_in().await;
    let (tx, mut changes) = mpsc::unbounded_channel();
    let _sub = client.barrels().on_change(move |snapshot| {
        let _ = tx.send(Arc::clone(snapshot));
    });
    let red = TeamId::new("t1");
    let blue = TeamId::new("t2");

    client
        .barrel_service()
        .assign(&BarrelId::new("b1"), Some(&blue))
        .await
        .unwrap();
    next_change(&mut changes).await;

    assert_eq!(client.barrels().for_team(&red).len(), 1);
    assert_eq!(client.barrels().for_team(&blue).len(), 2);
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_switch_identity_and_back() {
    let (server, client) = logged_in().await;
    let main_token = client.auth().token().unwrap();

    client
        .auth_service()
        .login_as(&UserId::new("u2"))
        .await
        .unwrap();
    client.wait_until_ready().await;
    let impersonated = client.auth().token().unwrap();

    assert!(client.auth().is_impersonating());
    assert_eq!(
        server.token_owner(impersonated.as_str()),
        Some(UserId::new("u2"))
    );
    assert_eq!(client.barrels().len(), 4);

    assert!(client.auth_service().back_to_main_account());
    client.wait_until_ready().await;

    assert!(!client.auth().is_impersonating());
    assert_eq!(client.auth().token(), Some(main_token));
}

#[tokio::test]
async fn should_refuse_impersonating_unknown_user() {
    let (_server, client) = logged_in().await;

    let result = client.auth_service().login_as(&UserId::new("ghost")).await;

    assert!(result.is_err());
    assert!(!client.auth().is_impersonating());
}

#[tokio::test]
async fn should_refresh_stored_token() {
    let (server, client) = logged_in().await;
    let stored = client.auth().token().unwrap();

    let accepted = client
        .auth_service()
        .authenticate_connection(&stored)
        .await
        .unwrap();
    client.wait_until_ready().await;

    assert!(accepted);
    let fresh = client.auth().token().unwrap();
    assert_ne!(fresh, stored);
    assert_eq!(server.token_owner(fresh.as_str()), Some(UserId::new("u1")));
}

#[tokio::test]
async fn should_clear_stores_on_logout() {
    let (_server, client) = logged_in().await;

    client.auth_service().logout();

    assert!(!client.auth().is_authenticated());
    assert_eq!(client.teams().phase(), LoadPhase::Uninitialized);
    assert!(client.barrels().is_empty());
}
