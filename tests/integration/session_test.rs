//! Integration tests for session expiry, touch, and the Session rows.

use chrono::Duration;
use serde_json::json;

use tenantguard_core::types::Predicates;
use tenantguard_entity::{EntityType, Record};

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

fn object(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_session_lapses_after_org_timeout() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    app.advance(Duration::minutes(44));
    assert_eq!(app.backend.auth().me().await.unwrap().email, ANALYST);

    app.advance(Duration::minutes(2));
    assert!(app.backend.auth().me().await.unwrap().is_guest());
    assert!(app.backend.auth().touch_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_touch_extends_from_now() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    app.advance(Duration::minutes(40));
    let session = app.backend.auth().touch_session().await.unwrap().unwrap();
    assert_eq!(session.expires_at, app.clock_now() + Duration::minutes(45));

    app.advance(Duration::minutes(40));
    assert_eq!(app.backend.auth().me().await.unwrap().email, ANALYST);
}

#[tokio::test]
async fn test_org_timeout_is_floored() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.backend
        .entities(EntityType::Organization)
        .update(
            "org_northwind",
            object(json!({"security": {"sessionTimeoutMins": 1}})),
        )
        .await
        .unwrap();

    app.login_as(ANALYST).await;
    app.advance(Duration::minutes(4));
    assert_eq!(app.backend.auth().me().await.unwrap().email, ANALYST);

    app.advance(Duration::minutes(2));
    assert!(app.backend.auth().me().await.unwrap().is_guest());
}

#[tokio::test]
async fn test_second_login_replaces_the_first() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.login_as(ADMIN).await;

    assert_eq!(app.backend.auth().me().await.unwrap().email, ADMIN);
}

#[tokio::test]
async fn test_session_rows_track_login_and_logout() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    app.backend.auth().touch_session().await.unwrap();
    app.backend.auth().logout().await.unwrap();
    app.login_as(OWNER).await;

    let sessions = app.backend.entities(EntityType::Session);
    let analyst_rows = sessions
        .filter(&Predicates::new().eq("userId", "usr_analyst"), None, None)
        .await
        .unwrap();
    assert_eq!(analyst_rows.len(), 1);
    assert_eq!(analyst_rows[0]["status"], "ended");
    assert!(analyst_rows[0].get("endedAt").is_some_and(|v| !v.is_null()));

    let owner_rows = sessions
        .filter(&Predicates::new().eq("userId", "usr_owner"), None, None)
        .await
        .unwrap();
    assert_eq!(owner_rows.len(), 1);
    assert_eq!(owner_rows[0]["status"], "active");
}

#[tokio::test]
async fn test_members_cannot_read_session_rows() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    let rows = app
        .backend
        .entities(EntityType::Session)
        .list(None, None)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_session_survives_reopen() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    let reopened = app.reopen();
    assert_eq!(reopened.backend.auth().me().await.unwrap().email, ANALYST);
}
