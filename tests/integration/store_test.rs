//! Integration tests for document persistence seen through the façade.

use serde_json::json;

use tenantguard_core::config::{AppConfig, StoreBackend};
use tenantguard_core::traits::KeyValueStore;
use tenantguard_entity::{EntityType, Plan, Role};
use tenantguard_service::{Backend, BootstrapRequest};
use tenantguard_store::keys;

use crate::helpers::{ADMIN, TestApp};

async fn write_raw(app: &TestApp, document: serde_json::Value) {
    app.kv
        .set(&keys::document(), &serde_json::to_vec(&document).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_collections_are_backfilled_without_touching_others() {
    let app = TestApp::new();
    write_raw(
        &app,
        json!({
            "meta": {"version": 1, "revision": 12},
            "collections": {
                "Organization": [{
                    "id": "org_northwind",
                    "name": "Northwind Health",
                    "plan": "paid",
                    "ownerEmail": "owner@northwind.example",
                    "security": {"sessionTimeoutMins": 20},
                    "created_date": "2024-01-02T09:00:00Z"
                }],
                "User": [{
                    "id": "usr_admin",
                    "fullName": "Adam Admin",
                    "email": "admin@northwind.example",
                    "role": "admin",
                    "orgId": "org_northwind",
                    "created_date": "2024-01-02T09:10:00Z"
                }],
                "Asset": [{
                    "id": "asset_custom",
                    "orgId": "org_northwind",
                    "name": "Only asset left",
                    "created_date": "2024-03-01T00:00:00Z"
                }],
                "TrainingTemplate": []
            }
        }),
    )
    .await;

    app.login_as(ADMIN).await;

    let assets = app
        .backend
        .entities(EntityType::Asset)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "Only asset left");

    let risks = app
        .backend
        .entities(EntityType::Risk)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(risks.len(), 2);

    let templates = app
        .backend
        .entities(EntityType::TrainingTemplate)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(templates.len(), 4);

    let org = app.backend.auth().current_org().await.unwrap().unwrap();
    assert_eq!(org.security.session_timeout_mins, Some(20));
    assert_eq!(org.security.ai_requests_per_min, Some(30));
    assert!(org.feature_enabled("documentVault"));

    let doc = app.backend.store().load().await.unwrap();
    assert!(doc.meta.revision > 12);
}

#[tokio::test]
async fn test_version_mismatch_discards_and_reseeds() {
    let app = TestApp::new();
    write_raw(
        &app,
        json!({
            "meta": {"version": 0, "revision": 3},
            "collections": {"Asset": []}
        }),
    )
    .await;

    app.login_as(ADMIN).await;
    let assets = app
        .backend
        .entities(EntityType::Asset)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(assets.len(), 3);

    let doc = app.backend.store().load().await.unwrap();
    assert_eq!(doc.meta.version, keys::SCHEMA_VERSION);
}

#[tokio::test]
async fn test_second_backend_sees_writes() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    app.backend
        .entities(EntityType::Vendor)
        .create(json!({"name": "Shredding Co"}).as_object().cloned().unwrap())
        .await
        .unwrap();

    let other = app.reopen();
    let vendors = other
        .backend
        .entities(EntityType::Vendor)
        .list(None, None)
        .await
        .unwrap();
    assert!(vendors.iter().any(|v| v["name"] == "Shredding Co"));
}

#[tokio::test]
async fn test_file_backend_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.auth.pbkdf2_iterations = 1_000;
    config.store.backend = StoreBackend::File;
    config.store.data_dir = dir.path().to_string_lossy().into_owned();

    let first = Backend::open(&config).await.unwrap();
    let identity = first
        .auth()
        .bootstrap_admin(BootstrapRequest {
            email: "founder@acme.example".into(),
            password: "Acme2Security".into(),
            org_name: "Acme Security".into(),
            plan: Plan::Paid,
        })
        .await
        .unwrap();
    assert_eq!(identity.role, Role::Owner);
    drop(first);

    let second = Backend::open(&config).await.unwrap();
    let me = second.auth().me().await.unwrap();
    assert_eq!(me.email, "founder@acme.example");
    let org = second.auth().current_org().await.unwrap().unwrap();
    assert_eq!(org.slug, "acme-security");

    second.auth().logout().await.unwrap();
    let third = Backend::open(&config).await.unwrap();
    assert!(third.auth().me().await.unwrap().is_guest());
    third
        .auth()
        .login("founder@acme.example", "Acme2Security")
        .await
        .unwrap();
}
