//! Integration tests for role checks, ownership, and organization scoping
//! through the entity surface.

use serde_json::json;

use tenantguard_auth::NewInvite;
use tenantguard_core::error::ErrorKind;
use tenantguard_entity::{EntityType, Record, Role};

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

const MEMBER_PASSWORD: &str = "Member2Pass";

fn fields(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r["id"].as_str()).collect()
}

/// Invite and activate a plain member, leaving nobody logged in.
async fn onboard_member(app: &TestApp, email: &str, org_id: Option<String>) {
    app.login_as(OWNER).await;
    let invitation = app
        .backend
        .users()
        .create_invite(NewInvite {
            email: email.into(),
            role: Role::User,
            org_id,
            group_id: None,
        })
        .await
        .unwrap();
    app.backend
        .users()
        .accept_invite(&invitation.token, MEMBER_PASSWORD)
        .await
        .unwrap();
    app.backend.auth().logout().await.unwrap();
}

#[tokio::test]
async fn test_organization_update_requires_privilege() {
    let app = TestApp::new();
    let organizations = app.backend.entities(EntityType::Organization);

    app.login_as(OWNER).await;
    let updated = organizations
        .update("org_northwind", fields(json!({"industry": "biotech"})))
        .await
        .unwrap();
    assert_eq!(updated["industry"], "biotech");

    app.login_as(ADMIN).await;
    organizations
        .update("org_northwind", fields(json!({"size": "201-500"})))
        .await
        .unwrap();

    app.login_as(ANALYST).await;
    let err = organizations
        .update("org_northwind", fields(json!({"name": "Hijacked"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let org = organizations.list(None, None).await.unwrap();
    assert_eq!(org[0]["name"], "Northwind Health");
    assert_eq!(org[0]["size"], "201-500");
}

#[tokio::test]
async fn test_scheduled_scans_are_owned_by_their_creator() {
    let app = TestApp::new();
    onboard_member(&app, "second@northwind.example", None).await;
    let scans = app.backend.entities(EntityType::ScheduledScan);

    app.login_as(ANALYST).await;
    assert_eq!(ids(&scans.list(None, None).await.unwrap()), vec!["sched_001"]);
    let updated = scans
        .update("sched_001", fields(json!({"frequency": "daily"})))
        .await
        .unwrap();
    assert_eq!(updated["frequency"], "daily");

    let err = scans
        .update(
            "sched_001",
            fields(json!({"userEmail": "second@northwind.example"})),
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    app.backend
        .auth()
        .login("second@northwind.example", MEMBER_PASSWORD)
        .await
        .unwrap();
    assert!(scans.list(None, None).await.unwrap().is_empty());
    let err = scans
        .update("sched_001", fields(json!({"frequency": "hourly"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
    let err = scans.delete("sched_001").await.unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let own = scans
        .create(fields(json!({"name": "Nightly VPN scan", "target": "vpn.northwind.example"})))
        .await
        .unwrap();
    assert_eq!(own["userEmail"], "second@northwind.example");
    assert_eq!(own["orgId"], "org_northwind");

    app.login_as(ADMIN).await;
    scans
        .update("sched_001", fields(json!({"frequency": "monthly"})))
        .await
        .unwrap();
    assert_eq!(scans.list(None, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_guest_sees_nothing_and_cannot_write() {
    let app = TestApp::new();

    for entity_type in EntityType::ALL {
        let rows = app.backend.entities(entity_type).list(None, None).await.unwrap();
        assert!(rows.is_empty(), "{entity_type}");
    }

    let err = app
        .backend
        .entities(EntityType::Risk)
        .create(fields(json!({"title": "Anonymous risk"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let err = app
        .backend
        .entities(EntityType::Asset)
        .delete("asset_vpn")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}

#[tokio::test]
async fn test_members_of_another_org_cannot_see_or_touch_northwind() {
    let app = TestApp::new();

    app.login_as(OWNER).await;
    let acme = app
        .backend
        .entities(EntityType::Organization)
        .create(fields(json!({"name": "Acme Labs", "plan": "trial"})))
        .await
        .unwrap();
    let acme_id = acme["id"].as_str().unwrap().to_string();
    onboard_member(&app, "mia@acme.example", Some(acme_id.clone())).await;

    app.backend
        .auth()
        .login("mia@acme.example", MEMBER_PASSWORD)
        .await
        .unwrap();

    let orgs = app
        .backend
        .entities(EntityType::Organization)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(ids(&orgs), vec![acme_id.as_str()]);

    for entity_type in [EntityType::Asset, EntityType::Risk, EntityType::Group] {
        let rows = app.backend.entities(entity_type).list(None, None).await.unwrap();
        assert!(rows.is_empty(), "{entity_type}");
    }

    let err = app
        .backend
        .entities(EntityType::Risk)
        .update("risk_phishing", fields(json!({"status": "closed"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let err = app
        .backend
        .entities(EntityType::Risk)
        .create(fields(json!({"title": "Planted", "orgId": "org_northwind"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let risk = app
        .backend
        .entities(EntityType::Risk)
        .create(fields(json!({"title": "Lab freezer alarm offline"})))
        .await
        .unwrap();
    assert_eq!(risk["orgId"], acme_id.as_str());
}

#[tokio::test]
async fn test_privileged_roles_see_every_org() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.backend
        .entities(EntityType::Asset)
        .create(fields(json!({"name": "Foreign laptop", "orgId": "org_elsewhere"})))
        .await
        .unwrap();

    app.login_as(ADMIN).await;
    let assets = app
        .backend
        .entities(EntityType::Asset)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(assets.len(), 4);

    app.login_as(ANALYST).await;
    let assets = app
        .backend
        .entities(EntityType::Asset)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(assets.len(), 3);
}

#[tokio::test]
async fn test_members_cannot_read_audit_trail() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let rows = app
        .backend
        .entities(EntityType::ActivityLog)
        .list(None, None)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let err = app
        .backend
        .entities(EntityType::Invitation)
        .create(fields(json!({"email": "x@northwind.example"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}
