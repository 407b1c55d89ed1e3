//! Integration tests for the generic entity surface.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use tenantguard_core::error::ErrorKind;
use tenantguard_core::types::{Predicates, SortField};
use tenantguard_entity::{EntityType, Record};

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

fn fields(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().filter_map(|r| r["id"].as_str()).collect()
}

#[tokio::test]
async fn test_create_assigns_id_timestamp_and_org() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let risks = app.backend.entities(EntityType::Risk);

    let mut seen = HashSet::new();
    for title in ["Lost badge", "Shared admin password", "Unencrypted backups"] {
        app.advance(Duration::seconds(1));
        let risk = risks
            .create(fields(json!({
                "id": "risk_chosen_by_caller",
                "title": title,
                "likelihood": 2,
                "impact": 3
            })))
            .await
            .unwrap();

        let id = risk["id"].as_str().unwrap().to_string();
        assert_ne!(id, "risk_chosen_by_caller");
        assert!(seen.insert(id));

        let created: DateTime<Utc> = risk["created_date"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(created <= app.clock_now());
        assert_eq!(risk["orgId"], "org_northwind");
    }

    assert_eq!(risks.list(None, None).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_sorts_and_limits() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let assets = app.backend.entities(EntityType::Asset);

    let newest_first = assets
        .list(Some(&"-created_date".parse::<SortField>().unwrap()), None)
        .await
        .unwrap();
    assert_eq!(ids(&newest_first), vec!["asset_vpn", "asset_ehr_db", "asset_portal"]);

    let by_name = assets
        .list(Some(&SortField::asc("name")), Some(2))
        .await
        .unwrap();
    assert_eq!(ids(&by_name), vec!["asset_ehr_db", "asset_portal"]);

    let none = assets.list(None, Some(0)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_filter_matches_every_predicate() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let assets = app.backend.entities(EntityType::Asset);

    let owned = assets
        .filter(
            &Predicates::new().eq("owner", ADMIN),
            Some(&SortField::desc("name")),
            None,
        )
        .await
        .unwrap();
    assert_eq!(ids(&owned), vec!["asset_vpn", "asset_ehr_db"]);

    let narrowed = assets
        .filter(
            &Predicates::new()
                .eq("owner", ADMIN)
                .eq("criticality", "critical"),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(ids(&narrowed), vec!["asset_ehr_db"]);

    let risks = app
        .backend
        .entities(EntityType::Risk)
        .filter(&Predicates::new().eq("impact", 5), None, None)
        .await
        .unwrap();
    assert_eq!(ids(&risks), vec!["risk_unpatched_db"]);
}

#[tokio::test]
async fn test_update_merges_and_keeps_immutable_fields() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let risks = app.backend.entities(EntityType::Risk);

    let updated = risks
        .update(
            "risk_phishing",
            fields(json!({
                "id": "risk_renamed",
                "created_date": "1999-01-01T00:00:00Z",
                "status": "mitigating",
                "owner": ANALYST
            })),
        )
        .await
        .unwrap();
    assert_eq!(updated["id"], "risk_phishing");
    assert_eq!(updated["created_date"], "2024-01-10T09:00:00Z");
    assert_eq!(updated["status"], "mitigating");
    assert_eq!(updated["title"], "Credential phishing against clinical staff");
    assert_eq!(updated["owner"], ANALYST);

    let stored = risks
        .filter(&Predicates::new().eq("id", "risk_phishing"), None, None)
        .await
        .unwrap();
    assert_eq!(stored[0], updated);
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let assets = app.backend.entities(EntityType::Asset);

    let err = assets
        .update("asset_missing", fields(json!({"name": "Ghost"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    let err = assets.delete("asset_missing").await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_denied_delete_leaves_store_untouched() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let before = app.backend.store().load().await.unwrap();

    let err = app
        .backend
        .entities(EntityType::Risk)
        .delete("risk_phishing")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let after = app.backend.store().load().await.unwrap();
    assert_eq!(before, after);

    app.login_as(ADMIN).await;
    app.backend
        .entities(EntityType::Risk)
        .delete("risk_phishing")
        .await
        .unwrap();
    let remaining = app
        .backend
        .entities(EntityType::Risk)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(ids(&remaining), vec!["risk_unpatched_db"]);
}

#[tokio::test]
async fn test_user_records_never_expose_credentials() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.activate(ANALYST).await;
    let users = app.backend.entities(EntityType::User);

    for user in users.list(None, None).await.unwrap() {
        assert!(!user.contains_key("passwordHash"), "{}", user["email"]);
        assert!(!user.contains_key("passwordSalt"), "{}", user["email"]);
    }

    let updated = users
        .update(
            "usr_analyst",
            fields(json!({"fullName": "Ana A. Analyst", "passwordHash": "forged"})),
        )
        .await
        .unwrap();
    assert_eq!(updated["fullName"], "Ana A. Analyst");
    assert!(!updated.contains_key("passwordHash"));

    // The stored credentials are the ones set by activation, not the forged value.
    app.backend
        .auth()
        .login(ANALYST, crate::helpers::PASSWORD)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_cannot_grant_privileged_role_through_entities() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let users = app.backend.entities(EntityType::User);

    let err = users
        .update("usr_analyst", fields(json!({"role": "admin"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));

    let err = users
        .create(fields(json!({"email": "new@northwind.example", "role": "owner"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));

    app.login_as(OWNER).await;
    let promoted = users
        .update("usr_analyst", fields(json!({"role": "admin"})))
        .await
        .unwrap();
    assert_eq!(promoted["role"], "admin");
}

#[tokio::test]
async fn test_organization_create_backfills_plan_defaults() {
    let app = TestApp::new();
    app.login_as(OWNER).await;

    let org = app
        .backend
        .entities(EntityType::Organization)
        .create(fields(json!({
            "name": "Contoso Clinics",
            "plan": "trial",
            "security": {"sessionTimeoutMins": 20}
        })))
        .await
        .unwrap();

    assert!(org.get("orgId").is_none());
    assert_eq!(org["security"]["sessionTimeoutMins"], 20);
    assert_eq!(org["security"]["aiRequestsPerMin"], 10);
    assert_eq!(org["features"]["aiAssistant"], true);
    assert_eq!(org["features"]["apiAccess"], false);

    app.login_as(ADMIN).await;
    let err = app
        .backend
        .entities(EntityType::Organization)
        .create(fields(json!({"name": "Shadow Org", "plan": "paid"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}

#[tokio::test]
async fn test_training_templates_are_shared_reference_data() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let templates = app
        .backend
        .entities(EntityType::TrainingTemplate)
        .list(None, None)
        .await
        .unwrap();
    assert_eq!(templates.len(), 4);

    let err = app
        .backend
        .entities(EntityType::TrainingTemplate)
        .create(fields(json!({"title": "Homemade course"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}

#[tokio::test]
async fn test_user_emails_are_unique() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let users = app.backend.entities(EntityType::User);

    let err = users
        .create(fields(json!({"email": " Analyst@Northwind.example ", "role": "user"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    let same_email = users
        .filter(&Predicates::new().eq("email", ANALYST), None, None)
        .await
        .unwrap();
    assert_eq!(same_email.len(), 1);

    let created = users
        .create(fields(json!({"email": " temp@northwind.example ", "role": "user"})))
        .await
        .unwrap();
    assert_eq!(created["email"], "temp@northwind.example");
    let temp_id = created["id"].as_str().unwrap();

    let err = users
        .update(temp_id, fields(json!({"email": "OWNER@northwind.example"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    // Re-saving a user's own address is not a clash.
    users
        .update(temp_id, fields(json!({"email": "Temp@northwind.example"})))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_malformed_user_and_organization_writes_rejected() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let orgs = app.backend.entities(EntityType::Organization);
    let before = app.backend.store().load().await.unwrap();

    let err = orgs
        .update(
            "org_northwind",
            fields(json!({"security": {"sessionTimeoutMins": "sixty"}})),
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let users = app.backend.entities(EntityType::User);
    let err = users
        .create(fields(json!({"fullName": "No Address", "role": "user"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    let err = users
        .update("usr_analyst", fields(json!({"loginCount": "many"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    assert_eq!(app.backend.store().load().await.unwrap(), before);
    assert_eq!(orgs.list(None, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreadable_organization_does_not_lock_out_tenant() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.backend
        .store()
        .mutate(|doc| {
            let org = doc
                .find_mut(EntityType::Organization, "org_northwind")
                .unwrap();
            org.insert(
                "security".into(),
                json!({"sessionTimeoutMins": "sixty", "aiRequestsPerMin": 30}),
            );
            Ok(())
        })
        .await
        .unwrap();

    let orgs = app.backend.entities(EntityType::Organization);
    assert_eq!(orgs.list(None, None).await.unwrap().len(), 1);

    let repaired = orgs
        .update(
            "org_northwind",
            fields(json!({"security": {"sessionTimeoutMins": 60}})),
        )
        .await
        .unwrap();
    assert_eq!(repaired["security"]["sessionTimeoutMins"], 60);
    assert!(repaired["security"]["aiRequestsPerMin"].is_number());
    assert!(app.backend.auth().current_org().await.unwrap().is_some());
}

#[tokio::test]
async fn test_admin_cannot_demote_privileged_accounts_through_entities() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let users = app.backend.entities(EntityType::User);

    let err = users
        .update("usr_owner", fields(json!({"role": "user"})))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));
    assert_eq!(app.user(OWNER).await.unwrap().role.as_str(), "owner");

    // Other fields of a privileged account stay editable.
    users
        .update("usr_owner", fields(json!({"fullName": "Olivia O. Owner"})))
        .await
        .unwrap();

    app.login_as(OWNER).await;
    let demoted = users
        .update("usr_admin", fields(json!({"role": "user"})))
        .await
        .unwrap();
    assert_eq!(demoted["role"], "user");
}
