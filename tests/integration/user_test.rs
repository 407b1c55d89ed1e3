//! Integration tests for role assignment and password changes.

use serde_json::json;

use tenantguard_auth::NewInvite;
use tenantguard_core::error::ErrorKind;
use tenantguard_entity::{EntityType, Role};

use crate::helpers::{ADMIN, ANALYST, OWNER, PASSWORD, TestApp};

#[tokio::test]
async fn test_owner_promotes_analyst() {
    let app = TestApp::new();
    app.login_as(OWNER).await;

    let user = app
        .backend
        .users()
        .assign_role("usr_analyst", Role::Admin)
        .await
        .unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(app.user(ANALYST).await.unwrap().role, Role::Admin);

    let log = app
        .backend
        .entities(EntityType::ActivityLog)
        .list(None, None)
        .await
        .unwrap();
    assert!(log.iter().any(|r| r["action"] == "user.role_changed"
        && r["targetId"] == "usr_analyst"));
}

#[tokio::test]
async fn test_admin_cannot_grant_privileged_roles() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let users = app.backend.users();

    let err = users
        .assign_role("usr_analyst", Role::Admin)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));
    assert_eq!(app.user(ANALYST).await.unwrap().role, Role::User);

    let user = users.assign_role("usr_analyst", Role::Guest).await.unwrap();
    assert_eq!(user.role, Role::Guest);
}

#[tokio::test]
async fn test_non_privileged_cannot_assign_roles() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    let err = app
        .backend
        .users()
        .assign_role("usr_owner", Role::User)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}

#[tokio::test]
async fn test_assign_role_unknown_user() {
    let app = TestApp::new();
    app.login_as(OWNER).await;

    let err = app
        .backend
        .users()
        .assign_role("usr_missing", Role::User)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_user_changes_own_password() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let before = app.user(ANALYST).await.unwrap();

    app.backend
        .users()
        .set_password("usr_analyst", "Fresh2Password")
        .await
        .unwrap();

    let after = app.user(ANALYST).await.unwrap();
    assert_ne!(after.password_salt, before.password_salt);
    assert_ne!(after.password_hash, before.password_hash);

    let auth = app.backend.auth();
    auth.logout().await.unwrap();
    let err = auth.login(ANALYST, PASSWORD).await.unwrap_err();
    assert!(err.is(ErrorKind::InvalidCredentials));
    auth.login(ANALYST, "Fresh2Password").await.unwrap();
}

#[tokio::test]
async fn test_set_password_rules() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let users = app.backend.users();

    let err = users
        .set_password("usr_owner", "Fresh2Password")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    let err = users.set_password("usr_analyst", "weakpass").await.unwrap_err();
    assert!(err.is(ErrorKind::WeakPassword));

    app.backend.auth().logout().await.unwrap();
    let err = users
        .set_password("usr_analyst", "Fresh2Password")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));
}

#[tokio::test]
async fn test_admin_resets_member_password() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;

    app.backend
        .users()
        .set_password("usr_analyst", "Reset2Password")
        .await
        .unwrap();

    let auth = app.backend.auth();
    auth.logout().await.unwrap();
    let identity = auth.login(ANALYST, "Reset2Password").await.unwrap();
    assert_eq!(identity.id, "usr_analyst");
}

#[tokio::test]
async fn test_admin_cannot_demote_privileged_accounts() {
    let app = TestApp::new();
    app.login_as(ADMIN).await;
    let users = app.backend.users();

    let err = users.assign_role("usr_owner", Role::User).await.unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));
    let err = users.assign_role("usr_admin", Role::Guest).await.unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));
    assert_eq!(app.user(OWNER).await.unwrap().role, Role::Owner);
    assert_eq!(app.user(ADMIN).await.unwrap().role, Role::Admin);

    app.login_as(OWNER).await;
    let user = users.assign_role("usr_admin", Role::User).await.unwrap();
    assert_eq!(user.role, Role::User);
}

async fn job_title(app: &TestApp, email: &str) -> Option<String> {
    app.user(email)
        .await
        .unwrap()
        .extra
        .get("jobTitle")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[tokio::test]
async fn test_custom_user_fields_survive_account_flows() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    app.activate(ANALYST).await;
    app.backend
        .entities(EntityType::User)
        .update(
            "usr_analyst",
            json!({"jobTitle": "CISO"}).as_object().cloned().unwrap(),
        )
        .await
        .unwrap();
    let users = app.backend.users();

    users.assign_role("usr_analyst", Role::Admin).await.unwrap();
    assert_eq!(job_title(&app, ANALYST).await.as_deref(), Some("CISO"));

    users
        .set_password("usr_analyst", "Fresh2Password")
        .await
        .unwrap();
    assert_eq!(job_title(&app, ANALYST).await.as_deref(), Some("CISO"));

    let auth = app.backend.auth();
    auth.logout().await.unwrap();
    auth.login(ANALYST, "Fresh2Password").await.unwrap();
    assert_eq!(job_title(&app, ANALYST).await.as_deref(), Some("CISO"));
}

#[tokio::test]
async fn test_custom_user_fields_survive_invite_acceptance() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let outcome = app
        .backend
        .users()
        .invite_user(NewInvite {
            email: "newhire@northwind.example".into(),
            role: Role::User,
            org_id: None,
            group_id: None,
        })
        .await
        .unwrap();
    let invitation = outcome.invitation.unwrap();
    app.backend
        .entities(EntityType::User)
        .update(
            &outcome.user.id,
            json!({"jobTitle": "SOC Analyst"}).as_object().cloned().unwrap(),
        )
        .await
        .unwrap();

    app.backend
        .users()
        .accept_invite(&invitation.token, "Welcome2Northwind")
        .await
        .unwrap();
    assert_eq!(
        job_title(&app, "newhire@northwind.example").await.as_deref(),
        Some("SOC Analyst")
    );
}
