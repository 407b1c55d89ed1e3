//! Integration tests for the admin-request workflow.

use tenantguard_core::error::ErrorKind;
use tenantguard_core::types::Predicates;
use tenantguard_entity::{AdminRequestStatus, EntityType, Role};

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

#[tokio::test]
async fn test_request_notifies_and_emails_the_owner() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;

    let request = app
        .backend
        .admin_requests()
        .request_admin_access("  Need to manage scanners  ")
        .await
        .unwrap();
    assert_eq!(request.status, AdminRequestStatus::Pending);
    assert_eq!(request.email, ANALYST);
    assert_eq!(request.reason, "Need to manage scanners");
    assert_eq!(request.org_id.as_deref(), Some("org_northwind"));

    let mail = app.outbox.to(OWNER);
    assert_eq!(mail.len(), 1);
    assert!(mail[0].body.contains("Need to manage scanners"));

    let again = app
        .backend
        .admin_requests()
        .request_admin_access("Asking twice")
        .await
        .unwrap();
    assert_eq!(again.id, request.id);
    assert_eq!(app.outbox.to(OWNER).len(), 1);

    app.login_as(OWNER).await;
    let inbox = app.backend.notifications().list_mine().await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].title, "Admin access requested");
    assert_eq!(app.backend.notifications().unread_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_owner_approval_promotes_requester() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let request = app
        .backend
        .admin_requests()
        .request_admin_access("On-call rotation")
        .await
        .unwrap();

    app.login_as(ADMIN).await;
    let err = app
        .backend
        .admin_requests()
        .approve_admin_request(&request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));

    app.login_as(OWNER).await;
    let decided = app
        .backend
        .admin_requests()
        .approve_admin_request(&request.id)
        .await
        .unwrap();
    assert_eq!(decided.status, AdminRequestStatus::Approved);
    assert_eq!(decided.decided_by.as_deref(), Some(OWNER));
    assert_eq!(decided.decided_at, Some(app.clock_now()));
    assert_eq!(app.user(ANALYST).await.unwrap().role, Role::Admin);

    let log = app
        .backend
        .entities(EntityType::ActivityLog)
        .filter(
            &Predicates::new().eq("action", "admin_request.approved"),
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["targetId"], request.id.as_str());

    let err = app
        .backend
        .admin_requests()
        .deny_admin_request(&request.id)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    let identity = app.login_as(ANALYST).await;
    assert_eq!(identity.role, Role::Admin);
    let inbox = app.backend.notifications().list_mine().await.unwrap();
    assert_eq!(inbox[0].title, "Admin request approved");
}

#[tokio::test]
async fn test_denial_keeps_role_and_allows_a_new_request() {
    let app = TestApp::new();
    app.login_as(ANALYST).await;
    let first = app
        .backend
        .admin_requests()
        .request_admin_access("Audit season")
        .await
        .unwrap();

    app.login_as(OWNER).await;
    let decided = app
        .backend
        .admin_requests()
        .deny_admin_request(&first.id)
        .await
        .unwrap();
    assert_eq!(decided.status, AdminRequestStatus::Denied);
    assert_eq!(app.user(ANALYST).await.unwrap().role, Role::User);

    app.login_as(ANALYST).await;
    let inbox = app.backend.notifications().list_mine().await.unwrap();
    assert_eq!(inbox[0].title, "Admin request denied");

    let second = app
        .backend
        .admin_requests()
        .request_admin_access("Audit season, again")
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_request_preconditions() {
    let app = TestApp::new();

    let err = app
        .backend
        .admin_requests()
        .request_admin_access("anonymous")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    app.login_as(ADMIN).await;
    let err = app
        .backend
        .admin_requests()
        .request_admin_access("already admin")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));

    app.login_as(OWNER).await;
    let err = app
        .backend
        .admin_requests()
        .approve_admin_request("req_missing")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}
