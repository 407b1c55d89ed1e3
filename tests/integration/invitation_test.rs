//! Integration tests for invitation issuance and redemption.

use chrono::Duration;

use tenantguard_auth::{InviteState, NewInvite};
use tenantguard_core::error::ErrorKind;
use tenantguard_core::types::Predicates;
use tenantguard_entity::{EntityType, InvitationStatus, Role};

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

fn invite(email: &str, role: Role) -> NewInvite {
    NewInvite {
        email: email.into(),
        role,
        org_id: None,
        group_id: Some("grp_secops".into()),
    }
}

fn token_from(body: &str) -> String {
    body.split("token=")
        .nth(1)
        .unwrap()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[tokio::test]
async fn test_invite_is_pending_until_ttl_then_expired() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let users = app.backend.users();

    let invitation = users
        .create_invite(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.token.len(), 32);

    app.advance(Duration::minutes(9));
    let lookup = users
        .get_invite_by_token(&invitation.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lookup.state, InviteState::Valid);

    app.advance(Duration::minutes(2));
    let lookup = users
        .get_invite_by_token(&invitation.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lookup.state, InviteState::Expired);
    assert_eq!(lookup.invitation.status, InvitationStatus::Expired);

    let lookup = users
        .get_invite_by_token(&invitation.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lookup.state, InviteState::Invalid);

    assert!(users.get_invite_by_token("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_accept_after_expiry_fails_and_persists_expired() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let users = app.backend.users();

    let outcome = users
        .invite_user(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();
    let token = outcome.invitation.unwrap().token;

    app.advance(Duration::minutes(11));
    let err = users.accept_invite(&token, "Welcome2Northwind").await.unwrap_err();
    assert!(err.is(ErrorKind::Expired));

    let stored = app
        .backend
        .entities(EntityType::Invitation)
        .filter(&Predicates::new().eq("token", token.as_str()), None, None)
        .await
        .unwrap();
    assert_eq!(stored[0]["status"], "expired");

    let user = app.user("newhire@northwind.example").await.unwrap();
    assert!(!user.has_credentials());
}

#[tokio::test]
async fn test_emailed_link_activates_account() {
    let app = TestApp::new();
    app.login_as(OWNER).await;

    app.backend
        .users()
        .invite_user(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();

    let mail = app.outbox.to("newhire@northwind.example");
    assert_eq!(mail.len(), 1);
    assert!(mail[0].body.contains("http://localhost:5173/accept-invite?token="));
    let token = token_from(&mail[0].body);

    app.backend.auth().logout().await.unwrap();
    let user = app
        .backend
        .users()
        .accept_invite(&token, "Welcome2Northwind")
        .await
        .unwrap();
    assert_eq!(user.org_id.as_deref(), Some("org_northwind"));
    assert_eq!(user.group_id.as_deref(), Some("grp_secops"));

    let identity = app
        .backend
        .auth()
        .login("newhire@northwind.example", "Welcome2Northwind")
        .await
        .unwrap();
    assert_eq!(identity.role, Role::User);

    let err = app
        .backend
        .users()
        .accept_invite(&token, "Welcome2Northwind")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AlreadyUsed));
}

#[tokio::test]
async fn test_accept_rejects_weak_password_without_consuming_token() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let users = app.backend.users();

    let invitation = users
        .create_invite(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();

    for weak in ["short1A", "alllowercase1", "NoDigitsHereAtAll"] {
        let err = users.accept_invite(&invitation.token, weak).await.unwrap_err();
        assert!(err.is(ErrorKind::WeakPassword), "{weak}");
    }

    users
        .accept_invite(&invitation.token, "Welcome2Northwind")
        .await
        .unwrap();

    let err = users.accept_invite("no-such-token", "Welcome2Northwind").await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_invite_user_is_idempotent() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let users = app.backend.users();

    let first = users
        .invite_user(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();
    let second = users
        .invite_user(invite("NewHire@northwind.example", Role::User))
        .await
        .unwrap();
    assert_eq!(first.user.id, second.user.id);
    assert!(second.invitation.is_some());

    users
        .accept_invite(&second.invitation.unwrap().token, "Welcome2Northwind")
        .await
        .unwrap();

    let third = users
        .invite_user(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();
    assert!(third.invitation.is_none());
    assert_eq!(third.user.id, first.user.id);
}

#[tokio::test]
async fn test_reinviting_an_unactivated_seeded_user_keeps_their_role() {
    let app = TestApp::new();
    app.login_as(OWNER).await;

    let outcome = app
        .backend
        .users()
        .invite_user(invite(ANALYST, Role::User))
        .await
        .unwrap();
    assert_eq!(outcome.user.id, "usr_analyst");
    assert!(outcome.invitation.is_some());
}

#[tokio::test]
async fn test_only_owners_grant_privileged_roles() {
    let app = TestApp::new();

    app.login_as(ADMIN).await;
    let err = app
        .backend
        .users()
        .invite_user(invite("boss@northwind.example", Role::Admin))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::PermissionDenied));
    app.backend
        .users()
        .create_invite(invite("member@northwind.example", Role::User))
        .await
        .unwrap();

    app.login_as(ANALYST).await;
    let err = app
        .backend
        .users()
        .create_invite(invite("friend@northwind.example", Role::User))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::AccessDenied));

    app.login_as(OWNER).await;
    app.backend
        .users()
        .invite_user(invite("boss@northwind.example", Role::Admin))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invites_are_logged() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let invitation = app
        .backend
        .users()
        .create_invite(invite("newhire@northwind.example", Role::User))
        .await
        .unwrap();
    app.backend
        .users()
        .accept_invite(&invitation.token, "Welcome2Northwind")
        .await
        .unwrap();

    let log = app
        .backend
        .entities(EntityType::ActivityLog)
        .list(None, None)
        .await
        .unwrap();
    let actions: Vec<&str> = log.iter().filter_map(|r| r["action"].as_str()).collect();
    assert!(actions.contains(&"invite.created"));
    assert!(actions.contains(&"invite.accepted"));
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let app = TestApp::new();
    app.login_as(OWNER).await;
    let err = app
        .backend
        .users()
        .create_invite(invite("not an email", Role::User))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}
