//! Integration tests for the per-organization AI request quota.

use chrono::Duration;
use serde_json::json;

use tenantguard_core::error::ErrorKind;
use tenantguard_entity::EntityType;

use crate::helpers::{ADMIN, ANALYST, OWNER, TestApp};

async fn set_quota(app: &TestApp, per_min: u32) {
    app.login_as(OWNER).await;
    app.backend
        .entities(EntityType::Organization)
        .update(
            "org_northwind",
            json!({"security": {"aiRequestsPerMin": per_min}})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_quota_denies_excess_until_next_window() {
    let app = TestApp::with_config(|c| c.rate_limit.min_requests_per_min = 1);
    set_quota(&app, 3).await;
    app.login_as(ANALYST).await;
    let integrations = app.backend.integrations();

    for n in 0..3 {
        let reply = integrations
            .invoke_llm(&format!("Summarise risk #{n}"))
            .await
            .unwrap();
        assert!(reply.contains(&format!("Summarise risk #{n}")));
    }
    let err = integrations.invoke_llm("One more").await.unwrap_err();
    assert!(err.is(ErrorKind::RateLimited));

    app.advance(Duration::seconds(30));
    let err = integrations.invoke_llm("Still too soon").await.unwrap_err();
    assert!(err.is(ErrorKind::RateLimited));

    app.advance(Duration::seconds(31));
    integrations.invoke_llm("Fresh window").await.unwrap();
}

#[tokio::test]
async fn test_quota_is_shared_across_the_org() {
    let app = TestApp::with_config(|c| c.rate_limit.min_requests_per_min = 1);
    set_quota(&app, 2).await;
    let integrations = app.backend.integrations();

    app.login_as(ANALYST).await;
    integrations.invoke_llm("first").await.unwrap();
    integrations.invoke_llm("second").await.unwrap();

    app.login_as(ADMIN).await;
    let err = integrations.invoke_llm("third").await.unwrap_err();
    assert!(err.is(ErrorKind::RateLimited));
}

#[tokio::test]
async fn test_configured_quota_is_floored() {
    let app = TestApp::new();
    set_quota(&app, 1).await;
    app.login_as(ANALYST).await;
    let integrations = app.backend.integrations();

    for n in 0..5 {
        integrations.invoke_llm(&format!("prompt {n}")).await.unwrap();
    }
    let err = integrations.invoke_llm("prompt 5").await.unwrap_err();
    assert!(err.is(ErrorKind::RateLimited));
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_without_spending_quota() {
    let app = TestApp::new();
    set_quota(&app, 5).await;
    app.login_as(ANALYST).await;
    let integrations = app.backend.integrations();

    let err = integrations.invoke_llm("   ").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    for n in 0..5 {
        integrations.invoke_llm(&format!("prompt {n}")).await.unwrap();
    }
}

#[tokio::test]
async fn test_reset_demo_clears_windows() {
    let app = TestApp::with_config(|c| c.rate_limit.min_requests_per_min = 1);
    set_quota(&app, 1).await;
    app.login_as(ANALYST).await;
    let integrations = app.backend.integrations();

    integrations.invoke_llm("first").await.unwrap();
    assert!(integrations.invoke_llm("second").await.unwrap_err().is(ErrorKind::RateLimited));

    app.backend.auth().reset_demo().await.unwrap();
    set_quota(&app, 1).await;
    app.login_as(ANALYST).await;
    integrations.invoke_llm("after reset").await.unwrap();
}
