use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use login_panel::{
    InMemoryUserRepository, Interaction, Page, RequestContext, SessionStore, SessionToken,
    SessionView, resolve_session_token,
};
use serde_json::json;

use crate::common::{ManualClock, panel, panel_with, registration_form};

/// Test that a token minted on the first visit and replayed by the client resolves
/// to the same session
#[tokio::test]
async fn test_minted_token_round_trips() {
    let store = SessionStore::new(3600);

    let mut first_visit = Interaction::new();
    let minted = resolve_session_token(&store, &mut first_visit).await;
    store.set(&minted, "draft", json!("hello")).await;

    let reflected = first_visit
        .reflected_token()
        .expect("first visit must reflect a token")
        .as_str()
        .to_string();
    let mut next_visit = Interaction::with_query_token(reflected);
    let resolved = resolve_session_token(&store, &mut next_visit).await;

    assert_eq!(resolved, minted);
    assert_eq!(store.get(&resolved, "draft").await, Some(json!("hello")));
    assert_eq!(store.count().await, 1);
}

/// Test the expiry boundary: idle for TIMEOUT - 1 seconds survives, TIMEOUT + 1 does not
#[tokio::test]
async fn test_expiry_boundary() {
    let store = SessionStore::new(3600);
    let mut ctx = Interaction::new();
    let token = resolve_session_token(&store, &mut ctx).await;
    store.set(&token, "k", json!(1)).await;

    let last_access = store.snapshot().await[token.as_str()].last_access;

    store
        .sweep_expired(last_access + Duration::seconds(3599))
        .await;
    assert!(store.snapshot().await.contains_key(token.as_str()));

    store
        .sweep_expired(last_access + Duration::seconds(3601))
        .await;
    assert!(!store.snapshot().await.contains_key(token.as_str()));
}

/// Test that an expired token is treated exactly like one that was never seen
#[tokio::test]
async fn test_expired_token_behaves_like_new() {
    let clock = ManualClock::new();
    let store = SessionStore::with_clock(3600, clock.clone());
    let token = SessionToken::generate();
    store.set(&token, "k", json!("v")).await;

    clock.advance(3601);

    assert_eq!(store.get(&token, "k").await, None);
    assert_eq!(store.get_or(&token, "k", json!("default")).await, json!("default"));
    assert!(!store.contains(&token).await);

    let mut replay = Interaction::with_query_token(token.as_str());
    let resolved = resolve_session_token(&store, &mut replay).await;
    assert_eq!(resolved, token);
    assert!(store.snapshot().await[token.as_str()].state.is_empty());
}

/// Test that a visitor's activity keeps the session alive
#[tokio::test]
async fn test_activity_refreshes_session() {
    let clock = ManualClock::new();
    let store = SessionStore::with_clock(3600, clock.clone());
    let token = SessionToken::generate();
    store.set(&token, "k", json!("v")).await;

    for _ in 0..5 {
        clock.advance(3000);
        let mut ctx = Interaction::with_query_token(token.as_str());
        resolve_session_token(&store, &mut ctx).await;
    }

    assert_eq!(store.get(&token, "k").await, Some(json!("v")));
}

/// Test that clearing twice is the same as clearing once
#[tokio::test]
async fn test_clear_is_idempotent() {
    let store = SessionStore::new(3600);
    let token = SessionToken::generate();
    store.set(&token, "a", json!(1)).await;
    store.set(&token, "b", json!(2)).await;

    store.clear(&token).await;
    let once = store.snapshot().await[token.as_str()].state.clone();
    store.clear(&token).await;
    let twice = store.snapshot().await[token.as_str()].state.clone();

    assert!(once.is_empty());
    assert_eq!(once, twice);
    assert!(store.contains(&token).await);
}

/// Test that concurrent visitors never see each other's values
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_visitors_are_isolated() {
    let clock = ManualClock::new();
    let store = Arc::new(SessionStore::with_clock(3600, clock.clone()));

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut ctx = Interaction::new();
                let token = resolve_session_token(&store, &mut ctx).await;
                for round in 0..20 {
                    store.set(&token, "owner", json!(i)).await;
                    store.set(&token, "round", json!(round)).await;
                    assert_eq!(store.get(&token, "owner").await, Some(json!(i)));
                    if round % 5 == 0 {
                        store.sweep_expired(chrono::Utc::now()).await;
                    }
                }
                token
            })
        })
        .collect();

    let mut tokens = HashSet::new();
    for handle in handles {
        tokens.insert(handle.await.unwrap());
    }

    assert_eq!(tokens.len(), 64);
    let snapshot = store.snapshot().await;
    let owners: HashSet<_> = snapshot
        .values()
        .map(|s| s.state["owner"].clone())
        .collect();
    assert_eq!(owners.len(), 64);
}

/// Test the login scenario end to end through the facade
#[tokio::test]
async fn test_login_scenario() {
    let panel = panel();
    panel
        .submit_registration(
            login_panel::RegistrationAction::Register,
            &registration_form("a@b.com"),
        )
        .await
        .unwrap();

    let mut ctx = Interaction::new();
    let session = panel.resolve(&mut ctx).await;

    let failed = panel.login_session(session.token(), "a@b.com", "wrong").await;
    assert_eq!(failed, Err(login_panel::AuthError::InvalidCredentials));
    assert!(!session.is_logged_in().await);

    panel
        .login_session(session.token(), "a@b.com", "secret")
        .await
        .unwrap();
    assert!(session.is_logged_in().await);
    assert_eq!(session.current_page().await, Page::Protected);
    assert_eq!(session.user_name().await.as_deref(), Some("Alice"));
}

/// Test that one visitor logging in leaves another visitor anonymous
#[tokio::test]
async fn test_login_state_does_not_leak_between_visitors() {
    let sessions = Arc::new(SessionStore::new(3600));
    let panel = panel_with(Arc::new(InMemoryUserRepository::new()), sessions);
    panel
        .submit_registration(
            login_panel::RegistrationAction::Register,
            &registration_form("a@b.com"),
        )
        .await
        .unwrap();

    let alice = panel.resolve(&mut Interaction::new()).await;
    let bob = panel.resolve(&mut Interaction::new()).await;
    panel
        .login_session(alice.token(), "a@b.com", "secret")
        .await
        .unwrap();

    assert_ne!(alice.token(), bob.token());
    assert_eq!(bob.view().await, SessionView::default());
    assert_eq!(panel.status(bob.token()).await.view.permission, None);
}

/// Test that the per-interaction cache keeps one token for repeated reads
#[tokio::test]
async fn test_interaction_cache_is_used() {
    let panel = panel();
    let mut ctx = Interaction::new();

    let first = panel.resolve(&mut ctx).await;
    let second = panel.resolve(&mut ctx).await;

    assert_eq!(first.token(), second.token());
    assert_eq!(ctx.cached_token().as_ref(), Some(first.token()));
    assert_eq!(panel.sessions().count().await, 1);
}
