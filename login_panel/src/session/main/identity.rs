//! Session identity resolution
//!
//! Works out which session an interaction belongs to. The host environment supplies
//! a [`RequestContext`]: a per-interaction scratch cache, the token the client sent
//! in the URL (if any), and a way to reflect a newly minted token back to the client.

use crate::session::main::store::SessionStore;
use crate::session::types::SessionToken;

/// What the host environment must provide for one interaction
pub trait RequestContext {
    /// Token already resolved earlier in this same interaction
    fn cached_token(&self) -> Option<SessionToken>;

    /// Remember the resolved token for the rest of this interaction
    fn cache_token(&mut self, token: SessionToken);

    /// Raw token carried by the inbound request's URL parameter
    fn query_token(&self) -> Option<String>;

    /// Arrange for the client to send `token` on its next requests
    fn reflect_token(&mut self, token: &SessionToken);
}

/// Resolve the session token for an interaction and register it with the store.
///
/// Order of preference: the interaction's cached token, then a well-formed token
/// from the URL, then a freshly minted one that is reflected back to the client.
/// An unrecognized URL token is adopted as a new, empty session. Every call refreshes
/// the session's last access time.
pub async fn resolve_session_token(
    store: &SessionStore,
    ctx: &mut impl RequestContext,
) -> SessionToken {
    if let Some(token) = ctx.cached_token() {
        store.touch(&token).await;
        return token;
    }

    let token = match ctx.query_token() {
        Some(raw) => match SessionToken::parse(&raw) {
            Some(token) => {
                tracing::debug!(token = %token.redacted(), "Adopting session token from request");
                token
            }
            None => {
                tracing::warn!("Ignoring malformed session token from request");
                mint(ctx)
            }
        },
        None => mint(ctx),
    };

    store.touch(&token).await;
    ctx.cache_token(token.clone());
    token
}

fn mint(ctx: &mut impl RequestContext) -> SessionToken {
    let token = SessionToken::generate();
    tracing::debug!(token = %token.redacted(), "Minted new session token");
    ctx.reflect_token(&token);
    token
}

/// Plain in-memory [`RequestContext`] for hosts without their own request type
#[derive(Debug, Default, Clone)]
pub struct Interaction {
    query_token: Option<String>,
    cached: Option<SessionToken>,
    reflected: Option<SessionToken>,
}

impl Interaction {
    /// An interaction whose request carried no token
    pub fn new() -> Self {
        Self::default()
    }

    /// An interaction whose request carried `raw` in the token parameter
    pub fn with_query_token(raw: impl Into<String>) -> Self {
        Self {
            query_token: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Token that must be sent back to the client, if one was minted
    pub fn reflected_token(&self) -> Option<&SessionToken> {
        self.reflected.as_ref()
    }
}

impl RequestContext for Interaction {
    fn cached_token(&self) -> Option<SessionToken> {
        self.cached.clone()
    }

    fn cache_token(&mut self, token: SessionToken) {
        self.cached = Some(token);
    }

    fn query_token(&self) -> Option<String> {
        self.query_token.clone()
    }

    fn reflect_token(&mut self, token: &SessionToken) {
        self.query_token = Some(token.as_str().to_string());
        self.reflected = Some(token.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_first_visit_mints_and_reflects() {
        let store = SessionStore::new(3600);
        let mut ctx = Interaction::new();

        let token = resolve_session_token(&store, &mut ctx).await;

        assert_eq!(ctx.reflected_token(), Some(&token));
        assert_eq!(ctx.cached_token(), Some(token.clone()));
        assert!(store.contains(&token).await);
    }

    #[tokio::test]
    async fn test_replayed_token_resolves_to_same_session() {
        let store = SessionStore::new(3600);
        let mut first = Interaction::new();
        let token = resolve_session_token(&store, &mut first).await;
        store.set(&token, "k", json!("kept")).await;

        let reflected = first.reflected_token().unwrap().as_str().to_string();
        let mut second = Interaction::with_query_token(reflected);
        let replayed = resolve_session_token(&store, &mut second).await;

        assert_eq!(replayed, token);
        assert_eq!(second.reflected_token(), None);
        assert_eq!(store.get(&replayed, "k").await, Some(json!("kept")));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_cached_token_wins_over_query() {
        let store = SessionStore::new(3600);
        let mut ctx = Interaction::with_query_token("query-token-0000000000");
        let cached = SessionToken::parse("cached-token-1111111111").unwrap();
        ctx.cache_token(cached.clone());

        let token = resolve_session_token(&store, &mut ctx).await;

        assert_eq!(token, cached);
        assert!(store.contains(&cached).await);
    }

    #[tokio::test]
    async fn test_repeated_resolution_in_one_interaction_is_stable() {
        let store = SessionStore::new(3600);
        let mut ctx = Interaction::new();

        let a = resolve_session_token(&store, &mut ctx).await;
        let b = resolve_session_token(&store, &mut ctx).await;

        assert_eq!(a, b);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_token_starts_fresh_session() {
        let store = SessionStore::new(3600);
        let mut ctx = Interaction::with_query_token("never-issued-by-this-process");

        let token = resolve_session_token(&store, &mut ctx).await;

        assert_eq!(token.as_str(), "never-issued-by-this-process");
        assert_eq!(ctx.reflected_token(), None);
        assert!(store.snapshot().await[token.as_str()].state.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_token_is_replaced() {
        let store = SessionStore::new(3600);
        let mut ctx = Interaction::with_query_token("<script>");

        let token = resolve_session_token(&store, &mut ctx).await;

        assert_ne!(token.as_str(), "<script>");
        assert_eq!(ctx.reflected_token(), Some(&token));
    }
}
