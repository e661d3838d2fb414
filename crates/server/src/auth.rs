//! Login and document access checks.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use dashmap::DashMap;
use subtle::ConstantTimeEq;

/// Header carrying a token issued by the login endpoint.
pub const TOKEN_HEADER: &str = "x-api-token";

/// What a login request carried besides the credentials.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    pub request_id: Option<String>,
    pub headers: HeaderMap,
}

/// Exchanges credentials for a token. `None` (or an empty token) means the
/// login is refused.
pub trait Authenticator: Send + Sync {
    fn login(&self, username: &str, password: &str, ctx: &LoginContext) -> Option<String>;
}

/// Decides whether a document request may be served.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, headers: &HeaderMap, instance_name: &str) -> bool;
}

/// Every request is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _headers: &HeaderMap, _instance_name: &str) -> bool {
        true
    }
}

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone)]
struct IssuedToken {
    username: String,
    issued_at: Instant,
}

/// Checks credentials against a fixed table and issues random tokens.
///
/// Each user holds at most one live token: a new login revokes the previous
/// one. Tokens expire after the configured lifetime and expired entries are
/// dropped on lookup and on every login.
pub struct StaticAuthenticator {
    credentials: HashMap<String, String>,
    token_ttl: Duration,
    /// Issued token to owner
    tokens: DashMap<String, IssuedToken>,
    /// Username to its current token
    current: DashMap<String, String>,
}

impl StaticAuthenticator {
    pub fn new(credentials: HashMap<String, String>) -> Self {
        Self {
            credentials,
            token_ttl: DEFAULT_TOKEN_TTL,
            tokens: DashMap::new(),
            current: DashMap::new(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Username a live token was issued to. Expired tokens are removed.
    pub fn token_owner(&self, token: &str) -> Option<String> {
        let issued = self.tokens.get(token).map(|entry| entry.value().clone())?;
        if issued.issued_at.elapsed() >= self.token_ttl {
            self.revoke(token, &issued.username);
            return None;
        }
        Some(issued.username)
    }

    /// Number of tokens currently held, expired ones included until pruned.
    pub fn issued_len(&self) -> usize {
        self.tokens.len()
    }

    fn revoke(&self, token: &str, username: &str) {
        self.tokens.remove(token);
        self.current.remove_if(username, |_, current| current == token);
    }

    fn prune_expired(&self) {
        let ttl = self.token_ttl;
        self.tokens
            .retain(|_, issued| issued.issued_at.elapsed() < ttl);
        self.current
            .retain(|_, token| self.tokens.contains_key(token.as_str()));
    }

    fn password_matches(&self, username: &str, password: &str) -> bool {
        match self.credentials.get(username) {
            Some(expected) => expected.as_bytes().ct_eq(password.as_bytes()).into(),
            None => false,
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn login(&self, username: &str, password: &str, ctx: &LoginContext) -> Option<String> {
        if username.is_empty() || !self.password_matches(username, password) {
            tracing::warn!(
                username,
                request_id = ctx.request_id.as_deref().unwrap_or_default(),
                "login refused"
            );
            return None;
        }

        self.prune_expired();

        let token = uuid::Uuid::new_v4().to_string();
        self.tokens.insert(
            token.clone(),
            IssuedToken {
                username: username.to_string(),
                issued_at: Instant::now(),
            },
        );
        if let Some(previous) = self.current.insert(username.to_string(), token.clone()) {
            self.tokens.remove(&previous);
        }
        tracing::info!(username, "login accepted");
        Some(token)
    }
}

/// Allows requests carrying a token issued by a [`StaticAuthenticator`],
/// either in `x-api-token` or as `Authorization: Bearer <token>`.
pub struct TokenAccess {
    authenticator: std::sync::Arc<StaticAuthenticator>,
}

impl TokenAccess {
    pub fn new(authenticator: std::sync::Arc<StaticAuthenticator>) -> Self {
        Self { authenticator }
    }
}

impl AccessPolicy for TokenAccess {
    fn allows(&self, headers: &HeaderMap, instance_name: &str) -> bool {
        let token = headers
            .get(TOKEN_HEADER)
            .or_else(|| headers.get(AUTHORIZATION))
            .and_then(|v| v.to_str().ok())
            .map(|s| s.strip_prefix("Bearer ").unwrap_or(s));

        let allowed = token.is_some_and(|t| self.authenticator.token_owner(t).is_some());
        if !allowed {
            tracing::debug!(instance = instance_name, "document access refused");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn authenticator() -> Arc<StaticAuthenticator> {
        let mut credentials = HashMap::new();
        credentials.insert("admin".to_string(), "secret".to_string());
        Arc::new(StaticAuthenticator::new(credentials))
    }

    #[test]
    fn new_login_replaces_the_previous_token() {
        let auth = authenticator();
        let ctx = LoginContext::default();
        let a = auth.login("admin", "secret", &ctx).unwrap();
        let b = auth.login("admin", "secret", &ctx).unwrap();
        assert_ne!(a, b);
        assert_eq!(auth.token_owner(&a), None);
        assert_eq!(auth.token_owner(&b).as_deref(), Some("admin"));

        for _ in 0..10 {
            auth.login("admin", "secret", &ctx).unwrap();
        }
        assert_eq!(auth.issued_len(), 1);
    }

    #[test]
    fn expired_token_is_refused_and_dropped() {
        let mut credentials = HashMap::new();
        credentials.insert("admin".to_string(), "secret".to_string());
        let auth = Arc::new(StaticAuthenticator::new(credentials).with_token_ttl(Duration::ZERO));

        let token = auth.login("admin", "secret", &LoginContext::default()).unwrap();
        assert_eq!(auth.token_owner(&token), None);
        assert_eq!(auth.issued_len(), 0);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token.parse().unwrap());
        assert!(!TokenAccess::new(auth).allows(&headers, "swagger"));
    }

    #[test]
    fn wrong_credentials_are_refused() {
        let auth = authenticator();
        let ctx = LoginContext::default();
        assert!(auth.login("admin", "secre", &ctx).is_none());
        assert!(auth.login("nobody", "secret", &ctx).is_none());
        assert!(auth.login("", "", &ctx).is_none());
    }

    #[test]
    fn token_access_accepts_both_headers() {
        let auth = authenticator();
        let token = auth.login("admin", "secret", &LoginContext::default()).unwrap();
        let policy = TokenAccess::new(auth);

        let mut headers = HeaderMap::new();
        assert!(!policy.allows(&headers, "swagger"));

        headers.insert(TOKEN_HEADER, token.parse().unwrap());
        assert!(policy.allows(&headers, "swagger"));

        let mut bearer = HeaderMap::new();
        bearer.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        assert!(policy.allows(&bearer, "swagger"));

        let mut forged = HeaderMap::new();
        forged.insert(TOKEN_HEADER, "forged".parse().unwrap());
        assert!(!policy.allows(&forged, "swagger"));
    }
}
