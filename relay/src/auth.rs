//! Credential resolution.
//!
//! Identity lives outside the relay: clients present a bearer token (as the
//! `token` query parameter at connect time, or an `Authorization` header on
//! HTTP routes) and a pluggable [`AuthProvider`] resolves it to a user id.
//! The relay ships two providers — a single shared-secret token for small
//! deployments, and an open provider for development — and deployments with
//! a real identity service implement the trait against it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use async_trait::async_trait;

/// Resolves a bearer credential to a user identity.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Some(user_id)` if the token is valid, `None` otherwise.
    async fn authenticate(&self, token: &str) -> Option<String>;
}

/// Accepts exactly one pre-shared token.
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, token: &str) -> Option<String> {
        if token == self.token { Some("shared".to_owned()) } else { None }
    }
}

/// Accepts any non-empty token and uses it as the identity. Development
/// only.
pub struct OpenAuth;

#[async_trait]
impl AuthProvider for OpenAuth {
    async fn authenticate(&self, token: &str) -> Option<String> {
        if token.is_empty() { None } else { Some(token.to_owned()) }
    }
}
