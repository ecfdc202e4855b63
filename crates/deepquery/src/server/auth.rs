//! Bearer-token identity resolution
//!
//! Authentication mechanics live outside this service; all it needs is a
//! stable per-request user id. The seam is a trait so the token registry can
//! be swapped for a real identity service without touching handlers.

use std::collections::HashMap;

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::config::TokenEntry;
use crate::error::Error;
use crate::server::state::AppState;

/// Resolve a bearer token to a user id
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Static token -> user registry from configuration
pub struct TokenRegistry {
    tokens: HashMap<String, String>,
}

impl TokenRegistry {
    pub fn new(entries: &[TokenEntry]) -> Self {
        Self {
            tokens: entries
                .iter()
                .map(|e| (e.token.clone(), e.user_id.clone()))
                .collect(),
        }
    }
}

impl IdentityProvider for TokenRegistry {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// The authenticated user id, extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct Identity(pub String);

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::Auth("missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Auth("expected a bearer token".to_string()))?;

        let user_id = state
            .identity()
            .resolve(token)
            .ok_or_else(|| Error::Auth("unknown token".to_string()))?;

        Ok(Identity(user_id))
    }
}
