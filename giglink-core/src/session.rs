//! Authentication session context
//!
//! One `AuthSession` is created at login and shared (by `Arc`) with every
//! consumer that performs authenticated calls; it is dropped at logout.
//! There is no ambient global — callers receive the session explicitly.

use chrono::{DateTime, Utc};

use crate::config::schema::AuthConfig;
use crate::models::Role;

/// Process-wide authentication context
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: String,
    user_id: String,
    role: Role,
    started_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a session from an already-issued token
    pub fn new(token: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
            role,
            started_at: Utc::now(),
        }
    }

    /// Build the session from configuration
    ///
    /// Fails when no token is configured, since every API call and the
    /// push channel require one.
    pub fn from_config(config: &AuthConfig) -> crate::Result<Self> {
        if config.token.trim().is_empty() {
            return Err(crate::Error::Session(
                "no auth token configured; set auth.token or GIGLINK_TOKEN".to_string(),
            ));
        }
        Ok(Self::new(
            config.token.trim(),
            config.user_id.clone(),
            config.role,
        ))
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Raw token, used by the push channel handshake
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_config() {
        let config = AuthConfig {
            token: " tok-123 ".to_string(),
            user_id: "u-1".to_string(),
            role: Role::Freelancer,
        };

        let session = AuthSession::from_config(&config).unwrap();
        assert_eq!(session.bearer(), "Bearer tok-123");
        assert_eq!(session.user_id(), "u-1");
        assert_eq!(session.role(), Role::Freelancer);
    }

    #[test]
    fn test_session_requires_token() {
        let config = AuthConfig::default();
        let err = AuthSession::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("auth token"));
    }
}
