//! Admin capability checks.
//!
//! Moderation endpoints take a proof of authorization instead of
//! comparing secrets inline, so the scheme can be swapped without
//! touching call sites.

use crate::{error::AppError, utils::jwt::Claims};

/// Proof that a session was granted moderation access to a forum.
#[derive(Debug, Clone)]
pub struct AdminCapability {
    pub forum_id: String,
}

pub trait AdminAuthorizer: Send + Sync {
    /// Checks a live session plus the caller-supplied key.
    /// A missing or mismatched key rejects with 401 and grants nothing.
    fn authorize(
        &self,
        session: &Claims,
        provided_key: Option<&str>,
    ) -> Result<AdminCapability, AppError>;
}

/// Grants moderation access when the supplied key matches the
/// configured shared secret, scoped to the session's forum.
pub struct SharedSecretAuthorizer {
    secret: String,
}

impl SharedSecretAuthorizer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AdminAuthorizer for SharedSecretAuthorizer {
    fn authorize(
        &self,
        session: &Claims,
        provided_key: Option<&str>,
    ) -> Result<AdminCapability, AppError> {
        match provided_key {
            Some(key) if key == self.secret => Ok(AdminCapability {
                forum_id: session.forum_id.clone(),
            }),
            _ => Err(AppError::AuthError("Unauthorized".to_string())),
        }
    }
}
