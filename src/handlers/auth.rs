// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{config::Config, error::AppError, utils::jwt::sign_session};

/// DTO for signing in with a school address.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Issues a forum session for a verified school address.
///
/// The address is checked against the allowed domain and then
/// discarded; nothing about the student is persisted.
pub async fn login(
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let domain = payload
        .email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .unwrap_or_default();

    if !domain.eq_ignore_ascii_case(&config.allowed_email_domain) {
        return Err(AppError::AuthError(format!(
            "Only {} accounts may access this forum",
            config.allowed_email_domain
        )));
    }

    let token = sign_session(
        &payload.email,
        &config.forum_id,
        &config.session_secret,
        config.session_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "forum_id": config.forum_id,
    })))
}
