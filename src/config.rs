// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,

    /// HMAC secret for signing session tokens.
    pub session_secret: String,

    /// Session lifetime in seconds.
    pub session_expiration: u64,

    /// Shared secret gating the moderation dashboard and delete action.
    pub admin_secret: String,

    /// Secret the content key is derived from; posts are stored with
    /// title/content encrypted under it.
    pub content_secret: String,

    /// The forum (tenant) this deployment serves.
    pub forum_id: String,

    /// Email domain allowed to sign in (e.g. "usls.edu.ph").
    pub allowed_email_domain: String,

    /// Freshness window for cached listing queries, in seconds.
    pub cache_ttl_secs: u64,

    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let session_secret = env::var("SESSION_SECRET").expect("SESSION_SECRET must be set");

        let admin_secret = env::var("API_ADMIN_SECRET").expect("API_ADMIN_SECRET must be set");

        let content_secret = env::var("CONTENT_SECRET").expect("CONTENT_SECRET must be set");

        let forum_id = env::var("FORUM_ID").expect("FORUM_ID must be set");

        let allowed_email_domain =
            env::var("ALLOWED_EMAIL_DOMAIN").expect("ALLOWED_EMAIL_DOMAIN must be set");

        let session_expiration = env::var("SESSION_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            session_secret,
            session_expiration,
            admin_secret,
            content_secret,
            forum_id,
            allowed_email_domain,
            cache_ttl_secs,
            rust_log,
        }
    }
}
