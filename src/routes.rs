// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, dashboard, posts},
    state::AppState,
    utils::jwt::session_middleware,
};

/// Assembles the main application router.
///
/// * Public: login, single post pages.
/// * Session-gated: the forum feed.
/// * Session + admin key: dashboard listing and moderation delete.
pub fn create_router(state: AppState) -> Router {
    let origins: [HeaderValue; 2] = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new().route("/login", post(auth::login));

    let post_routes = Router::new()
        .route("/{id}", get(posts::get_post))
        // Feed requires a session; single posts stay public.
        .merge(
            Router::new().route("/", get(posts::list_feed)).layer(
                middleware::from_fn_with_state(state.clone(), session_middleware),
            ),
        );

    let dashboard_routes = Router::new()
        .route("/api/dashboard-posts", get(dashboard::dashboard_posts))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    let admin_routes = Router::new()
        .route("/posts/{id}", delete(admin::delete_post))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/posts", post_routes)
        .nest("/api/admin", admin_routes)
        .merge(dashboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
