use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;

use crate::{api, gemini::GeminiClient};

async fn health_check() -> &'static str {
    "OK"
}

/// Builds the application router with all routes and per-request layers.
/// The prometheus layer and `/metrics` route are added by the server binary
/// because the metrics recorder can only be installed once per process.
pub fn router(db: DatabaseConnection, gemini: Arc<GeminiClient>) -> Router {
    let public_routes = Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/logout", post(api::auth::logout));

    let protected_routes = Router::new()
        .route("/api/users/me", get(api::auth::me))
        .route("/api/auth/password", post(api::auth::change_password))
        .route(
            "/api/users/:user_id/emotions",
            get(api::emotion::list_emotions),
        )
        .route(
            "/api/users/:user_id/emotions/latest",
            get(api::emotion::latest_emotion),
        )
        .route("/api/emotions", post(api::emotion::create_emotion))
        .route(
            "/api/users/:user_id/transactions",
            get(api::transaction::list_transactions),
        )
        .route(
            "/api/transactions",
            post(api::transaction::create_transaction),
        )
        .route(
            "/api/users/:user_id/health/:metric",
            get(api::health::list_samples),
        )
        .route(
            "/api/users/:user_id/health/:metric/latest",
            get(api::health::latest_sample),
        )
        .route(
            "/api/users/:user_id/health/:metric/stats",
            get(api::health::sample_stats),
        )
        .route("/api/health", post(api::health::create_sample))
        .route(
            "/api/users/:user_id/analytics/spending-by-emotion",
            get(api::analytics::spending_by_emotion),
        )
        .route(
            "/api/users/:user_id/budgets",
            get(api::budget::list_budgets).post(api::budget::create_budget),
        )
        .route(
            "/api/budgets/:id",
            axum::routing::patch(api::budget::update_budget).delete(api::budget::delete_budget),
        )
        .route("/api/budgets/:id/spending", get(api::budget::budget_spending))
        .route(
            "/api/emotion-reference-images",
            get(api::reference_image::list_images).post(api::reference_image::create_image),
        )
        .route(
            "/api/emotion-reference-images/:id",
            axum::routing::delete(api::reference_image::delete_image),
        )
        .route(
            "/api/users/:user_id/insights",
            get(api::insight::list_insights),
        )
        .route("/api/ml/analyze-text", post(api::analysis::analyze_text))
        .route("/api/ml/analyze-face", post(api::analysis::analyze_face))
        .route("/api/ml/correlate", post(api::analysis::correlate))
        .route_layer(axum::middleware::from_fn(api::middleware::auth_middleware));

    let cors_origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(db))
        .layer(Extension(gemini))
        .layer(tower_cookies::CookieManagerLayer::new())
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        name = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(
                    cors_origin
                        .parse::<axum::http::HeaderValue>()
                        .unwrap_or_else(|_| {
                            axum::http::HeaderValue::from_static("http://localhost:3000")
                        }),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true),
        )
}
