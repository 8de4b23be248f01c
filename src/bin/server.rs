use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use moodledger_server::{app, gemini::GeminiClient, metrics, migrator, telemetry};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry();

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    metrics::init_metrics(&db).await;

    let gemini = Arc::new(GeminiClient::from_env());

    let app = app::router(db, gemini)
        .layer(prometheus_layer)
        .route("/metrics", get(|| async move { metric_handle.render() }));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let addr: SocketAddr = bind_addr.parse().expect("Invalid BIND_ADDR");
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
