use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::extractors::ApiJson;
use crate::api::middleware::AuthUser;
use crate::error::{ApiError, Result};
use crate::gemini::{AnalysisOutcome, GeminiClient};
use crate::store;

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    text: String,
}

pub async fn analyze_text(
    Extension(gemini): Extension<Arc<GeminiClient>>,
    Extension(_auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AnalyzeTextRequest>,
) -> Result<impl IntoResponse> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::invalid("text", "must not be empty"));
    }
    let outcome = gemini.analyze_text(&payload.text).await;
    record_outcome("text", &outcome);
    Ok(Json(outcome))
}

#[derive(Deserialize)]
pub struct AnalyzeFaceRequest {
    image_data: String,
}

pub async fn analyze_face(
    Extension(gemini): Extension<Arc<GeminiClient>>,
    Extension(_auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AnalyzeFaceRequest>,
) -> Result<impl IntoResponse> {
    if payload.image_data.is_empty() {
        return Err(ApiError::invalid("image_data", "must not be empty"));
    }
    let outcome = gemini.analyze_face(&payload.image_data).await;
    record_outcome("face", &outcome);
    Ok(Json(outcome))
}

/// Runs the multi-domain correlation over the caller's recent data and
/// persists whatever insights come back. Provider failures still produce a
/// 200 with the fallback payload; nothing here returns a 5xx for upstream
/// trouble.
pub async fn correlate(
    Extension(db): Extension<DatabaseConnection>,
    Extension(gemini): Extension<Arc<GeminiClient>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let cutoff = Utc::now().naive_utc() - Duration::days(30);
    let emotions = store::emotions::list_by_user(&db, auth.0, Some(100)).await?;
    let transactions = store::transactions::list_by_user(&db, auth.0, Some(200)).await?;
    let samples = store::health::list_recent(&db, auth.0, cutoff).await?;

    let outcome = gemini
        .correlate(
            &json!(emotions),
            &json!(transactions),
            &json!(samples),
        )
        .await;
    record_outcome("correlate", &outcome);

    // Only parsed provider output becomes stored insights; the fallback text
    // is served to the caller but not persisted as if the model had said it.
    if let AnalysisOutcome::Parsed(ref report) = outcome {
        for text in &report.insights {
            store::insights::create(
                &db,
                auth.0,
                "correlation".to_string(),
                "Mood, money and health".to_string(),
                text.clone(),
            )
            .await?;
        }
        metrics::gauge!("moodledger_insights_total").increment(report.insights.len() as f64);
    }

    Ok(Json(outcome))
}

fn record_outcome<T>(kind: &'static str, outcome: &AnalysisOutcome<T>) {
    let source = match outcome {
        AnalysisOutcome::Parsed(_) => "parsed",
        AnalysisOutcome::Fallback(_) => "fallback",
    };
    metrics::counter!("moodledger_analysis_requests_total", "kind" => kind, "source" => source)
        .increment(1);
}
