use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::api::extractors::ApiJson;
use crate::api::middleware::{require_self, AuthUser};
use crate::domain::{self, HealthMetric};
use crate::error::{ApiError, Result};
use crate::store;

fn parse_metric(s: &str) -> Result<HealthMetric> {
    HealthMetric::parse(s).ok_or_else(|| {
        ApiError::invalid(
            "metric",
            "must be one of heartRate, sleepQuality, recovery, strain, readiness, steps, calories, workout",
        )
    })
}

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<u64>,
}

pub async fn list_samples(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, metric)): Path<(i32, String)>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let metric = parse_metric(&metric)?;
    let samples = store::health::list_by_user_metric(&db, user_id, metric, query.limit).await?;
    Ok(Json(samples))
}

pub async fn latest_sample(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, metric)): Path<(i32, String)>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let metric = parse_metric(&metric)?;
    let sample = store::health::latest_by_user_metric(&db, user_id, metric)
        .await?
        .ok_or(ApiError::NotFound("Health sample"))?;
    Ok(Json(sample))
}

#[derive(Deserialize)]
pub struct StatsQuery {
    days: Option<i64>,
}

pub async fn sample_stats(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path((user_id, metric)): Path<(i32, String)>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let metric = parse_metric(&metric)?;
    let days = query.days.unwrap_or(7);
    if days <= 0 {
        return Err(ApiError::invalid("days", "must be positive"));
    }
    let window = Duration::try_days(days)
        .ok_or_else(|| ApiError::invalid("days", "is out of range"))?;
    let cutoff = Utc::now()
        .naive_utc()
        .checked_sub_signed(window)
        .ok_or_else(|| ApiError::invalid("days", "is out of range"))?;
    let samples = store::health::list_since(&db, user_id, metric, cutoff).await?;
    let stats = domain::health_stats(&samples, cutoff);
    Ok(Json(stats))
}

#[derive(Deserialize)]
pub struct CreateSampleRequest {
    metric: String,
    value: f64,
    unit: String,
    source: Option<String>,
    timestamp: Option<NaiveDateTime>,
    metadata: Option<String>,
}

pub async fn create_sample(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateSampleRequest>,
) -> Result<impl IntoResponse> {
    let metric = parse_metric(&payload.metric)?;
    if !payload.value.is_finite() {
        return Err(ApiError::invalid("value", "must be a finite number"));
    }

    let sample = store::health::create(
        &db,
        auth.0,
        metric,
        payload.value,
        payload.unit,
        payload.source.unwrap_or_else(|| "manual".to_string()),
        payload.timestamp,
        payload.metadata,
    )
    .await?;

    tracing::info!(user_id = auth.0, sample_id = sample.id, metric = %sample.metric, "health sample recorded");
    metrics::counter!("moodledger_health_samples_total", "metric" => metric.as_str()).increment(1);
    metrics::gauge!("moodledger_health_samples_total_rows").increment(1.0);

    Ok((StatusCode::CREATED, Json(sample)))
}
