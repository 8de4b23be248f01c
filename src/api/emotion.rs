use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::api::extractors::ApiJson;
use crate::api::middleware::{require_self, AuthUser};
use crate::domain::EmotionKind;
use crate::error::{ApiError, Result};
use crate::store;

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<u64>,
}

pub async fn list_emotions(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let emotions = store::emotions::list_by_user(&db, user_id, query.limit).await?;
    Ok(Json(emotions))
}

pub async fn latest_emotion(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let emotion = store::emotions::latest_by_user(&db, user_id)
        .await?
        .ok_or(ApiError::NotFound("Emotion"))?;
    Ok(Json(emotion))
}

#[derive(Deserialize)]
pub struct CreateEmotionRequest {
    kind: String,
    notes: Option<String>,
    date: Option<NaiveDateTime>,
}

pub async fn create_emotion(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateEmotionRequest>,
) -> Result<impl IntoResponse> {
    let kind = EmotionKind::parse(&payload.kind).ok_or_else(|| {
        ApiError::invalid("kind", "must be one of stressed, worried, neutral, content, happy")
    })?;

    let emotion = store::emotions::create(&db, auth.0, kind, payload.notes, payload.date).await?;

    tracing::info!(user_id = auth.0, emotion_id = emotion.id, kind = %emotion.kind, "emotion logged");
    metrics::counter!("moodledger_emotions_logged_total", "kind" => kind.as_str()).increment(1);
    metrics::gauge!("moodledger_emotions_total").increment(1.0);

    Ok((StatusCode::CREATED, Json(emotion)))
}
