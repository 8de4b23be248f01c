use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::api::extractors::ApiJson;
use crate::api::middleware::AuthUser;
use crate::domain::EmotionKind;
use crate::error::{ApiError, Result};
use crate::store;

pub async fn list_images(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let images = store::reference_images::list_by_user(&db, auth.0).await?;
    Ok(Json(images))
}

#[derive(Deserialize)]
pub struct CreateImageRequest {
    emotion: String,
    image_data: String,
    description: Option<String>,
}

pub async fn create_image(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateImageRequest>,
) -> Result<impl IntoResponse> {
    let emotion = EmotionKind::parse(&payload.emotion).ok_or_else(|| {
        ApiError::invalid(
            "emotion",
            "must be one of stressed, worried, neutral, content, happy",
        )
    })?;
    if payload.image_data.is_empty() {
        return Err(ApiError::invalid("image_data", "must not be empty"));
    }

    let image = store::reference_images::create(
        &db,
        auth.0,
        emotion,
        payload.image_data,
        payload.description,
    )
    .await?;

    tracing::info!(user_id = auth.0, image_id = image.id, emotion = %image.emotion, "reference image stored");
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn delete_image(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(image_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let deleted = store::reference_images::delete_for_user(&db, auth.0, image_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Reference image"));
    }
    Ok(Json(json!({"message": "Reference image deleted"})))
}
