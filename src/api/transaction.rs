use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::api::extractors::ApiJson;
use crate::api::middleware::{require_self, AuthUser};
use crate::entities::{emotion, transaction};
use crate::error::{ApiError, Result};
use crate::store;

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<u64>,
}

/// A transaction together with its linked emotion, if any.
#[derive(Serialize)]
pub struct TransactionWithEmotion {
    #[serde(flatten)]
    pub transaction: transaction::Model,
    pub emotion: Option<emotion::Model>,
}

pub async fn list_transactions(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let transactions = store::transactions::list_by_user(&db, user_id, query.limit).await?;

    // One batched lookup instead of a query per row
    let emotions = store::emotions::list_by_user(&db, user_id, None).await?;
    let by_id: HashMap<i32, emotion::Model> = emotions.into_iter().map(|e| (e.id, e)).collect();

    let enriched: Vec<TransactionWithEmotion> = transactions
        .into_iter()
        .map(|tx| {
            let emotion = tx.emotion_id.and_then(|id| by_id.get(&id).cloned());
            TransactionWithEmotion {
                transaction: tx,
                emotion,
            }
        })
        .collect();

    Ok(Json(enriched))
}

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    // Negative = expense, positive = income; there is no separate type field
    amount: f64,
    description: String,
    category: String,
    currency: Option<String>,
    date: Option<NaiveDateTime>,
    emotion_id: Option<i32>,
}

pub async fn create_transaction(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateTransactionRequest>,
) -> Result<impl IntoResponse> {
    if !payload.amount.is_finite() {
        return Err(ApiError::invalid("amount", "must be a finite number"));
    }
    if payload.description.trim().is_empty() {
        return Err(ApiError::invalid("description", "must not be empty"));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::invalid("category", "must not be empty"));
    }

    // The emotion link is always validated, and only against the caller's
    // own emotions
    if let Some(emotion_id) = payload.emotion_id {
        store::emotions::find_for_user(&db, auth.0, emotion_id)
            .await?
            .ok_or(ApiError::NotFound("Emotion"))?;
    }

    let tx = store::transactions::create(
        &db,
        auth.0,
        payload.amount,
        payload.description,
        payload.category,
        payload.currency.unwrap_or_else(|| "USD".to_string()),
        payload.date,
        payload.emotion_id,
    )
    .await?;

    tracing::info!(user_id = auth.0, transaction_id = tx.id, amount = tx.amount, "transaction recorded");
    metrics::counter!("moodledger_transactions_recorded_total").increment(1);
    metrics::gauge!("moodledger_transactions_total").increment(1.0);

    Ok((StatusCode::CREATED, Json(tx)))
}
