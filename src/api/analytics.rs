use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;

use crate::api::middleware::{require_self, AuthUser};
use crate::domain;
use crate::error::Result;
use crate::store;

/// Total expense per emotion label. Always returns the full five-label set,
/// zero-filled, because clients chart every label unconditionally.
pub async fn spending_by_emotion(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let transactions = store::transactions::list_by_user(&db, user_id, None).await?;
    let emotions = store::emotions::list_by_user(&db, user_id, None).await?;
    Ok(Json(domain::spending_by_emotion(&transactions, &emotions)))
}
