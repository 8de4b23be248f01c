use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::api::middleware::{require_self, AuthUser};
use crate::error::Result;
use crate::store;

#[derive(Deserialize)]
pub struct ListQuery {
    limit: Option<u64>,
}

/// Insights are write-only from the client's perspective: analysis handlers
/// persist them, this endpoint only reads them back.
pub async fn list_insights(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let insights = store::insights::list_by_user(&db, user_id, query.limit).await?;
    Ok(Json(insights))
}
