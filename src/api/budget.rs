use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use serde::Deserialize;
use serde_json::json;

use crate::api::extractors::ApiJson;
use crate::api::middleware::{require_self, AuthUser};
use crate::domain;
use crate::error::{ApiError, FieldError, Result};
use crate::store;

const BUDGET_TYPES: [&str; 3] = ["monthly", "yearly", "custom"];

pub async fn list_budgets(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse> {
    require_self(auth, user_id)?;
    let budgets = store::budgets::list_by_user(&db, user_id).await?;
    Ok(Json(budgets))
}

#[derive(Deserialize)]
pub struct CreateBudgetRequest {
    budget_type: String,
    amount: f64,
    category: Option<String>,
    start_date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
    currency: Option<String>,
}

pub async fn create_budget(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateBudgetRequest>,
) -> Result<impl IntoResponse> {
    let mut errors = Vec::new();
    if !BUDGET_TYPES.contains(&payload.budget_type.as_str()) {
        errors.push(FieldError::new(
            "budget_type",
            "must be one of monthly, yearly, custom",
        ));
    }
    if !(payload.amount.is_finite() && payload.amount >= 0.0) {
        errors.push(FieldError::new("amount", "must be a non-negative number"));
    }
    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            errors.push(FieldError::new("end_date", "must not precede start_date"));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let budget = store::budgets::create(
        &db,
        auth.0,
        payload.budget_type,
        payload.amount,
        payload.category,
        payload.start_date,
        payload.end_date,
        payload.currency.unwrap_or_else(|| "USD".to_string()),
    )
    .await?;

    tracing::info!(user_id = auth.0, budget_id = budget.id, "budget created");
    Ok((StatusCode::CREATED, Json(budget)))
}

#[derive(Deserialize)]
pub struct UpdateBudgetRequest {
    budget_type: Option<String>,
    amount: Option<f64>,
    category: Option<Option<String>>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<Option<NaiveDateTime>>,
    is_active: Option<bool>,
    currency: Option<String>,
}

pub async fn update_budget(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(budget_id): Path<i32>,
    ApiJson(payload): ApiJson<UpdateBudgetRequest>,
) -> Result<impl IntoResponse> {
    let budget = store::budgets::find_for_user(&db, auth.0, budget_id)
        .await?
        .ok_or(ApiError::NotFound("Budget"))?;

    if let Some(ref budget_type) = payload.budget_type {
        if !BUDGET_TYPES.contains(&budget_type.as_str()) {
            return Err(ApiError::invalid(
                "budget_type",
                "must be one of monthly, yearly, custom",
            ));
        }
    }
    if let Some(amount) = payload.amount {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(ApiError::invalid("amount", "must be a non-negative number"));
        }
    }

    // The window check holds for the merged row, not just the patched fields.
    let start_date = payload.start_date.unwrap_or(budget.start_date);
    let end_date = match payload.end_date {
        Some(patched) => patched,
        None => budget.end_date,
    };
    if let Some(end) = end_date {
        if end < start_date {
            return Err(ApiError::invalid("end_date", "must not precede start_date"));
        }
    }

    let mut active = budget.into_active_model();
    if let Some(budget_type) = payload.budget_type {
        active.budget_type = Set(budget_type);
    }
    if let Some(amount) = payload.amount {
        active.amount = Set(amount);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(currency) = payload.currency {
        active.currency = Set(currency);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let budget = active.update(&db).await?;
    Ok(Json(budget))
}

pub async fn delete_budget(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(budget_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let deleted = store::budgets::delete_for_user(&db, auth.0, budget_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Budget"));
    }
    Ok(Json(json!({"message": "Budget deleted"})))
}

/// Derived spending for one budget; never stored.
pub async fn budget_spending(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    Path(budget_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let budget = store::budgets::find_for_user(&db, auth.0, budget_id)
        .await?
        .ok_or(ApiError::NotFound("Budget"))?;

    let transactions = store::transactions::list_by_user(&db, auth.0, None).await?;
    let spending = domain::budget_spending(&budget, &transactions, chrono::Utc::now().naive_utc());
    Ok(Json(spending))
}
