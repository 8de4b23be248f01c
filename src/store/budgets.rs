use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::budget;
use crate::error::Result;

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    budget_type: String,
    amount: f64,
    category: Option<String>,
    start_date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
    currency: String,
) -> Result<budget::Model> {
    let now = chrono::Utc::now().naive_utc();
    let row = budget::ActiveModel {
        user_id: Set(user_id),
        budget_type: Set(budget_type),
        amount: Set(amount),
        category: Set(category),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_active: Set(true),
        currency: Set(currency),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

pub async fn list_by_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<budget::Model>> {
    Ok(budget::Entity::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_desc(budget::Column::StartDate)
        .all(db)
        .await?)
}

pub async fn find_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    budget_id: i32,
) -> Result<Option<budget::Model>> {
    Ok(budget::Entity::find_by_id(budget_id)
        .filter(budget::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Returns whether a row was actually removed.
pub async fn delete_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    budget_id: i32,
) -> Result<bool> {
    let res = budget::Entity::delete_many()
        .filter(budget::Column::Id.eq(budget_id))
        .filter(budget::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
