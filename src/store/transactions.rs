use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::transaction;
use crate::error::Result;

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    amount: f64,
    description: String,
    category: String,
    currency: String,
    date: Option<NaiveDateTime>,
    emotion_id: Option<i32>,
) -> Result<transaction::Model> {
    let row = transaction::ActiveModel {
        user_id: Set(user_id),
        amount: Set(amount),
        description: Set(description),
        category: Set(category),
        currency: Set(currency),
        date: Set(date.unwrap_or_else(|| chrono::Utc::now().naive_utc())),
        emotion_id: Set(emotion_id),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// All of a user's transactions, newest first.
pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
    limit: Option<u64>,
) -> Result<Vec<transaction::Model>> {
    let mut query = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query.all(db).await?)
}
