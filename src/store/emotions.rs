use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::EmotionKind;
use crate::entities::emotion;
use crate::error::Result;

pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    kind: EmotionKind,
    notes: Option<String>,
    date: Option<NaiveDateTime>,
) -> Result<emotion::Model> {
    let row = emotion::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        notes: Set(notes),
        date: Set(date.unwrap_or_else(|| chrono::Utc::now().naive_utc())),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// All of a user's emotions, newest first.
pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
    limit: Option<u64>,
) -> Result<Vec<emotion::Model>> {
    let mut query = emotion::Entity::find()
        .filter(emotion::Column::UserId.eq(user_id))
        .order_by_desc(emotion::Column::Date);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query.all(db).await?)
}

pub async fn latest_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<emotion::Model>> {
    Ok(emotion::Entity::find()
        .filter(emotion::Column::UserId.eq(user_id))
        .order_by_desc(emotion::Column::Date)
        .one(db)
        .await?)
}

/// Looks up an emotion only if it belongs to the given user.
pub async fn find_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    emotion_id: i32,
) -> Result<Option<emotion::Model>> {
    Ok(emotion::Entity::find_by_id(emotion_id)
        .filter(emotion::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}
