use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::insight;
use crate::error::Result;

pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    insight_type: String,
    title: String,
    description: String,
) -> Result<insight::Model> {
    let now = chrono::Utc::now().naive_utc();
    let row = insight::ActiveModel {
        user_id: Set(user_id),
        insight_type: Set(insight_type),
        title: Set(title),
        description: Set(description),
        date: Set(now),
        updated_date: Set(now),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
    limit: Option<u64>,
) -> Result<Vec<insight::Model>> {
    let mut query = insight::Entity::find()
        .filter(insight::Column::UserId.eq(user_id))
        .order_by_desc(insight::Column::Date);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query.all(db).await?)
}
