use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::HealthMetric;
use crate::entities::health_sample;
use crate::error::Result;

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    metric: HealthMetric,
    value: f64,
    unit: String,
    source: String,
    timestamp: Option<NaiveDateTime>,
    metadata: Option<String>,
) -> Result<health_sample::Model> {
    let row = health_sample::ActiveModel {
        user_id: Set(user_id),
        metric: Set(metric.as_str().to_string()),
        value: Set(value),
        unit: Set(unit),
        source: Set(source),
        timestamp: Set(timestamp.unwrap_or_else(|| chrono::Utc::now().naive_utc())),
        metadata: Set(metadata),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// A user's samples for one metric, newest first.
pub async fn list_by_user_metric(
    db: &DatabaseConnection,
    user_id: i32,
    metric: HealthMetric,
    limit: Option<u64>,
) -> Result<Vec<health_sample::Model>> {
    let mut query = health_sample::Entity::find()
        .filter(health_sample::Column::UserId.eq(user_id))
        .filter(health_sample::Column::Metric.eq(metric.as_str()))
        .order_by_desc(health_sample::Column::Timestamp);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query.all(db).await?)
}

pub async fn latest_by_user_metric(
    db: &DatabaseConnection,
    user_id: i32,
    metric: HealthMetric,
) -> Result<Option<health_sample::Model>> {
    Ok(health_sample::Entity::find()
        .filter(health_sample::Column::UserId.eq(user_id))
        .filter(health_sample::Column::Metric.eq(metric.as_str()))
        .order_by_desc(health_sample::Column::Timestamp)
        .one(db)
        .await?)
}

/// Recent samples across every metric, newest first. Feeds the correlation
/// prompt.
pub async fn list_recent(
    db: &DatabaseConnection,
    user_id: i32,
    cutoff: NaiveDateTime,
) -> Result<Vec<health_sample::Model>> {
    Ok(health_sample::Entity::find()
        .filter(health_sample::Column::UserId.eq(user_id))
        .filter(health_sample::Column::Timestamp.gte(cutoff))
        .order_by_desc(health_sample::Column::Timestamp)
        .all(db)
        .await?)
}

/// Samples for one metric at or after the cutoff, in no guaranteed order.
pub async fn list_since(
    db: &DatabaseConnection,
    user_id: i32,
    metric: HealthMetric,
    cutoff: NaiveDateTime,
) -> Result<Vec<health_sample::Model>> {
    Ok(health_sample::Entity::find()
        .filter(health_sample::Column::UserId.eq(user_id))
        .filter(health_sample::Column::Metric.eq(metric.as_str()))
        .filter(health_sample::Column::Timestamp.gte(cutoff))
        .all(db)
        .await?)
}
