use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::EmotionKind;
use crate::entities::emotion_reference_image;
use crate::error::Result;

pub async fn create(
    db: &DatabaseConnection,
    user_id: i32,
    emotion: EmotionKind,
    image_data: String,
    description: Option<String>,
) -> Result<emotion_reference_image::Model> {
    let now = chrono::Utc::now().naive_utc();
    let row = emotion_reference_image::ActiveModel {
        user_id: Set(user_id),
        emotion: Set(emotion.as_str().to_string()),
        image_data: Set(image_data),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<emotion_reference_image::Model>> {
    Ok(emotion_reference_image::Entity::find()
        .filter(emotion_reference_image::Column::UserId.eq(user_id))
        .order_by_desc(emotion_reference_image::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Returns whether a row was actually removed.
pub async fn delete_for_user(db: &DatabaseConnection, user_id: i32, image_id: i32) -> Result<bool> {
    let res = emotion_reference_image::Entity::delete_many()
        .filter(emotion_reference_image::Column::Id.eq(image_id))
        .filter(emotion_reference_image::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
