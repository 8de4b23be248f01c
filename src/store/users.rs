use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::entities::user;
use crate::error::Result;

pub async fn create(
    db: &DatabaseConnection,
    username: String,
    password_hash: String,
    name: String,
    initials: String,
) -> Result<user::Model> {
    let row = user::ActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        name: Set(name),
        initials: Set(initials),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?)
}

pub async fn set_password_hash(
    db: &DatabaseConnection,
    user: user::Model,
    password_hash: String,
) -> Result<user::Model> {
    let mut active = user.into_active_model();
    active.password_hash = Set(password_hash);
    Ok(active.update(db).await?)
}
