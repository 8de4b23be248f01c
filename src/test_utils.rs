//! Shared helpers for unit and integration tests.
//!
//! Tests run against an in-memory SQLite database with the full migration
//! set applied, so the schema under test is the schema that ships.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::domain::EmotionKind;
use crate::entities::{emotion, user};
use crate::error::Result;
use crate::migrator::Migrator;
use crate::store;

pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // A single connection, otherwise each pooled connection would see its
    // own empty in-memory database
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Creates a test user. The hash is a fixed argon2 digest of "password123";
/// tests that exercise login go through the real register handler instead.
pub async fn create_test_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    store::users::create(
        db,
        username.to_string(),
        "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$3v0Gv4mCyKkkbfluM1aXxMM2SGXPZ4iiztgRTTY7Bs4".to_string(),
        "Test User".to_string(),
        "TU".to_string(),
    )
    .await
}

pub async fn create_test_emotion(
    db: &DatabaseConnection,
    user_id: i32,
    kind: EmotionKind,
) -> Result<emotion::Model> {
    store::emotions::create(db, user_id, kind, None, None).await
}
