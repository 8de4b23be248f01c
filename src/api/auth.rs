use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_cookies::{Cookie, Cookies};

use crate::api::extractors::ApiJson;
use crate::api::middleware::{AuthUser, SESSION_COOKIE};
use crate::error::{ApiError, Result};
use crate::store;

#[derive(serde::Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
    name: String,
    initials: Option<String>,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

fn derive_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::invalid("username", "must not be empty"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::invalid("password", "must be at least 8 characters"));
    }

    if store::users::find_by_username(&db, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let initials = payload
        .initials
        .unwrap_or_else(|| derive_initials(&payload.name));

    let user = store::users::create(
        &db,
        payload.username,
        password_hash,
        payload.name,
        initials,
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    metrics::counter!("moodledger_users_registered_total").increment(1);
    metrics::gauge!("moodledger_users_total").increment(1.0);

    Ok((
        StatusCode::CREATED,
        Json(json!({"id": user.id, "username": user.username, "name": user.name, "initials": user.initials})),
    ))
}

#[derive(serde::Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = store::users::find_by_username(&db, &payload.username)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(format!("invalid password hash in DB: {e}")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(username = %payload.username, "login rejected");
        return Err(ApiError::Unauthorized);
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, user.id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);

    tracing::info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(
        json!({"id": user.id, "username": user.username, "name": user.name}),
    ))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);
    Json(json!({"message": "Logged out"}))
}

pub async fn me(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let user = store::users::find_by_id(&db, auth.0)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "name": user.name,
        "initials": user.initials,
        "created_at": user.created_at,
    })))
}

#[derive(serde::Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn change_password(
    Extension(db): Extension<DatabaseConnection>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::invalid(
            "new_password",
            "must be at least 8 characters",
        ));
    }

    let user = store::users::find_by_id(&db, auth.0)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(format!("invalid password hash in DB: {e}")))?;
    if Argon2::default()
        .verify_password(payload.current_password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::Unauthorized);
    }

    let password_hash = hash_password(&payload.new_password)?;
    store::users::set_password_hash(&db, user, password_hash).await?;

    Ok(Json(json!({"message": "Password updated"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_come_from_the_first_two_words() {
        assert_eq!(derive_initials("Ada Lovelace"), "AL");
        assert_eq!(derive_initials("Prince"), "P");
        assert_eq!(derive_initials("mary jane watson"), "MJ");
        assert_eq!(derive_initials(""), "");
    }
}
