use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::Cookies;

use crate::error::{ApiError, Result};

pub const SESSION_COOKIE: &str = "moodledger_user";

/// The authenticated user id, inserted into request extensions by
/// `auth_middleware` and the only identity handlers may trust.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub i32);

pub async fn auth_middleware(
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Ok(user_id) = cookie.value().parse::<i32>() {
            request.extensions_mut().insert(AuthUser(user_id));
            return Ok(next.run(request).await);
        }
    }
    Err(ApiError::Unauthorized)
}

/// Rejects any mismatch between the session identity and a `:user_id` path
/// parameter. Every user-scoped route goes through this, so a caller can
/// never read or write another user's rows by editing the URL.
pub fn require_self(auth: AuthUser, user_id: i32) -> Result<()> {
    if auth.0 == user_id {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
