//! Session introspection, logout, and cookie plumbing.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::state::{AuthConfig, AuthState};
use super::storage::{delete_session, lookup_session, SessionRecord};
use super::types::{LogoutResponse, SessionResponse};
use super::utils::hash_session_token;

const SESSION_COOKIE_NAME: &str = "lingap_session";
const CSRF_COOKIE_NAME: &str = "lingap_csrf";

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, pool: Extension<PgPool>) -> Response {
    // Missing cookies are treated as "no session" to avoid leaking auth state.
    let Some(token) = extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    // Only the hash is stored; never compare raw tokens against the database.
    let token_hash = hash_session_token(&token);
    match lookup_session(&pool, &token_hash).await {
        Ok(Some(SessionRecord {
            account_id,
            email,
            user_type,
            csrf_token,
        })) => {
            let response = SessionResponse {
                account_id: account_id.to_string(),
                email,
                role: user_type,
                csrf_token,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to lookup session: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Session destroyed; cookies cleared", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    if let Some(token) = extract_session_token(&headers) {
        let token_hash = hash_session_token(&token);
        if let Err(err) = delete_session(&pool, &token_hash).await {
            error!("Failed to delete session: {err}");
        }
    }

    // Always clear both cookies, even if the session record was missing;
    // dropping the row kills the anti-forgery token along with it.
    let mut response_headers = HeaderMap::new();
    let secure = auth_state.config().session_cookie_secure();
    if let Ok(cookie) = clear_cookie(SESSION_COOKIE_NAME, true, secure) {
        response_headers.append(SET_COOKIE, cookie);
    }
    if let Ok(cookie) = clear_cookie(CSRF_COOKIE_NAME, false, secure) {
        response_headers.append(SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        response_headers,
        Json(LogoutResponse {
            redirect_to: "/".to_string(),
        }),
    )
        .into_response()
}

/// Build the `HttpOnly` cookie carrying the session token.
pub(super) fn session_cookie(
    auth_config: &AuthConfig,
    token: &str,
    ttl_seconds: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(SESSION_COOKIE_NAME, token, ttl_seconds, true, auth_config)
}

/// Build the anti-forgery cookie. Not `HttpOnly`: the frontend reads it back
/// into a request header.
pub(super) fn csrf_cookie(
    auth_config: &AuthConfig,
    token: &str,
    ttl_seconds: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(CSRF_COOKIE_NAME, token, ttl_seconds, false, auth_config)
}

fn build_cookie(
    name: &str,
    value: &str,
    ttl_seconds: i64,
    http_only: bool,
    auth_config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    // Only mark cookies secure when the frontend is served over HTTPS.
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax; Max-Age={ttl_seconds}");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if auth_config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_cookie(
    name: &str,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; SameSite=Lax; Max-Age=0");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
