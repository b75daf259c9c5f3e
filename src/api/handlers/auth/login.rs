//! Login endpoint.
//!
//! Runs the ordered checks from [`super::flow`] and only touches the session
//! store once every check has passed. Check order decides which message the
//! user sees, so the sequence below mirrors the flow contract exactly.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use super::flow::{self, Deny};
use super::roles::redirect_target;
use super::session::{csrf_cookie, extract_session_token, session_cookie};
use super::state::AuthState;
use super::storage;
use super::types::{LoginRequest, LoginResponse, ValidationErrors};
use super::utils::{hash_session_token, normalize_email, verify_password};

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; session cookie set", body = LoginResponse),
        (status = 400, description = "Missing payload"),
        (status = 422, description = "Credentials rejected", body = ValidationErrors)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let email = normalize_email(&request.email);
    let password = request.password;

    // Step 1: input shape.
    if let Err(deny) = flow::validate_input(&email, &password) {
        return deny_response(deny);
    }

    // Step 2: existence. No password comparison has happened yet, so the
    // secret value cannot influence this outcome.
    let account = match storage::lookup_account(&pool, &email).await {
        Ok(Some(account)) => account,
        Ok(None) => return deny_response(flow::account_missing()),
        Err(err) => {
            error!("Failed to lookup account: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Steps 3-5: status, verification, approval.
    if let Err(deny) = flow::screen_account(&account) {
        return deny_response(deny);
    }

    // Step 6: password.
    if !verify_password(&password, &account.password_hash) {
        return deny_response(flow::wrong_password());
    }

    // Step 7: final bind through the session-issuing path. Nothing has been
    // persisted yet; a failure from here leaves no observable side effect.
    let ttl_seconds = auth_state.config().ttl_for(request.remember);
    let session = match storage::create_session(
        &pool,
        &account.email,
        &password,
        request.remember,
        ttl_seconds,
    )
    .await
    {
        Ok(Some(session)) => session,
        Ok(None) => return deny_response(flow::bind_failed()),
        Err(err) => {
            error!("Failed to create session: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Anti-fixation: a session presented alongside the login dies only now
    // that the replacement exists. A denied or failed attempt above returns
    // before this point and leaves the presented session untouched.
    if let Some(old_token) = extract_session_token(&headers) {
        if let Err(err) = storage::delete_session(&pool, &hash_session_token(&old_token)).await {
            error!("Failed to discard pre-login session: {err}");
        }
    }

    // Step 8: role-based redirect, intended destination taking precedence.
    let redirect_to = redirect_target(&account.user_type, request.intended.as_deref());

    info!(email = %account.email, user_type = %account.user_type, "login succeeded");

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = session_cookie(auth_state.config(), &session.token, ttl_seconds) {
        response_headers.append(SET_COOKIE, cookie);
    }
    if let Ok(cookie) = csrf_cookie(auth_state.config(), &session.csrf_token, ttl_seconds) {
        response_headers.append(SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse { redirect_to }),
    )
        .into_response()
}

fn deny_response(deny: Deny) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationErrors::from(deny)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::{deny_response, login};
    use crate::api::handlers::auth::flow;
    use crate::api::handlers::auth::state::{AuthConfig, AuthState};
    use crate::api::handlers::auth::types::LoginRequest;
    use axum::{
        extract::Extension,
        http::{
            header::{COOKIE, SET_COOKIE},
            HeaderMap, HeaderValue, StatusCode,
        },
        Json,
    };
    use sqlx::PgPool;
    use std::sync::Arc;

    #[test]
    fn deny_maps_to_unprocessable_entity() {
        let response = deny_response(flow::wrong_password());
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    // A lazy pool never opens a connection, so any storage access inside the
    // handler would surface as a 500 instead of the asserted 422.
    #[tokio::test]
    async fn denied_attempt_keeps_the_presented_session() {
        let pool = PgPool::connect_lazy("postgres://lingap@localhost/lingap").expect("lazy pool");
        let auth_state = Arc::new(AuthState::new(AuthConfig::new(
            "http://localhost:5173".to_string(),
        )));
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("lingap_session=stale"));

        let response = login(
            headers,
            Extension(pool),
            Extension(auth_state),
            Some(Json(LoginRequest {
                email: "not-an-email".to_string(),
                password: "secret".to_string(),
                remember: false,
                intended: None,
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        // No cookie mutations on a denial: the presented session survives.
        assert!(response.headers().get(SET_COOKIE).is_none());
    }
}
