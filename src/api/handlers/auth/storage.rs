//! Database helpers for the account directory and the session store.
//!
//! The directory (`accounts`) is read-only from this module; the session
//! store (`account_sessions`) is the only table the authenticator writes.

use anyhow::{anyhow, Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::{
    generate_csrf_token, generate_session_token, hash_session_token, is_unique_violation,
    verify_password,
};

/// Directory view of an account, everything the login checks need.
pub(crate) struct AccountRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) user_type: String,
    pub(crate) status: String,
    pub(crate) rejection_reason: Option<String>,
    pub(crate) email_verified: bool,
}

/// Freshly minted session; the raw tokens go back to the client as cookies.
pub(crate) struct NewSession {
    pub(crate) token: String,
    pub(crate) csrf_token: String,
}

/// Minimal data returned for a valid session cookie.
pub(crate) struct SessionRecord {
    pub(crate) account_id: Uuid,
    pub(crate) email: String,
    pub(crate) user_type: String,
    pub(crate) csrf_token: String,
}

/// Look up an account by normalized email (login step 2).
pub(crate) async fn lookup_account(pool: &PgPool, email: &str) -> Result<Option<AccountRecord>> {
    let query = r"
        SELECT id, email, password_hash, user_type, status, rejection_reason,
               email_verified_at IS NOT NULL AS email_verified
        FROM accounts
        WHERE email = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup account")?;

    Ok(row.map(|row| AccountRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        user_type: row.get("user_type"),
        status: row.get("status"),
        rejection_reason: row.get("rejection_reason"),
        email_verified: row.get("email_verified"),
    }))
}

/// Final bind (login step 7): re-read the account and re-verify the password
/// immediately before minting the session, then insert the session row.
///
/// Returns `Ok(None)` when the re-check fails, e.g. the account was
/// deactivated or its password changed since the earlier checks ran.
pub(crate) async fn create_session(
    pool: &PgPool,
    email: &str,
    password: &str,
    remember: bool,
    ttl_seconds: i64,
) -> Result<Option<NewSession>> {
    let query = r"
        SELECT id, password_hash, status
        FROM accounts
        WHERE email = $1
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to re-check account for session")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let status: String = row.get("status");
    if !super::flow::is_approved(&status) {
        return Ok(None);
    }
    let password_hash: String = row.get("password_hash");
    if !verify_password(password, &password_hash) {
        return Ok(None);
    }

    let account_id: Uuid = row.get("id");
    insert_session(pool, account_id, remember, ttl_seconds)
        .await
        .map(Some)
}

/// Generate a random token, store only its hash, and return the raw values
/// so the caller can set the cookies.
async fn insert_session(
    pool: &PgPool,
    account_id: Uuid,
    remember: bool,
    ttl_seconds: i64,
) -> Result<NewSession> {
    let query = r"
        INSERT INTO account_sessions (account_id, session_hash, csrf_token, remember, expires_at)
        VALUES ($1, $2, $3, $4, NOW() + ($5 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let csrf_token = generate_csrf_token()?;
        let result = sqlx::query(query)
            .bind(account_id)
            .bind(token_hash)
            .bind(&csrf_token)
            .bind(remember)
            .bind(ttl_seconds)
            .execute(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(_) => return Ok(NewSession { token, csrf_token }),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

/// Resolve a presented session token hash. Only unexpired sessions belonging
/// to active accounts resolve; a deactivated account's sessions die here.
pub(crate) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT accounts.id, accounts.email, accounts.user_type, account_sessions.csrf_token
        FROM account_sessions
        JOIN accounts ON accounts.id = account_sessions.account_id
        WHERE account_sessions.session_hash = $1
          AND account_sessions.expires_at > NOW()
          AND accounts.status = 'ACTIVE'
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    if row.is_none() {
        return Ok(None);
    }

    // Record activity for visibility without extending the session TTL.
    let query = r"
        UPDATE account_sessions
        SET last_seen_at = NOW()
        WHERE session_hash = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update session last_seen_at")?;

    Ok(row.map(|row| SessionRecord {
        account_id: row.get("id"),
        email: row.get("email"),
        user_type: row.get("user_type"),
        csrf_token: row.get("csrf_token"),
    }))
}

/// Delete a session row. Logout is idempotent; it's fine if no rows match.
pub(crate) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    let query = "DELETE FROM account_sessions WHERE session_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;
    Ok(())
}
