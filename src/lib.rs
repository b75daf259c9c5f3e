//! # Lingap (Community Health Record Management - Auth)
//!
//! `lingap` is the session authentication service for a barangay community
//! health record system. It fronts the account directory (health workers,
//! medical staff, administrators) and is the only component allowed to mint
//! or destroy sessions.
//!
//! ## Authentication flow
//!
//! Login is an ordered, short-circuiting sequence of checks over the
//! submitted credentials: input shape, account existence, lifecycle status,
//! email verification, admin approval, password, and a final re-verification
//! inside the session-issuing path. Every denial is attributed to a single
//! form field (`email` or `password`) so the frontend can surface it in the
//! right slot; only a wrong password is ever attributed to `password`.
//!
//! ## Sessions
//!
//! Session tokens are random 32-byte values handed out in an `HttpOnly`
//! cookie; the database stores only their SHA-256 hash. A fresh token (and a
//! fresh anti-forgery token) is minted on every successful login, and logout
//! removes the row and clears both cookies. Deactivating an account kills its
//! sessions immediately since lookups join on the active status.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
