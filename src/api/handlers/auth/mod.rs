//! Session authenticator.
//!
//! Login runs an ordered, short-circuiting list of checks (`flow`), each
//! denial attributed to a single form field. The account directory is
//! read-only from here; only the session store is ever written, and only
//! after every check has passed. Role-based redirect targets live in
//! `roles`, cookie plumbing in `session`, and database access in `storage`.

pub(crate) mod flow;
pub(crate) mod login;
pub(crate) mod roles;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod storage;
pub(crate) mod types;
pub(crate) mod utils;

pub use login::login;
pub use session::{logout, session};
pub use state::{AuthConfig, AuthState};

#[cfg(test)]
mod tests;
