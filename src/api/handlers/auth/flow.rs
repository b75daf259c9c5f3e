//! Ordered login checks.
//!
//! Each check returns `Result<(), Deny>` and the caller short-circuits at the
//! first denial with `?`. The order is part of the contract: it decides which
//! message the user sees, so checks must never be reordered or merged.
//! Everything before the password comparison is attributed to the `email`
//! field; only a failed password comparison blames `password`.

use super::storage::AccountRecord;
use super::utils::valid_email;

pub(crate) const MSG_EMAIL_REQUIRED: &str = "The email field is required.";
pub(crate) const MSG_EMAIL_INVALID: &str = "The email field must be a valid email address.";
pub(crate) const MSG_PASSWORD_REQUIRED: &str = "The password field is required.";
pub(crate) const MSG_NO_ACCOUNT: &str = "No account found with this email address.";
pub(crate) const MSG_PENDING: &str = "Your account is pending admin approval.";
pub(crate) const MSG_SUSPENDED: &str =
    "Your account has been suspended. Please contact administrator.";
pub(crate) const MSG_INVALID_STATUS: &str =
    "Your account status is invalid. Please contact administrator.";
pub(crate) const MSG_UNVERIFIED: &str = "Please verify your email address before logging in.";
pub(crate) const MSG_WRONG_PASSWORD: &str = "The password you entered is incorrect.";
pub(crate) const MSG_BIND_FAILED: &str = "Authentication failed. Please try again.";

const REJECTION_FALLBACK: &str = "Contact administrator";

/// Which login form slot a denial belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    Email,
    Password,
}

impl Field {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// A denied check: the field to blame and the message to show.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Deny {
    pub(crate) field: Field,
    pub(crate) message: String,
}

impl Deny {
    fn email(message: impl Into<String>) -> Self {
        Self {
            field: Field::Email,
            message: message.into(),
        }
    }

    fn password(message: impl Into<String>) -> Self {
        Self {
            field: Field::Password,
            message: message.into(),
        }
    }
}

/// Account lifecycle status as stored in the directory. Anything the parser
/// does not recognize lands on `Unknown` and is denied with its own message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AccountStatus {
    Pending,
    Active,
    Rejected,
    Suspended,
    Unknown,
}

impl AccountStatus {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "ACTIVE" => Self::Active,
            "REJECTED" => Self::Rejected,
            "SUSPENDED" => Self::Suspended,
            _ => Self::Unknown,
        }
    }
}

/// Step 1: input shape. The field blamed is whichever input is malformed.
pub(crate) fn validate_input(email: &str, password: &str) -> Result<(), Deny> {
    if email.is_empty() {
        return Err(Deny::email(MSG_EMAIL_REQUIRED));
    }
    if !valid_email(email) {
        return Err(Deny::email(MSG_EMAIL_INVALID));
    }
    if password.is_empty() {
        return Err(Deny::password(MSG_PASSWORD_REQUIRED));
    }
    Ok(())
}

/// Step 2 denial: no account for the submitted email. Raised before any
/// password comparison so the secret value never influences the outcome.
pub(crate) fn account_missing() -> Deny {
    Deny::email(MSG_NO_ACCOUNT)
}

/// Steps 3-5: lifecycle status, email verification, and admin approval.
/// All three blame the `email` field.
pub(crate) fn screen_account(account: &AccountRecord) -> Result<(), Deny> {
    status_gate(&account.status, account.rejection_reason.as_deref())?;
    verification_gate(account.email_verified)?;
    approval_gate(is_approved(&account.status))?;
    Ok(())
}

fn status_gate(status_raw: &str, rejection_reason: Option<&str>) -> Result<(), Deny> {
    match AccountStatus::parse(status_raw) {
        AccountStatus::Active => Ok(()),
        AccountStatus::Pending => Err(Deny::email(MSG_PENDING)),
        AccountStatus::Rejected => Err(Deny::email(format!(
            "Your registration has been rejected. Reason: {}",
            rejection_reason.unwrap_or(REJECTION_FALLBACK)
        ))),
        AccountStatus::Suspended => Err(Deny::email(MSG_SUSPENDED)),
        AccountStatus::Unknown => Err(Deny::email(MSG_INVALID_STATUS)),
    }
}

fn verification_gate(verified: bool) -> Result<(), Deny> {
    if verified {
        Ok(())
    } else {
        Err(Deny::email(MSG_UNVERIFIED))
    }
}

// Approval is derived from status, so this can only fire if the derivation
// changes; it is kept as an independent gate on purpose.
fn approval_gate(approved: bool) -> Result<(), Deny> {
    if approved {
        Ok(())
    } else {
        Err(Deny::email(MSG_PENDING))
    }
}

/// Approval flag as derived from the lifecycle status.
pub(crate) fn is_approved(status_raw: &str) -> bool {
    AccountStatus::parse(status_raw) == AccountStatus::Active
}

/// Step 6 denial: the only check attributed to the `password` field.
pub(crate) fn wrong_password() -> Deny {
    Deny::password(MSG_WRONG_PASSWORD)
}

/// Step 7 denial: the session-issuing re-check failed even though every
/// prior check passed, e.g. the account changed between steps. Deliberately
/// reported like any other validation failure.
pub(crate) fn bind_failed() -> Deny {
    Deny::email(MSG_BIND_FAILED)
}
