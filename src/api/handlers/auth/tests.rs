//! Auth module tests: the ordered-check contract and the redirect table.

use super::flow::{
    self, AccountStatus, Field, MSG_BIND_FAILED, MSG_EMAIL_INVALID, MSG_EMAIL_REQUIRED,
    MSG_INVALID_STATUS, MSG_NO_ACCOUNT, MSG_PASSWORD_REQUIRED, MSG_PENDING, MSG_SUSPENDED,
    MSG_UNVERIFIED, MSG_WRONG_PASSWORD,
};
use super::roles::{redirect_target, sanitize_intended, Role};
use super::storage::AccountRecord;
use super::utils::hash_password_for_tests;
use uuid::Uuid;

fn account(status: &str) -> AccountRecord {
    AccountRecord {
        id: Uuid::nil(),
        email: "bhw@barangay.ph".to_string(),
        password_hash: hash_password_for_tests("correct-password"),
        user_type: "BHW".to_string(),
        status: status.to_string(),
        rejection_reason: None,
        email_verified: true,
    }
}

#[test]
fn input_shape_blames_the_malformed_field() {
    let deny = flow::validate_input("", "secret").expect_err("empty email must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_EMAIL_REQUIRED);

    let deny = flow::validate_input("not-an-email", "secret").expect_err("bad email must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_EMAIL_INVALID);

    let deny = flow::validate_input("a@b.com", "").expect_err("empty password must fail");
    assert_eq!(deny.field, Field::Password);
    assert_eq!(deny.message, MSG_PASSWORD_REQUIRED);

    assert!(flow::validate_input("a@b.com", "secret").is_ok());
}

#[test]
fn unknown_identifier_fails_on_the_email_field() {
    let deny = flow::account_missing();
    assert_eq!(deny.field, Field::Email);
    assert!(deny.message.contains("No account found"));
    assert_eq!(deny.message, MSG_NO_ACCOUNT);
}

// Accounts with any non-active status must be denied regardless of the
// submitted secret; none of these checks even look at the password.
#[test]
fn non_active_statuses_are_denied_with_specific_messages() {
    let deny = flow::screen_account(&account("PENDING")).expect_err("pending must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_PENDING);

    let deny = flow::screen_account(&account("SUSPENDED")).expect_err("suspended must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_SUSPENDED);

    let deny = flow::screen_account(&account("ARCHIVED")).expect_err("unknown must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_INVALID_STATUS);
}

#[test]
fn rejected_account_carries_the_recorded_reason() {
    let mut rejected = account("REJECTED");
    rejected.rejection_reason = Some("Incomplete docs".to_string());
    let deny = flow::screen_account(&rejected).expect_err("rejected must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(
        deny.message,
        "Your registration has been rejected. Reason: Incomplete docs"
    );
}

#[test]
fn rejected_account_without_reason_falls_back() {
    let deny = flow::screen_account(&account("REJECTED")).expect_err("rejected must fail");
    assert_eq!(
        deny.message,
        "Your registration has been rejected. Reason: Contact administrator"
    );
}

#[test]
fn unverified_active_account_is_denied() {
    let mut unverified = account("ACTIVE");
    unverified.email_verified = false;
    let deny = flow::screen_account(&unverified).expect_err("unverified must fail");
    assert_eq!(deny.field, Field::Email);
    assert_eq!(deny.message, MSG_UNVERIFIED);
}

#[test]
fn active_verified_account_passes_screening() {
    assert!(flow::screen_account(&account("ACTIVE")).is_ok());
    // Tolerant parsing: stored casing must not matter.
    assert!(flow::screen_account(&account("active")).is_ok());
}

#[test]
fn status_parse_is_tolerant_and_total() {
    assert_eq!(AccountStatus::parse(" pending "), AccountStatus::Pending);
    assert_eq!(AccountStatus::parse("ACTIVE"), AccountStatus::Active);
    assert_eq!(AccountStatus::parse("Rejected"), AccountStatus::Rejected);
    assert_eq!(AccountStatus::parse("suspended"), AccountStatus::Suspended);
    assert_eq!(AccountStatus::parse(""), AccountStatus::Unknown);
    assert_eq!(AccountStatus::parse("DELETED"), AccountStatus::Unknown);
}

#[test]
fn approval_is_derived_from_status() {
    assert!(flow::is_approved("ACTIVE"));
    assert!(!flow::is_approved("PENDING"));
    assert!(!flow::is_approved("REJECTED"));
    assert!(!flow::is_approved("SUSPENDED"));
    assert!(!flow::is_approved("whatever"));
}

#[test]
fn only_the_password_check_blames_the_password_field() {
    assert_eq!(flow::wrong_password().field, Field::Password);
    assert_eq!(flow::wrong_password().message, MSG_WRONG_PASSWORD);
    // The defensive re-check failure is reported like a validation issue,
    // attributed to the email field.
    assert_eq!(flow::bind_failed().field, Field::Email);
    assert_eq!(flow::bind_failed().message, MSG_BIND_FAILED);
}

#[test]
fn redirect_table_is_total_and_deterministic() {
    assert_eq!(Role::parse("ADMIN").dashboard_route(), "/admin/dashboard");
    assert_eq!(Role::parse("BHW").dashboard_route(), "/bhw/dashboard");
    assert_eq!(
        Role::parse("MEDICAL_STAFF").dashboard_route(),
        "/medical/dashboard"
    );
    assert_eq!(Role::parse("PATIENT").dashboard_route(), "/dashboard");
    assert_eq!(Role::parse("").dashboard_route(), "/dashboard");
    assert_eq!(Role::parse("bhw"), Role::Bhw);
}

#[test]
fn intended_destination_takes_precedence() {
    assert_eq!(redirect_target("BHW", None), "/bhw/dashboard");
    assert_eq!(
        redirect_target("BHW", Some("/household/profiles")),
        "/household/profiles"
    );
    assert_eq!(redirect_target("ADMIN", None), "/admin/dashboard");
}

#[test]
fn intended_destination_rejects_offsite_targets() {
    assert_eq!(sanitize_intended(None), None);
    assert_eq!(sanitize_intended(Some("https://evil.example")), None);
    assert_eq!(sanitize_intended(Some("//evil.example")), None);
    assert_eq!(sanitize_intended(Some("relative/path")), None);
    assert_eq!(sanitize_intended(Some("/ok\\bad")), None);
    assert_eq!(
        sanitize_intended(Some(" /admin/resident ")),
        Some("/admin/resident".to_string())
    );
}
