//! Role-based redirect targets.

/// Account role as stored in the directory. Unrecognized values fall back to
/// `Other`, which keeps the redirect table total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    Admin,
    Bhw,
    MedicalStaff,
    Other,
}

impl Role {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ADMIN" => Self::Admin,
            "BHW" => Self::Bhw,
            "MEDICAL_STAFF" => Self::MedicalStaff,
            _ => Self::Other,
        }
    }

    pub(crate) const fn dashboard_route(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Bhw => "/bhw/dashboard",
            Self::MedicalStaff => "/medical/dashboard",
            Self::Other => "/dashboard",
        }
    }
}

/// Post-login destination: a sanitized intended path wins over the role table.
pub(crate) fn redirect_target(user_type: &str, intended: Option<&str>) -> String {
    sanitize_intended(intended)
        .unwrap_or_else(|| Role::parse(user_type).dashboard_route().to_string())
}

/// Only same-site relative paths are honored as intended destinations.
/// Anything absolute, protocol-relative, or backslashed is dropped.
pub(crate) fn sanitize_intended(intended: Option<&str>) -> Option<String> {
    let path = intended?.trim();
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return None;
    }
    Some(path.to_string())
}
