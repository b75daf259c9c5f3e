//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::flow::Deny;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
    /// Pre-login destination recorded by the frontend, honored when relative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub redirect_to: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LogoutResponse {
    pub redirect_to: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub account_id: String,
    pub email: String,
    pub role: String,
    pub csrf_token: String,
}

/// Field-scoped validation failure, shaped the way the login form consumes
/// it: a top-level message plus per-field message lists.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ValidationErrors {
    pub message: String,
    pub errors: HashMap<String, Vec<String>>,
}

impl From<Deny> for ValidationErrors {
    fn from(deny: Deny) -> Self {
        let mut errors = HashMap::new();
        errors.insert(deny.field.as_str().to_string(), vec![deny.message.clone()]);
        Self {
            message: deny.message,
            errors,
        }
    }
}
