use axum::response::{IntoResponse, Json};
use serde_json::json;

// Banner for the bare host, mostly useful for load balancer checks.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "docs": "/docs",
    }))
}
