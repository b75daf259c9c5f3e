use crate::api::handlers;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lingap",
        description = "Session authentication API for the community health record system"
    ),
    paths(
        handlers::health::health,
        handlers::auth::login::login,
        handlers::auth::session::session,
        handlers::auth::session::logout,
    ),
    components(schemas(
        handlers::auth::types::LoginRequest,
        handlers::auth::types::LoginResponse,
        handlers::auth::types::LogoutResponse,
        handlers::auth::types::SessionResponse,
        handlers::auth::types::ValidationErrors,
    )),
    tags(
        (name = "auth", description = "Login, logout and session introspection"),
        (name = "health", description = "Service health and build metadata")
    )
)]
pub struct ApiDoc;
