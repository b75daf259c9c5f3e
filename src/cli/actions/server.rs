use crate::api::{self, handlers::auth::AuthConfig};
use crate::cli::actions::Action;
use anyhow::{anyhow, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            base_url,
            session_ttl,
            remember_ttl,
        } => {
            let parsed = Url::parse(&dsn)?;
            if parsed.scheme() != "postgres" && parsed.scheme() != "postgresql" {
                return Err(anyhow!("unsupported DSN scheme: {}", parsed.scheme()));
            }

            let auth_config = AuthConfig::new(base_url)
                .with_session_ttl_seconds(session_ttl)
                .with_remember_ttl_seconds(remember_ttl);

            api::new(port, parsed.to_string(), auth_config).await?;
        }
    }

    Ok(())
}
