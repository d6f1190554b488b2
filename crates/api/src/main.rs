use anyhow::Context;

use nexus_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nexus_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    if !config.ai.has_credential() {
        tracing::warn!("GEMINI_API_KEY not set; AI features will report themselves unavailable");
    }

    let services = nexus_api::app::build_services(&config)
        .await
        .context("failed to start services")?;
    let app = nexus_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
