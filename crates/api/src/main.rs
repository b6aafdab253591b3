use anyhow::Context;

use kots_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kots_observability::init();

    let settings = Settings::from_env().context("loading settings")?;
    tracing::info!(identity = ?settings.identity, table = %settings.user_table, "starting kots-api");

    let app = kots_api::app::build_app(&settings)?;

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
