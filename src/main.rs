use std::sync::Arc;

use reelmatch_api::{
    config::Config,
    create_router,
    services::StaticMetadataProvider,
    AppState, Dataset, RankSettings,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Load the catalog and similarity matrix once; both are read-only afterwards
    let dataset = Dataset::load(&config).await;
    let mut state = AppState::new(dataset, RankSettings::from(&config));

    if let Some(path) = &config.metadata_path {
        match StaticMetadataProvider::from_file(path).await {
            Ok(provider) => {
                if provider.is_empty() {
                    tracing::warn!(path = %path, "Metadata snapshot has no entries");
                }
                state = state.with_metadata(Arc::new(provider));
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Metadata snapshot unavailable, serving titles only");
            }
        }
    }

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
