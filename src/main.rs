use std::sync::Arc;

use tokio::net::TcpListener;

use agrimarket_backend::app;
use agrimarket_backend::catalog::Catalog;
use agrimarket_backend::config::AppConfig;
use agrimarket_backend::logging::{self, LoggingConfig};
use agrimarket_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(&LoggingConfig::from_env());

    let config = AppConfig::from_env();
    config.validate().map_err(anyhow::Error::msg)?;

    let bind_addr = config.bind_addr;
    let state = AppState {
        config: Arc::new(config),
        catalog: Arc::new(Catalog::seeded()),
    };

    let app = app::create_app(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("agrimarket analytics backend running at http://{}/", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
