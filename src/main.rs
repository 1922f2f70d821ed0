use tokio::net::TcpListener;
use tracing::info;
use heatsafe::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatsafe=info,tower_http=info".into()),
        )
        .with_target(true)
        .init();

    let server_addr = config.server_addr;
    info!(
        %server_addr,
        data_dir = %config.data_dir.display(),
        data_base_url = %config.data_base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting heatsafe"
    );

    // Create application state
    let app_state = AppState::new(config);

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!("listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
