use super::ServeArgs;
use deepculture_server::{AppConfig, AppState, ServeCliFlags, config::API_KEY_PLACEHOLDER};
use std::net::SocketAddr;
use tracing::{info, warn};

pub async fn run(args: ServeArgs) -> Result<(), String> {
    let ServeArgs {
        bind,
        config,
        endpoint,
        api_key,
        model,
        max_tokens,
        log_dir,
    } = args;

    let flags = ServeCliFlags {
        endpoint,
        api_key,
        model,
        max_tokens,
        log_dir,
    };
    let config = AppConfig::load(config.as_deref(), &flags)
        .map_err(|e| format!("Failed to load config: {}", e))?;

    if config.uses_placeholder_key() {
        warn!(
            "no API key configured; upstream calls will be sent with {:?}. Set MISTRAL_API_KEY or [upstream].api_key",
            API_KEY_PLACEHOLDER
        );
    }

    let state = AppState::from_config(&config)
        .map_err(|e| format!("Failed to initialize completion client: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", bind, e))?;

    info!(
        bind = %bind,
        endpoint = %config.endpoint,
        model = %config.model,
        log_dir = %config.log_dir.display(),
        "deepculture server listening"
    );

    let app = deepculture_server::router(state);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutting down");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| format!("Server error: {}", e))
}
