use anyhow::{Context, Result};
use hashem_trainer::api::{create_routes, AppState};
use hashem_trainer::config::{seed_admin, AppConfig};
use hashem_trainer::services::PaymentResetService;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::from_config(&config)?;
    seed_admin(&state.accounts, &config).await?;

    let mut payment_reset =
        PaymentResetService::new(state.accounts.clone(), config.payment_reset_cron.clone())
            .await?;
    payment_reset.start().await?;

    let app = create_routes(state);

    let listener = TcpListener::bind(config.server_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server_address()))?;
    info!(
        "Hashem server starting on http://{} ({} environment, data in {})",
        config.server_address(),
        config.environment,
        config.data_dir.display()
    );
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    payment_reset.stop().await?;
    info!("Hashem server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
