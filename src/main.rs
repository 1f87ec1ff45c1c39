use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use closet_api::auth::JwtConfig;
use closet_api::config::Config;
use closet_api::db::{self, PgStore};
use closet_api::routes::create_router;
use closet_api::services::{OpenAiClient, TokioScheduler, WeatherService};
use closet_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "closet_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let redis_client = redis::Client::open(config.redis_url.as_str())?;

    let store = Arc::new(PgStore::new(pool));
    let generator = Arc::new(OpenAiClient::new(
        config.generation_api_key.clone(),
        config.generation_api_url.clone(),
        config.generation_model.clone(),
    ));
    let weather = Arc::new(WeatherService::new(
        redis_client,
        config.weather_api_url.clone(),
        config.geocoding_api_url.clone(),
    ));

    let state = AppState::new(
        store,
        generator,
        Arc::new(TokioScheduler),
        weather,
        JwtConfig::new(config.jwt_secret.clone()),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
