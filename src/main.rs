// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use learnsmart::config::Config;
use learnsmart::routes;
use learnsmart::services::curriculum::CurriculumIndex;
use learnsmart::services::learner::LearnerState;
use learnsmart::services::persistence::SqliteStateStore;
use learnsmart::state::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "learnsmart.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Database connected...");

    let store = SqliteStateStore::new(pool);
    tracing::info!("Running migrations...");
    store.migrate().await?;
    tracing::info!("Migrations applied successfully.");

    let curriculum = CurriculumIndex::load_from_path(&config.curriculum_path)?;
    tracing::info!(
        path = %config.curriculum_path,
        classes = curriculum.classes().len(),
        "Curriculum loaded"
    );

    let learner = LearnerState::restore(&store, &config.learner_name).await?;

    let state = AppState {
        store: Arc::new(store),
        curriculum: Arc::new(curriculum),
        learner: Arc::new(Mutex::new(learner)),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
