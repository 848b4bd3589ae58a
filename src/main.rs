use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pairwire::config::{Settings, StorageBackend};
use pairwire::routes::signal::Heartbeat;
use pairwire::routes::{self, AppState};
use pairwire::services::{InMemoryStore, InterestStore, MatchStore, PostgresClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_stores(
    settings: &Settings,
) -> std::io::Result<(Arc<dyn InterestStore>, Arc<dyn MatchStore>)> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            Ok((store.clone(), store))
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.query_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );

            let postgres = Arc::new(postgres);
            Ok((postgres.clone(), postgres))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings);

    info!("Starting Pairwire matchmaking and signaling service...");

    let (interests, matches) = build_stores(&settings).await?;

    let heartbeat = Heartbeat::new(
        Duration::from_secs(settings.server.heartbeat_interval_secs.max(1)),
        Duration::from_secs(settings.server.client_timeout_secs.max(1)),
    );

    let app_state = AppState::new(
        interests,
        matches,
        settings.matching.exclude_previous_matches,
    )
    .with_heartbeat(heartbeat);

    info!(
        "Matcher initialized (exclude previous matches: {})",
        settings.matching.exclude_previous_matches
    );

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes::configure_app)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
