use std::sync::Arc;
use std::time::Instant;

use actix_web::{
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use env_logger::Env;
use log::{debug, info, warn};

use crate::{
    config::{Config, Environment, StoreBackend},
    db::RedisConnection,
    errors::AppError,
    middleware::RequestLogger,
    repositories::{KeyValueStore, MemoryStore, RedisStore},
    routes, services,
    types::AppState,
};

pub type AppResult<T> = Result<T, AppError>;

/// Requests slower than this are logged at warn level
const SLOW_REQUEST_MS: u128 = 500;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> AppResult<()> {
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

/// Open the configured keyspace once; every worker shares the handle
async fn open_store(config: &Config) -> AppResult<Arc<dyn KeyValueStore>> {
    match config.shortlink.backend {
        StoreBackend::Redis => {
            let connection = RedisConnection::connect(&config.redis)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            Ok(Arc::new(RedisStore::new(&connection)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; shortlinks will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub async fn server() -> AppResult<()> {
    let config = Config::load()?;

    setup_logging(&config)?;

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    let store = open_store(&config).await?;
    let shortlinks = services::build(store.clone(), config.shortlink.operation_timeout());
    info!(
        "Shortlink store ready on {} backend",
        config.shortlink.backend.as_str()
    );

    let enable_debug_logging = config.app.environment != Environment::Production;
    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}i"
    };

    let app_config = config.clone();

    HttpServer::new(move || {
        let shortlinks = shortlinks.clone();

        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                version: app_config.app.version.clone(),
                store: store.clone(),
                backend: app_config.shortlink.backend.as_str(),
                probe_timeout: app_config.shortlink.operation_timeout(),
            }))
            .app_data(web::Data::new(app_config.clone()))
            .configure(|cfg| services::register(shortlinks, cfg))
            .wrap(RequestLogger::new(enable_debug_logging, SLOW_REQUEST_MS))
            .wrap(Logger::new(log_format))
            .wrap(DefaultHeaders::new().add(("X-Request-ID", uuid::Uuid::new_v4().to_string())))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
