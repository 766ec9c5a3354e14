use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use dreamtales_story::generation::{GenerationConfig, TextGenerator, VendorRegistry};
use dreamtales_story::safety::SafetyScanner;
use dreamtales_story::{
    db, MemoryStoryStore, PgStoryStore, StoreConfig, StoryConfig, StoryService, StoryStore,
};
use dreamtales_web::{router, AppConfig, AppState};

const MAX_RETRIES: u32 = 10;
const RETRY_INTERVAL: Duration = Duration::from_secs(3);

async fn connect_store(store_config: &StoreConfig) -> Arc<dyn StoryStore> {
    let Some(database_url) = store_config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, keeping stories in memory");
        return Arc::new(MemoryStoryStore::new());
    };

    tracing::info!("connecting to database...");

    let mut pool = None;
    for attempt in 1..=MAX_RETRIES {
        match db::create_pool(database_url, store_config.max_connections).await {
            Ok(p) => {
                pool = Some(p);
                break;
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "failed to connect, retrying...");
                if attempt == MAX_RETRIES {
                    tracing::error!("exhausted all {MAX_RETRIES} connection attempts");
                    std::process::exit(1);
                }
                tokio::time::sleep(RETRY_INTERVAL).await;
            }
        }
    }
    let pool = pool.unwrap_or_else(|| {
        tracing::error!("unreachable: no pool after retry loop");
        std::process::exit(1);
    });

    tracing::info!("running database migrations...");
    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }
    tracing::info!("migrations completed");

    Arc::new(PgStoryStore::new(pool))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_config = AppConfig::from_env();
    let story_config = StoryConfig::from_env();
    let store_config = StoreConfig::from_env();

    let generation_config = match GenerationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load generation configuration");
            std::process::exit(1);
        }
    };

    let generator =
        match TextGenerator::from_config(&generation_config, &VendorRegistry::with_defaults()) {
            Ok(generator) => generator,
            Err(e) => {
                tracing::error!(error = %e, provider = %generation_config.provider, "invalid AI provider");
                std::process::exit(1);
            }
        };

    let scanner = match SafetyScanner::from_optional_path(story_config.blocklist_path.as_deref()) {
        Ok(scanner) => Arc::new(scanner),
        Err(e) => {
            tracing::error!(error = %e, "failed to load safety blocklist");
            std::process::exit(1);
        }
    };

    let store = connect_store(&store_config).await;

    let service = StoryService::new(generator, scanner, store, story_config);
    let addr = app_config.bind_addr;
    let app_state = AppState {
        service: Arc::new(service),
        config: Arc::new(app_config),
    };

    let app = router(app_state);

    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to bind on {addr}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
