use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{
    config::{Settings, StoreBackend},
    middleware::TokenVerifier,
    password::PasswordHasher,
    repositories::{MemoryStore, PgNoteRepository, PgUserRepository},
    routes,
    state::AppState,
    store::{NoteStore, UserStore},
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting technotes API service");

    let (users, notes): (Arc<dyn UserStore>, Arc<dyn NoteStore>) = match settings.store.backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool).await?;

            (
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgNoteRepository::new(pool)),
            )
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data will not survive a restart");
            let store = MemoryStore::new();
            (Arc::new(store.clone()), Arc::new(store))
        }
    };

    let hasher = PasswordHasher::new(&settings.hashing)?;
    let token_verifier = TokenVerifier::new(&settings.auth.access_token_secret);
    let app_state = AppState::new(users, notes, hasher, token_verifier);

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
