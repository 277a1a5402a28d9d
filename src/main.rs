use std::sync::Arc;
use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Server};
use directory_backend::config::{logging, AppConfig, SystemEnvironment};
use directory_backend::routes::build_app;
use directory_backend::services::{DirectoryService, PasswordHasher, TokenService};
use directory_backend::stores::{CredentialStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    logging::init_logging().expect("Failed to initialize logging");

    // Missing SECRET_KEY or an invalid SALT_ROUNDS is fatal here, never
    // a per-request failure
    let config = AppConfig::load(&SystemEnvironment).expect("Invalid configuration");

    let db: DatabaseConnection = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %config.database_url, "Connected to database");

    Migrator::up(&db, None).await.expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let hasher = PasswordHasher::new(config.salt_rounds).expect("Invalid hashing cost factor");
    let tokens = Arc::new(TokenService::new(config.secret_key.clone(), config.token_ttl));
    let credentials = Arc::new(CredentialStore::new(db.clone()));
    let records = Arc::new(RecordStore::new(db.clone()));
    let service = Arc::new(DirectoryService::new(
        credentials,
        records,
        hasher,
        tokens.clone(),
    ));

    let app = build_app(service, tokens);

    tracing::info!("Starting server on http://0.0.0.0:3000");
    Server::new(TcpListener::bind("0.0.0.0:3000")).run(app).await
}
