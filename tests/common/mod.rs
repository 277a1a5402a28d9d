use std::sync::Arc;
use std::time::Duration;
use poem::Endpoint;
use sea_orm::{Database, DatabaseConnection};
use migration::{Migrator, MigratorTrait};
use directory_backend::routes::build_app;
use directory_backend::services::{DirectoryService, PasswordHasher, TokenService};
use directory_backend::stores::{CredentialStore, RecordStore};

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Handles onto the wired application's shared state, so tests can
/// inspect the database behind the HTTP surface.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub service: Arc<DirectoryService>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialStore>,
    pub records: Arc<RecordStore>,
}

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encode field/value pairs as a form body
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Build the full route surface against a fresh in-memory database
pub async fn setup() -> (impl Endpoint, TestApp) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let credentials = Arc::new(CredentialStore::new(db.clone()));
    let records = Arc::new(RecordStore::new(db.clone()));
    let tokens = Arc::new(TokenService::new(
        TEST_SECRET.to_string(),
        Duration::from_secs(900),
    ));
    let service = Arc::new(DirectoryService::new(
        credentials.clone(),
        records.clone(),
        PasswordHasher::new(2).expect("valid cost"),
        tokens.clone(),
    ));

    let app = build_app(service.clone(), tokens.clone());

    (
        app,
        TestApp {
            db,
            service,
            tokens,
            credentials,
            records,
        },
    )
}
