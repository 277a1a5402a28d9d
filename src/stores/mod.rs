// Stores layer - Data access and repository pattern
pub mod credential_store;
pub mod record_store;

pub use credential_store::CredentialStore;
pub use record_store::RecordStore;
