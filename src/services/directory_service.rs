use std::sync::Arc;
use crate::errors::ServiceError;
use crate::services::{PasswordHasher, TokenService};
use crate::stores::{CredentialStore, RecordStore};
use crate::types::db::directory_record;

/// Orchestrates credential checks, token issuance and record lifecycle
///
/// Translates store errors into the service taxonomy; raw database
/// errors never leak past this layer. Password hashing runs on the
/// blocking pool so concurrent unrelated requests are not starved while
/// a hash grinds.
pub struct DirectoryService {
    credentials: Arc<CredentialStore>,
    records: Arc<RecordStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl DirectoryService {
    pub fn new(
        credentials: Arc<CredentialStore>,
        records: Arc<RecordStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            credentials,
            records,
            hasher,
            tokens,
        }
    }

    /// Register a new identity and issue its first token
    ///
    /// # Returns
    /// * `Ok(String)` - A signed token for the new identity
    /// * `Err(ServiceError::Conflict)` - Username taken or email registered
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        if self.credentials.find_by_username(username).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Username is already taken.".to_string(),
            ));
        }
        if self.credentials.find_by_email(email).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Email is already registered.".to_string(),
            ));
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| ServiceError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::Internal(format!("password hashing error: {}", e)))?;

        let identity = self
            .credentials
            .create(username.to_string(), email.to_string(), password_hash)
            .await?;

        tracing::info!(username = %identity.username, "identity registered");
        self.issue_token(&identity.username)
    }

    /// Authenticate an existing identity and issue a token
    ///
    /// # Returns
    /// * `Ok(String)` - A signed token for the identity
    /// * `Err(ServiceError::NotFound)` - Unknown username
    /// * `Err(ServiceError::InvalidCredential)` - Password mismatch
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let identity = self
            .credentials
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User does not exist.".to_string()))?;

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let subject = identity.username;
        let digest = identity.password_hash;
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|e| ServiceError::Internal(format!("verification task failed: {}", e)))?;

        if !matched {
            return Err(ServiceError::InvalidCredential);
        }

        self.issue_token(&subject)
    }

    /// List records that have not been soft deleted
    pub async fn list_records(&self) -> Result<Vec<directory_record::Model>, ServiceError> {
        Ok(self.records.list_active().await?)
    }

    /// Fetch a record by id regardless of deletion state
    pub async fn record_detail(&self, id: &str) -> Result<directory_record::Model, ServiceError> {
        self.records
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No record with id {}", id)))
    }

    /// Create a new directory record
    pub async fn create_record(
        &self,
        name: &str,
        email: &str,
    ) -> Result<directory_record::Model, ServiceError> {
        Ok(self
            .records
            .create(name.to_string(), email.to_string())
            .await?)
    }

    /// Soft delete a record; unknown ids succeed silently
    pub async fn delete_record(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.records.soft_delete(id).await?)
    }

    /// Replace a record's email
    pub async fn edit_record_email(
        &self,
        id: &str,
        email: &str,
    ) -> Result<directory_record::Model, ServiceError> {
        Ok(self.records.update_email(id, email.to_string()).await?)
    }

    fn issue_token(&self, subject: &str) -> Result<String, ServiceError> {
        self.tokens
            .issue(subject)
            .map_err(|e| ServiceError::Internal(format!("token signing failed: {}", e)))
    }
}
