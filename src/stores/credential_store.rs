use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use chrono::Utc;
use uuid::Uuid;
use crate::errors::StoreError;
use crate::types::db::identity::{self, ActiveModel, Entity as Identity};

/// CredentialStore manages authentication identities in the database
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up an identity by username
    ///
    /// # Errors
    /// Returns `StoreError::Database` on storage faults; an absent row is
    /// `Ok(None)`, not an error.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<identity::Model>, StoreError> {
        Identity::find()
            .filter(identity::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_by_username", e))
    }

    /// Look up an identity by email
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<identity::Model>, StoreError> {
        Identity::find()
            .filter(identity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_by_email", e))
    }

    /// Create a new identity
    ///
    /// Uniqueness of username and email is checked up front for the
    /// friendly error, but the database unique constraints are what make
    /// the check-then-insert safe against concurrent duplicate signups:
    /// a row that slips past the pre-check fails the insert and is mapped
    /// to `StoreError::Conflict` here.
    ///
    /// # Arguments
    /// * `username` - Unique username for the new identity
    /// * `email` - Unique email for the new identity
    /// * `password_hash` - Already-hashed password, stored opaquely
    ///
    /// # Returns
    /// * `Ok(Model)` - The created identity row
    /// * `Err(StoreError)` - Conflict on duplicate username/email, or Database
    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<identity::Model, StoreError> {
        if self.find_by_username(&username).await?.is_some() {
            return Err(StoreError::Conflict { field: "username" });
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(StoreError::Conflict { field: "email" });
        }

        let now = Utc::now().timestamp();
        let new_identity = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_identity.insert(&self.db).await.map_err(|e| {
            let message = e.to_string();
            if message.contains("UNIQUE") {
                if message.contains("username") {
                    StoreError::Conflict { field: "username" }
                } else {
                    StoreError::Conflict { field: "email" }
                }
            } else {
                StoreError::database("create_identity", e)
            }
        })
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}
