use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use chrono::Utc;
use uuid::Uuid;
use crate::errors::StoreError;
use crate::types::db::directory_record::{self, ActiveModel, Entity as DirectoryRecord};

/// RecordStore manages directory records and their soft-delete state
///
/// Both mutations are expressed as single UPDATE statements so that
/// concurrent writers to the same id never interleave a read-then-write
/// span; the database serializes the statements and the last writer wins.
pub struct RecordStore {
    db: DatabaseConnection,
}

impl RecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List records that have not been soft deleted, oldest first
    pub async fn list_active(&self) -> Result<Vec<directory_record::Model>, StoreError> {
        DirectoryRecord::find()
            .filter(directory_record::Column::IsDeleted.eq(false))
            .order_by_asc(directory_record::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database("list_active", e))
    }

    /// Look up a record by id regardless of deletion state
    ///
    /// Soft-deleted rows stay reachable here so the detail view keeps
    /// working after deletion.
    pub async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<directory_record::Model>, StoreError> {
        DirectoryRecord::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_by_id", e))
    }

    /// Create a new directory record
    ///
    /// Email must be unique among active records; a partial unique index
    /// backstops the pre-check, so concurrent duplicate creates cannot
    /// both succeed. A soft-deleted record's email is free for reuse.
    pub async fn create(
        &self,
        name: String,
        email: String,
    ) -> Result<directory_record::Model, StoreError> {
        let existing = DirectoryRecord::find()
            .filter(directory_record::Column::Email.eq(&email))
            .filter(directory_record::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("create_record", e))?;
        if existing.is_some() {
            return Err(StoreError::Conflict { field: "email" });
        }

        let now = Utc::now().timestamp();
        let new_record = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            email: Set(email),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_record.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::Conflict { field: "email" }
            } else {
                StoreError::database("create_record", e)
            }
        })
    }

    /// Soft delete a record
    ///
    /// Idempotent: deleting an already-deleted or nonexistent id is a
    /// no-op success. Not found is treated as success, so the operation
    /// is safely retryable; callers that need stricter semantics should
    /// check `find_by_id` first.
    pub async fn soft_delete(&self, id: &str) -> Result<(), StoreError> {
        DirectoryRecord::update_many()
            .col_expr(directory_record::Column::IsDeleted, Expr::value(true))
            .col_expr(
                directory_record::Column::UpdatedAt,
                Expr::value(Utc::now().timestamp()),
            )
            .filter(directory_record::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::database("soft_delete", e))?;

        Ok(())
    }

    /// Replace a record's email and bump its updated_at
    ///
    /// # Returns
    /// * `Ok(Model)` - The updated record
    /// * `Err(StoreError::NotFound)` - No record with that id exists
    /// * `Err(StoreError::Conflict)` - The new email collides with another active record
    pub async fn update_email(
        &self,
        id: &str,
        new_email: String,
    ) -> Result<directory_record::Model, StoreError> {
        let result = DirectoryRecord::update_many()
            .col_expr(directory_record::Column::Email, Expr::value(new_email))
            .col_expr(
                directory_record::Column::UpdatedAt,
                Expr::value(Utc::now().timestamp()),
            )
            .filter(directory_record::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE") {
                    StoreError::Conflict { field: "email" }
                } else {
                    StoreError::database("update_email", e)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db", &"<connection>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{Database, DatabaseConnection};
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> (DatabaseConnection, RecordStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let record_store = RecordStore::new(db.clone());

        (db, record_store)
    }

    #[tokio::test]
    async fn test_create_and_list_active() {
        let (_db, store) = setup_test_db().await;

        let bob = store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");

        assert!(!bob.id.is_empty());
        assert!(!bob.is_deleted);

        let active = store.list_active().await.expect("list should succeed");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Bob");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_active_email() {
        let (_db, store) = setup_test_db().await;

        store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("first create should succeed");

        let result = store.create("Bobby".to_string(), "b@x.com".to_string()).await;

        match result {
            Err(StoreError::Conflict { field }) => assert_eq!(field, "email"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_soft_delete_hides_record_from_listing_only() {
        let (_db, store) = setup_test_db().await;

        let bob = store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");

        store.soft_delete(&bob.id).await.expect("delete should succeed");

        let active = store.list_active().await.expect("list should succeed");
        assert!(active.is_empty());

        // Detail lookup still reaches the record, flagged as deleted
        let found = store
            .find_by_id(&bob.id)
            .await
            .expect("lookup should succeed")
            .expect("record should still exist");
        assert!(found.is_deleted);
        assert_eq!(found.name, "Bob");
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() {
        let (_db, store) = setup_test_db().await;

        let bob = store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");

        store.soft_delete(&bob.id).await.expect("first delete should succeed");
        store.soft_delete(&bob.id).await.expect("second delete should succeed");

        // Unknown ids are a no-op success as well
        store
            .soft_delete("no-such-id")
            .await
            .expect("deleting an unknown id should succeed");
    }

    #[tokio::test]
    async fn test_soft_deleted_email_is_reusable() {
        let (_db, store) = setup_test_db().await;

        let bob = store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");
        store.soft_delete(&bob.id).await.expect("delete should succeed");

        let replacement = store
            .create("New Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("email freed by soft delete should be reusable");

        assert_ne!(replacement.id, bob.id);
        let active = store.list_active().await.expect("list should succeed");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "New Bob");
    }

    #[tokio::test]
    async fn test_update_email_replaces_and_bumps_updated_at() {
        let (_db, store) = setup_test_db().await;

        let bob = store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");

        let updated = store
            .update_email(&bob.id, "bob@y.com".to_string())
            .await
            .expect("update should succeed");

        assert_eq!(updated.id, bob.id);
        assert_eq!(updated.email, "bob@y.com");
        assert!(updated.updated_at >= bob.updated_at);
        // id and name are untouched
        assert_eq!(updated.name, "Bob");
    }

    #[tokio::test]
    async fn test_update_email_on_unknown_id_returns_not_found() {
        let (_db, store) = setup_test_db().await;

        let result = store
            .update_email("no-such-id", "x@y.com".to_string())
            .await;

        match result {
            Err(StoreError::NotFound { id }) => assert_eq!(id, "no-such-id"),
            other => panic!("Expected NotFound, got {:?}", other),
        }

        // No row materialized from the failed update
        let active = store.list_active().await.expect("list should succeed");
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_update_email_rejects_collision_with_active_record() {
        let (_db, store) = setup_test_db().await;

        store
            .create("Bob".to_string(), "b@x.com".to_string())
            .await
            .expect("create should succeed");
        let carol = store
            .create("Carol".to_string(), "c@x.com".to_string())
            .await
            .expect("create should succeed");

        let result = store.update_email(&carol.id, "b@x.com".to_string()).await;

        match result {
            Err(StoreError::Conflict { field }) => assert_eq!(field, "email"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }
}
