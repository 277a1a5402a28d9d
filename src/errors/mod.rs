use poem::{error::ResponseError, http::StatusCode, Response};
use thiserror::Error;

/// Error type for store operations
///
/// Not exposed at the API boundary - the service layer converts every
/// variant into a `ServiceError` before it can reach a handler.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness invariant was violated, either by the pre-insert
    /// check or by the database constraint that backstops it.
    #[error("duplicate {field}")]
    Conflict { field: &'static str },

    /// No row exists for the given id
    #[error("no row with id {id}")]
    NotFound { id: String },

    /// Storage/transport fault
    #[error("database error during {operation}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl StoreError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> StoreError {
        StoreError::Database {
            operation: operation.to_string(),
            source,
        }
    }
}

/// Service-level error taxonomy
///
/// Everything a handler can see. Messages are user-facing; variants map
/// onto HTTP statuses via `ResponseError`, though handlers turn several
/// of them (Validation, Conflict, InvalidCredential) into redirects with
/// a `message` query parameter instead of letting them propagate.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed input, caught by the validation gate before business logic
    #[error("{0}")]
    Validation(String),

    /// No token on a protected request
    #[error("No Token.")]
    Unauthorized,

    /// A token was presented but failed verification
    #[error("Forbidden Access.")]
    Forbidden,

    /// Unknown record id or username
    #[error("{0}")]
    NotFound(String),

    /// Duplicate username or email
    #[error("{0}")]
    Conflict(String),

    /// Password did not match the stored hash
    #[error("Password is incorrect")]
    InvalidCredential,

    /// Storage/transport fault
    #[error("persistence failure in {0}")]
    Persistence(String),

    /// Hashing or token signing failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { field: "username" } => {
                ServiceError::Conflict("Username is already taken.".to_string())
            }
            StoreError::Conflict { .. } => {
                ServiceError::Conflict("Email is already registered.".to_string())
            }
            StoreError::NotFound { id } => {
                ServiceError::NotFound(format!("No record with id {}", id))
            }
            StoreError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "store operation failed");
                ServiceError::Persistence(operation)
            }
        }
    }
}

impl ResponseError for ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ServiceError::Persistence(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        Response::builder()
            .status(self.status())
            .body(self.to_string())
    }
}
