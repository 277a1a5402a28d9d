// Services layer - Business logic and orchestration
pub mod directory_service;
pub mod password_hasher;
pub mod token_service;
pub mod validation;

pub use directory_service::DirectoryService;
pub use password_hasher::PasswordHasher;
pub use token_service::TokenService;
