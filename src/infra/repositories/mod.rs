//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod secret_repository;
mod user_repository;

pub use secret_repository::{SecretRepository, SecretStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests
#[cfg(any(test, feature = "test-utils"))]
pub use secret_repository::MockSecretRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
