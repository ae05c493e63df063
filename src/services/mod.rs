//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, with repository access through the Unit of Work.

mod auth_service;
pub mod container;
mod secret_service;
mod user_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, UNKNOWN_EMAIL, WRONG_PASSWORD};
pub use secret_service::{SecretManager, SecretService};
pub use user_service::{UserManager, UserService};
