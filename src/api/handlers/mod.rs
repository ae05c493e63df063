//! HTTP request handlers.

pub mod auth_handler;
pub mod secret_handler;

pub use auth_handler::auth_routes;
pub use secret_handler::secret_routes;
