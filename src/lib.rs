//! Dojo Secrets - an anonymous secrets board
//!
//! Users register, log in, post secrets and comment on each other's
//! secrets. Pages are rendered on the server and identity lives in a
//! cookie session.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, secrets, comments and their validation rules
//! - **services**: Registration, login and secret use cases
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, sessions, views and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (migrations are applied on startup)
//! cargo run -- serve --port 3579
//!
//! # Inspect or run migrations
//! cargo run -- migrate status
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Secret, User};
pub use errors::{AppError, AppResult};
