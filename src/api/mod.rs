//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers and route definitions
//! - Login-required middleware
//! - Session identity and flash messages
//! - askama views

pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

pub use routes::{create_router, session_layer};
pub use state::AppState;
