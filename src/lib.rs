//! HTTP service skeleton.
//!
//! Wires configuration and logging through a token-keyed dependency container
//! and serves a `/health` endpoint reporting process status.

pub mod config;
pub mod di;
pub mod error;
pub mod health;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
