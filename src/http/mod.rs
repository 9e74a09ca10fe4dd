//! HTTP server.
//!
//! [`HttpServer`] is built from the dependency container, owns the router and
//! serves it on the configured address. Graceful shutdown on SIGTERM/SIGINT is
//! wired through the server's [`Handle`](axum_server::Handle).

mod server;
mod shutdown;

pub use server::{HttpServer, ServerError};
pub use shutdown::setup_shutdown_handler;
