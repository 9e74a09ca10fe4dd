//! HTTP server construction and startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;
use crate::di::{Container, ContainerError, Token};
use crate::logging::Logger;
use crate::routes::create_router;
use crate::state::AppState;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to resolve server dependencies: {0}")]
    Dependencies(#[from] ContainerError),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),
}

/// An HTTP server wired from a [`Container`].
///
/// Build it once with [`HttpServer::new`] and hold it; [`HttpServer::start`]
/// consumes it.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
    logger: Arc<Logger>,
    handle: Handle,
}

impl HttpServer {
    /// Resolve the logger and configuration, then mount the routes.
    ///
    /// Fails if either dependency is missing or cannot be built, which includes
    /// configuration values outside their domain.
    pub fn new(container: Arc<Container>) -> Result<Self, ServerError> {
        let logger: Arc<Logger> = container.resolve(Token::Logger)?;
        let config: Arc<AppConfig> = container.resolve(Token::Config)?;
        let router = create_router(AppState::new(container, &config.service_name));

        Ok(Self {
            router,
            config,
            logger,
            handle: Handle::new(),
        })
    }

    /// A clone of the router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle for awaiting the bound address and triggering shutdown.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// The configured address. Port 0 is resolved by the OS when binding.
    pub fn addr(&self) -> SocketAddr {
        self.config.addr()
    }

    /// Bind and serve until the handle is shut down.
    ///
    /// A confirmation line with the actual port is logged once the listener is
    /// bound; callers needing a readiness signal can await
    /// [`Handle::listening`] instead.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.addr();

        let handle = self.handle.clone();
        let logger = Arc::clone(&self.logger);
        tokio::spawn(async move {
            if let Some(bound) = handle.listening().await {
                logger.in_scope(|| {
                    tracing::info!(addr = %bound, "Server running on port {}", bound.port())
                });
            }
        });

        tracing::debug!(%addr, "Binding HTTP listener");
        axum_server::bind(addr)
            .handle(self.handle)
            .serve(self.router.into_make_service())
            .await?;

        Ok(())
    }
}
