//! Shared application state for request handlers.

use std::sync::Arc;

use crate::di::Container;

/// Shared application state, cloned into every handler.
///
/// Handlers resolve what they need from the container at request time rather
/// than capturing dependencies when the router is built.
#[derive(Clone, Debug)]
pub struct AppState {
    pub container: Arc<Container>,
    /// Tagged onto every request span.
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(container: Arc<Container>, service_name: &str) -> Self {
        Self {
            container,
            service_name: Arc::from(service_name),
        }
    }
}
