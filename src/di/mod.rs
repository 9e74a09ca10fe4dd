//! Dependency injection.
//!
//! [`Container`] is a registry addressed by [`Token`]. The process builds one
//! container at startup, registers the base singletons with
//! [`register_defaults`], and hands it to the HTTP layer behind an `Arc`.

mod container;
mod token;

pub use container::{BuildError, Container, ContainerError};
pub use token::Token;

use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::logging::Logger;

/// Register the configuration and logger singletons, reading configuration
/// from the process environment.
pub fn register_defaults(container: &mut Container) {
    register_with(container, AppConfig::from_env);
}

/// Register the configuration and logger singletons with a custom
/// configuration source. Nothing is built until the tokens are resolved.
pub fn register_with<F>(container: &mut Container, load_config: F)
where
    F: Fn() -> Result<AppConfig, ConfigError> + Send + Sync + 'static,
{
    container.register_singleton(Token::Config, move |_| Ok(load_config()?));
    container.register_singleton(Token::Logger, |c| {
        let config: Arc<AppConfig> = c.resolve(Token::Config)?;
        Ok(Logger::new(
            &config.service_name,
            &config.log_filter(),
            config.log_format,
        )?)
    });
}
