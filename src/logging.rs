//! Service logger.
//!
//! A [`Logger`] owns a `tracing` dispatcher configured from the service name,
//! a filter directive and an output format. Handlers log through
//! [`Logger::in_scope`], which tags every event with the `service` field. The
//! binary additionally installs the dispatcher as the process-wide default so
//! middleware and startup events share the same output.

use tracing::dispatcher::{self, DefaultGuard, Dispatch, SetGlobalDefaultError};
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;

use crate::config::LogFormat;

#[derive(Debug, Clone)]
pub struct Logger {
    service_name: String,
    format: LogFormat,
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger writing to stdout.
    ///
    /// `filter` uses the `RUST_LOG` directive syntax, so a bare level such as
    /// `"info"` is accepted as well as `"oauth2_service=debug,tower_http=warn"`.
    pub fn new(service_name: &str, filter: &str, format: LogFormat) -> Result<Self, ParseError> {
        Self::with_writer(service_name, filter, format, std::io::stdout)
    }

    /// Build a logger writing to `writer` instead of stdout.
    ///
    /// JSON lines carry `timestamp`, `level`, `message` and the event fields at
    /// the top level, plus the innermost span's fields under `span`.
    pub fn with_writer<W>(
        service_name: &str,
        filter: &str,
        format: LogFormat,
        writer: W,
    ) -> Result<Self, ParseError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_new(filter)?;
        let registry = tracing_subscriber::registry().with(filter);

        let dispatch = match format {
            LogFormat::Json => Dispatch::new(
                registry.with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_writer(writer),
                ),
            ),
            LogFormat::Text => Dispatch::new(
                registry.with(fmt::layer().with_ansi(true).with_writer(writer)),
            ),
        };

        Ok(Self {
            service_name: service_name.to_string(),
            format,
            dispatch,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Install this logger as the global default. Fails if one is already set.
    pub fn install(&self) -> Result<(), SetGlobalDefaultError> {
        dispatcher::set_global_default(self.dispatch.clone())
    }

    /// Make this logger the default for the current thread until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }

    /// Run `f` with this logger as the current dispatcher, inside a `service` span.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        dispatcher::with_default(&self.dispatch, || {
            tracing::info_span!("service", service = %self.service_name).in_scope(f)
        })
    }
}
