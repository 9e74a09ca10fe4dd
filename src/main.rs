//! Service entry point.
//!
//! Loads the optional env file, builds the dependency container, installs the
//! logger, constructs the HTTP server from the container and serves until a
//! shutdown signal arrives.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::Instrument;

use oauth2_service::config::{load_env_file, AppConfig, EnvFile, DEFAULT_ENV_FILE};
use oauth2_service::di::{self, Container, Token};
use oauth2_service::http::{setup_shutdown_handler, HttpServer};
use oauth2_service::logging::Logger;
use oauth2_service::AppError;

/// HTTP service skeleton with a health endpoint
#[derive(Parser, Debug)]
#[command(name = "oauth2-service", version, about)]
struct Args {
    /// Env file loaded before configuration is read; variables already set win
    #[arg(short, long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                tracing::error!(error = %e, "Unable to start HTTP server");
            } else {
                eprintln!("[fatal] Unable to start HTTP server: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let env_file = load_env_file(&args.env_file)?;

    let mut container = Container::new();
    di::register_defaults(&mut container);
    let container = Arc::new(container);

    // The logger is resolved and installed before the server is built so that
    // startup and request logs go through it. Resolving it builds the
    // configuration first.
    let logger: Arc<Logger> = container.resolve(Token::Logger)?;
    if let Err(e) = logger.install() {
        eprintln!("[warn] Logger already installed: {e}");
    }
    let config: Arc<AppConfig> = container.resolve(Token::Config)?;

    let span = tracing::info_span!("service", service = %config.service_name);
    serve(container, config, env_file).instrument(span).await
}

async fn serve(
    container: Arc<Container>,
    config: Arc<AppConfig>,
    env_file: EnvFile,
) -> Result<(), AppError> {
    if let EnvFile::Missing(path) = &env_file {
        if !config.environment.is_production() {
            tracing::warn!(
                path = %path.display(),
                "Env file not found, using process environment only"
            );
        }
    }

    tracing::info!(
        env = %config.environment,
        addr = %config.addr(),
        log_level = %config.log_level,
        "Loaded configuration"
    );

    let server = HttpServer::new(container)?;
    setup_shutdown_handler(server.handle());
    server.start().await?;

    tracing::info!("Server stopped");
    Ok(())
}
