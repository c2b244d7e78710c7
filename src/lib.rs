pub mod api;
pub mod app;
pub mod dedupe;
pub mod domain;
pub mod infra;
pub mod ingest;
pub mod queue;

#[cfg(test)]
mod testing;

use std::path::Path;

use api::service::ServiceClient;
use api::transport::{HttpTransport, ReqwestTransport, TransportError};
use app::cli::Cli;
use infra::config::{Config, ConfigError};
use ingest::{ExtractError, ExtractionPolicy};
use queue::worker::{process_items, RunContext};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// Loads configuration, extracts the input and bookmarks every item.
/// Returns the number of items added.
pub async fn run(cli: &Cli) -> Result<usize, AppError> {
    let config = Config::from_env(cli.env_file.as_deref())?;
    tracing::info!(base_url = %config.base_url, input = %cli.input.display(), mode = ?cli.mode, "starting run");

    let policy = cli.mode.policy();
    run_with(ReqwestTransport::new()?, &config, policy.as_ref(), &cli.input).await
}

/// Same as [`run`] over an arbitrary transport. Extraction errors abort
/// before the transport sees a single request.
pub async fn run_with<T: HttpTransport>(
    transport: T,
    config: &Config,
    policy: &dyn ExtractionPolicy,
    input: &Path,
) -> Result<usize, AppError> {
    let items = ingest::extract(input, policy)?;

    let mut ctx = RunContext::new(ServiceClient::new(transport, config));
    process_items(&mut ctx, &items).await;

    Ok(ctx.processed.len())
}
