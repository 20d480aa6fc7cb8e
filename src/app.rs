//! Top-level flow: resolve settings, run the query, write the formatted result.

use std::io::Write;

use crate::cli::Cli;
use crate::config::{Config, ConnectionConfig, QuerySettings, Settings};
use crate::error::{AthenaqError, Result};
use crate::output::{OutputFormat, ResultFormatter};
use crate::query::{QueryOutcome, QueryRunner, RunOptions};
use crate::service::{AthenaService, QueryService};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs `query` against `service` and writes the formatted result to `out`.
///
/// Nothing is written unless every stage succeeds.
pub async fn execute(
    service: &dyn QueryService,
    query: &str,
    options: &RunOptions,
    format: OutputFormat,
    out: &mut impl Write,
    cancel: &CancellationToken,
) -> Result<QueryOutcome> {
    let outcome = QueryRunner::new(service, options).run(query, cancel).await?;
    ResultFormatter::new(format).write_to(&outcome.result, out)?;
    Ok(outcome)
}

/// Builds the single-threaded runtime the binary runs on.
pub fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AthenaqError::internal(format!("Failed to start async runtime: {e}")))
}

/// Resolves settings from the CLI and config file, then runs against Athena,
/// printing to stdout.
pub async fn run(cli: &Cli, cancel: &CancellationToken) -> Result<()> {
    let query = cli.query()?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let (connection, query_settings) = resolve_connection(cli, &config)?;
    info!("Connection: {}", connection.display_string());
    let settings = Settings::resolve(connection, query_settings)?;
    settings.run.submit.require_output_location()?;

    let service =
        AthenaService::connect(&settings.region, settings.aws_profile.as_deref()).await;
    // Unlocked handle: stdout is only locked by the final write.
    execute(
        &service,
        query,
        &settings.run,
        cli.output_format(),
        &mut std::io::stdout(),
        cancel,
    )
    .await?;
    Ok(())
}

/// Merges the connection and query settings with precedence:
/// 1. CLI arguments and their environment variables (highest)
/// 2. Named connection from config
/// 3. Default connection from config
pub fn resolve_connection(
    cli: &Cli,
    config: &Config,
) -> Result<(ConnectionConfig, QuerySettings)> {
    let mut connection = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            AthenaqError::config(format!("Connection '{name}' not found in config file"))
        })?,
        None => config.get_connection(None).cloned().unwrap_or_default(),
    };
    connection.merge(&cli.to_connection_config());

    let mut query_settings = config.query;
    query_settings.merge(&cli.to_query_settings());

    Ok((connection, query_settings))
}
