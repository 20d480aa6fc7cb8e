//! athenaq - run a SQL query on AWS Athena and print the results.

use athenaq::cli::Cli;
use athenaq::error::Result;
use athenaq::{app, logging};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

fn main() {
    // Values from .env are visible to clap's env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    app::build_runtime()?.block_on(async {
        let cancel = CancellationToken::new();
        watch_ctrl_c(cancel.clone());
        app::run(&cli, &cancel).await
    })
}

/// First Ctrl-C cancels the wait; a second one exits immediately.
fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            debug!("Ctrl-C handler unavailable");
            return;
        }
        warn!("Interrupted, cancelling query (press Ctrl-C again to exit now)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
