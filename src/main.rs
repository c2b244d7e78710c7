use std::process::ExitCode;

use clap::Parser;

use bulkmark_lib::app::cli::Cli;
use bulkmark_lib::infra::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(logging::DEFAULT_LEVEL) {
        eprintln!("failed to initialize logging: {err}");
    }

    match bulkmark_lib::run(&cli).await {
        Ok(added) => {
            println!("Processing complete. Total items added: {added}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "fatal error");
            println!("Fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
