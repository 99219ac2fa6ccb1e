//! Cashdesk command-line entry point.

use std::process::ExitCode;

use cashdesk_app::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cashdesk_app::init_tracing(cli.verbose);

    match cashdesk_app::run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let rendered = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", rendered);
            ExitCode::FAILURE
        }
    }
}
