//! stackctl — compose stack control for self-hosted service groups.

use std::process::ExitCode;

use clap::CommandFactory;
use clap::error::ErrorKind;

use stackctl::cli::{Cli, Invocation};

#[tokio::main]
async fn main() -> ExitCode {
    let matches = match Cli::command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // Exit contract is 1 for any input error; clap's default 2 is
            // not used.
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let invocation = match Invocation::from_matches(&matches) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("For more information, try '--help'.");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = invocation.run().await {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
