//! npm2rez CLI entry point
//!
//! Parses arguments, sets up logging and runs the command. Failures are rendered with
//! [`user_friendly_error`]; the process still exits successfully so wrapper scripts that
//! convert many packages keep going.

use anyhow::Result;
use clap::Parser;
use npm2rez::cli::Cli;
use npm2rez::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    config.init_logging();

    if let Err(e) = cli.execute_with_config(config).await {
        user_friendly_error(e).display();
    }

    Ok(())
}
