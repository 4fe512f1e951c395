//! mdcite CLI entry point.
//!
//! Parses arguments, runs the selected command, and maps failures to a
//! non-zero exit status with a colored message.

use clap::Parser;
use colored::Colorize;
use mdcite::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(err) = cli.execute().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
