//! Binary crate for the `aiweb` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Calling the backend through the shared API client
//! - Managing the dev-server configuration file

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
