//! pkgfeed - Entry Point

use clap::Parser;
use pkgfeed::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}
