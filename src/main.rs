use clap::Parser;

use ob_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ob_cli::run(Cli::parse()).await
}
