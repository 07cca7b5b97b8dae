use clap::Parser;

use regdesk_cli::bootstrap;
use regdesk_cli::parser::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    bootstrap::init_tracing(cli.verbose);

    regdesk_cli::run(cli).await
}
