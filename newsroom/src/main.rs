use anyhow::Result;
use clap::Parser;
use newsroom::app::Newsroom;
use newsroom::cli::{Cli, Commands};
use newsroom::commands;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // `.env` has to be loaded before parsing so that `GROQ_API_KEY` can fill `--api-key`.
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let newsroom = Newsroom::from_cli(&cli);

    match cli.command {
        Commands::Research(args) => commands::handle_research(args, newsroom).await?,
        Commands::Models => commands::handle_models(newsroom).await?,
    }

    Ok(())
}
