//! companion CLI: chat with a character, inspect history and the composed context, manage settings.
//! Config from env (`.env` is loaded first).

use std::io;

use anyhow::Result;
use clap::Parser;
use companion_cli::{commands, App, Cli, Commands};
use companion_core::{init_console_tracing, init_tracing, AppConfig};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match &cli.command {
        Commands::Chat { .. } => init_tracing(&config.log_file)?,
        _ => init_console_tracing()?,
    }

    let app = App::open(&config).await?;

    match cli.command {
        Commands::Chat { character } => {
            let input = BufReader::new(tokio::io::stdin());
            commands::chat(&app, &character, input, io::stdout()).await
        }
        Commands::History { character } => commands::history(&app, &character, io::stdout()).await,
        Commands::Context { character, text } => {
            commands::context(&app, &character, &text, io::stdout()).await
        }
        Commands::Characters => commands::characters(&app, io::stdout()).await,
        Commands::SetKey { key } => commands::set_key(&app, &key, io::stdout()).await,
        Commands::SetModel { model } => commands::set_model(&app, &model, io::stdout()).await,
        Commands::Clear { character } => commands::clear(&app, &character, io::stdout()).await,
    }
}
