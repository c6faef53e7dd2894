mod cli;
mod run;

use catalog_worker::config::Config;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = load_config(args.config)?;
            catalog_worker::observability::init_tracing(&config.logging.filter);
            run::run(config, args.input).await?;
        }
        Commands::Config(args) => {
            let config = load_config(args.config)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config, AnyError> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}
