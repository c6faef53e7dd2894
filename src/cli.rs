use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-worker")]
#[command(about = "Off-thread processing engine for STAC catalog data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream JSON-lines task messages through the engine
    Run(RunArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// File with one task message per line (stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Configuration file (overrides CATALOG_WORKER_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (overrides CATALOG_WORKER_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
