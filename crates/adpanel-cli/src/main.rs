use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "adpanel")]
#[command(about = "ADPANEL - Test ad creatives against a synthetic persona panel", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a test brief and emit the result bundle as JSON
    Run(commands::run::RunArgs),
    /// Print the demo brief as TOML
    Demo,
    /// Manage cached persona panels
    Cache {
        /// Panel cache file (defaults to ~/.config/adpanel/panels.json)
        #[arg(long, global = true)]
        cache: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached brands
    List,
    /// Remove the panel cached under a brand key
    Invalidate { key: String },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "adpanel=debug" } else { "adpanel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the result bundle
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Demo => commands::demo::print()?,
        Commands::Cache { cache, action } => match action {
            CacheAction::List => commands::cache::list(cache)?,
            CacheAction::Invalidate { key } => commands::cache::invalidate(cache, &key)?,
        },
    }

    Ok(())
}
