//! Swarmtest CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swarmtest::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => swarmtest::cli::commands::generate::execute(args, cli.json).await,
        Commands::Dispatch(args) => swarmtest::cli::commands::dispatch::execute(args, cli.json).await,
        Commands::Serve(args) => swarmtest::cli::commands::serve::execute(args, cli.json).await,
        Commands::Status(args) => swarmtest::cli::commands::status::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        swarmtest::cli::handle_error(err, cli.json);
    }
}
