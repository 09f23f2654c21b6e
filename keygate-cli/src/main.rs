use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::Context;
use config::ConfigLoader;

#[derive(Parser)]
#[command(name = "keygate", about = "Set up and check your Anthropic API key")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Credentials file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively set up an API key
    Login(commands::login::LoginArgs),
    /// Save an API key without prompts
    SetKey(commands::set_key::SetKeyArgs),
    /// Show which API key is in effect
    Status,
    /// Check that an API key is configured and accepted
    Verify(commands::verify::VerifyArgs),
    /// Send a single message and print the reply
    Ask(commands::ask::AskArgs),
    /// Start an interactive conversation
    Chat(commands::chat::ChatArgs),
    /// Open the Anthropic console in a browser
    Console,
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::new(ConfigLoader::load()?, cli.env_file);

    match cli.command {
        Commands::Login(args) => commands::login::run(args, &ctx).await,
        Commands::SetKey(args) => commands::set_key::run(args, &ctx),
        Commands::Status => commands::status::run(&ctx),
        Commands::Verify(args) => commands::verify::run(args, &ctx).await,
        Commands::Ask(args) => commands::ask::run(args, &ctx).await,
        Commands::Chat(args) => commands::chat::run(args, &ctx).await,
        Commands::Console => commands::console::run(),
        Commands::Config(args) => commands::config::run(args, &ctx),
    }
}
