use anyhow::Result;
use clap::{Args, Subcommand};

use super::Context;
use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
    /// Show configuration and credentials file paths
    Path,
}

pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Path => show_paths(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let toml_str = toml::to_string_pretty(&ctx.config)?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths(ctx: &Context) -> Result<()> {
    match ConfigLoader::user_config_path() {
        Some(path) => println!("User config:      {}", path.display()),
        None => println!("User config:      (no home directory)"),
    }
    println!(
        "Project config:   {}",
        ConfigLoader::project_config_path().display()
    );
    println!("Credentials file: {}", ctx.store().path().display());
    Ok(())
}
