//! Interactive API key setup wizard.

use anyhow::Result;
use clap::Args;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};
use keygate_core::auth::{Credential, CredentialStatus, PersistenceMode};

use super::Context;
use super::console::open_console;
use super::prompts::{
    confirm_key_shape, print_error, print_header, print_persist_result, print_success,
    print_warning, prompt_for_key, select_mode,
};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Open the Anthropic console before asking for the key
    #[arg(long)]
    pub open_console: bool,
}

pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    print_header("KEYGATE LOGIN");

    let status = ctx.resolver().status()?;
    if status.is_configured() {
        println!("{}", describe_current(&status));
        println!();
        let replace = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Replace it?")
            .default(false)
            .interact()?;
        if !replace {
            println!("Keeping the current key.");
            return Ok(());
        }
        println!();
    }

    if args.open_console || choose_console()? {
        open_console();
        println!();
        println!("Create a key, copy it, then paste it below.");
        println!();
    }

    let key = prompt_for_key()?;
    if !confirm_key_shape(&key)? {
        println!("Cancelled. Nothing was saved.");
        return Ok(());
    }

    let mode = select_mode()?;
    let credential = Credential::new(key)?;
    let writer = ctx.writer();
    let result = writer.persist(&credential, mode)?;

    println!();
    print_persist_result(&result, writer.store().path());
    if mode == PersistenceMode::FileOnly && status.env_set {
        print_warning("ANTHROPIC_API_KEY is set in your environment and still takes precedence over the file.");
    }

    println!();
    let verify = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Verify the key with a test request?")
        .default(true)
        .interact()?;
    if verify {
        verify_key(ctx, &credential).await?;
    }

    Ok(())
}

fn describe_current(status: &CredentialStatus) -> String {
    let source = status
        .source
        .map(|s| s.to_string())
        .unwrap_or_default();
    format!(
        "An API key is already configured: {} ({} characters, from {})",
        status.masked.as_deref().unwrap_or("****"),
        status.length,
        source
    )
}

fn choose_console() -> Result<bool> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("How would you like to provide a key?")
        .items(&["Enter an existing API key", "Create one in the Anthropic console"])
        .default(0)
        .interact()?;
    Ok(choice == 1)
}

async fn verify_key(ctx: &Context, credential: &Credential) -> Result<()> {
    let client = ctx.client(Some(credential.value().expose_secret()))?;
    match client.ping().await {
        Ok(()) => print_success("API key accepted"),
        Err(e) => {
            print_error(&e.to_string());
            if e.is_auth() {
                println!("The key was saved but rejected. Run `keygate login` again with a new key.");
            }
        }
    }
    Ok(())
}
