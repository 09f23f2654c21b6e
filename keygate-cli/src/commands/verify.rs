//! Check that an API key is configured and, optionally, accepted.

use anyhow::{Result, bail};
use clap::Args;
use keygate_core::Error;

use super::Context;
use super::prompts::{key_shape_warning, print_error, print_success, print_warning};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Make one minimal API request to confirm the key is accepted
    #[arg(long)]
    pub live: bool,

    /// Verify this key instead of the configured one
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

pub async fn run(args: VerifyArgs, ctx: &Context) -> Result<()> {
    let client = match ctx.client(args.api_key.as_deref()) {
        Ok(client) => client,
        Err(Error::MissingCredential) => {
            print_error("No API key configured");
            println!("Run `keygate login` or set ANTHROPIC_API_KEY.");
            bail!("no API key configured");
        }
        Err(e) => return Err(e.into()),
    };

    let credential = client.credential();
    print_success(&format!(
        "Found API key {} ({})",
        credential.value().masked(),
        credential.source()
    ));
    if !credential.looks_valid() {
        print_warning(&key_shape_warning());
    }

    if !args.live {
        return Ok(());
    }

    println!("Checking the key against {} ...", client.options().base_url);
    match client.ping().await {
        Ok(()) => {
            print_success("API key accepted");
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            if e.is_auth() {
                println!("The key was rejected. Create a new one with `keygate console`.");
            }
            bail!("API key verification failed");
        }
    }
}
