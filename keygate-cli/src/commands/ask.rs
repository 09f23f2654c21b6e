//! One-shot question to the model.

use anyhow::{Result, bail};
use clap::Args;
use keygate_core::ERROR_PREFIX;

use super::{ClientArgs, Context};

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Message to send
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    #[command(flatten)]
    pub client: ClientArgs,
}

pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(args.client.api_key.as_deref())?;
    let text = args.text.join(" ");

    let reply = client
        .send_message(&text, args.client.model.as_deref(), args.client.max_tokens)
        .await;

    if reply.starts_with(ERROR_PREFIX) {
        eprintln!("{reply}");
        bail!("request failed");
    }
    println!("{reply}");
    Ok(())
}
