//! Interactive multi-turn conversation.

use anyhow::Result;
use clap::Args;
use dialoguer::{Input, theme::ColorfulTheme};
use keygate_core::providers::ConversationTurn;

use super::prompts::{print_error, print_header};
use super::{ClientArgs, Context};

const EXIT_COMMAND: &str = "/exit";

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub client: ClientArgs,
}

pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(args.client.api_key.as_deref())?;
    let model = args.client.model.as_deref();

    print_header("KEYGATE CHAT");
    println!("Empty line or {EXIT_COMMAND} to quit.");
    println!();

    let mut turns: Vec<ConversationTurn> = Vec::new();
    loop {
        let line: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()?;

        if is_exit(&line) {
            break;
        }

        turns.push(ConversationTurn::user(line.trim()));
        match client.try_chat(&turns, model, args.client.max_tokens).await {
            Ok(reply) => {
                println!("{reply}");
                println!();
                turns.push(ConversationTurn::assistant(reply));
            }
            Err(e) => {
                // Drop the unanswered turn so the history keeps alternating.
                turns.pop();
                print_error(&e.to_string());
            }
        }
    }

    Ok(())
}

fn is_exit(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line == EXIT_COMMAND
}
