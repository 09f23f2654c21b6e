//! Open the Anthropic console, where API keys are created.

use anyhow::Result;
use tracing::debug;

use super::prompts::print_warning;

pub const CONSOLE_URL: &str = "https://console.anthropic.com/";

pub fn run() -> Result<()> {
    open_console();
    Ok(())
}

/// Launch the console in a browser. Falls back to printing the URL.
pub fn open_console() {
    println!("Opening {CONSOLE_URL}");
    if let Err(e) = open::that(CONSOLE_URL) {
        debug!(error = %e, "failed to launch browser");
        print_warning("Could not open a browser. Visit this URL instead:");
        println!("  {CONSOLE_URL}");
    }
}
