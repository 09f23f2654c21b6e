//! Prompt and output helpers shared by the interactive commands.

use anyhow::{Result, bail};
use dialoguer::console::style;
use dialoguer::{Confirm, Password, Select, theme::ColorfulTheme};
use keygate_core::auth::{API_KEY_PREFIX, PersistResult, PersistenceMode, looks_valid};
use std::io::{self, Write};
use std::path::Path;

const HEADER_WIDTH: usize = 60;

/// Draws a boxed header with the given title.
pub fn print_header(title: &str) {
    let _ = print_header_to(&mut io::stdout(), title);
}

/// Draws a boxed header to a writer (for testing).
pub fn print_header_to<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    let border = "─".repeat(HEADER_WIDTH);
    writeln!(w, "┌{}┐", border)?;
    writeln!(w, "│ {:<width$} │", title, width = HEADER_WIDTH - 2)?;
    writeln!(w, "└{}┘", border)?;
    writeln!(w)?;
    Ok(())
}

/// Prints a success message with a green checkmark.
pub fn print_success(message: &str) {
    let _ = print_success_to(&mut io::stdout(), message);
}

/// Prints a success message to a writer (for testing).
pub fn print_success_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("✓").green().bold(), style(message).green())
}

/// Prints a warning with a yellow marker.
pub fn print_warning(message: &str) {
    let _ = print_warning_to(&mut io::stdout(), message);
}

/// Prints a warning to a writer (for testing).
pub fn print_warning_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("!").yellow().bold(), style(message).yellow())
}

/// Prints an error message with a red X.
pub fn print_error(message: &str) {
    let _ = print_error_to(&mut io::stdout(), message);
}

/// Prints an error message to a writer (for testing).
pub fn print_error_to<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{} {}", style("✗").red().bold(), style(message).red())
}

/// Warning text shown for keys without the usual prefix.
pub fn key_shape_warning() -> String {
    format!("This API key may be malformed: Anthropic keys usually start with '{API_KEY_PREFIX}'.")
}

/// Ask for an API key without echoing it. Surrounding whitespace is removed.
pub fn prompt_for_key() -> Result<String> {
    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API key")
        .allow_empty_password(true)
        .interact()?;

    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("No API key entered");
    }
    Ok(key)
}

/// Warn about an unusual key shape and ask whether to continue.
///
/// Returns `true` straight away for keys with the expected prefix.
pub fn confirm_key_shape(key: &str) -> Result<bool> {
    if looks_valid(key) {
        return Ok(true);
    }
    print_warning(&key_shape_warning());
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Use it anyway?")
        .default(false)
        .interact()?)
}

/// Ask where the key should be saved.
pub fn select_mode() -> Result<PersistenceMode> {
    const MODES: [PersistenceMode; 3] = [
        PersistenceMode::SessionOnly,
        PersistenceMode::FileOnly,
        PersistenceMode::Both,
    ];
    let labels = [
        "Current session only (environment variable)",
        "Credentials file (persistent, recommended)",
        "Both",
    ];

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Where should the API key be saved?")
        .items(&labels)
        .default(1)
        .interact()?;
    Ok(MODES[choice])
}

/// Describe what a persist call wrote.
pub fn persist_summary(result: &PersistResult, file: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if result.wrote_env {
        lines.push("API key set for the current session".to_string());
    }
    if result.wrote_file {
        lines.push(format!("API key saved to {}", file.display()));
    }
    lines
}

/// Print the result of a persist call, with a note for session-only writes.
pub fn print_persist_result(result: &PersistResult, file: &Path) {
    for line in persist_summary(result, file) {
        print_success(&line);
    }
    if result.wrote_env && !result.wrote_file {
        println!();
        println!("Note: a session key only lasts as long as this process.");
        println!("To keep it, save it to the credentials file or export ANTHROPIC_API_KEY in your shell.");
    }
}
