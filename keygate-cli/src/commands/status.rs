//! Report which API key is in effect, without revealing it.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use keygate_core::auth::{CredentialStatus, ENV_VAR};

use super::Context;
use super::prompts::{key_shape_warning, print_warning};

/// Everything shown by `keygate status`.
struct StatusReport {
    status: CredentialStatus,
    file: String,
    file_exists: bool,
    file_has_key: bool,
}

impl StatusReport {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let source = self
            .status
            .source
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(not configured)".to_string());
        let masked = self.status.masked.clone().unwrap_or_else(|| "-".to_string());
        let format = if !self.status.is_configured() {
            "-"
        } else if self.status.looks_valid {
            "ok"
        } else {
            "unexpected prefix"
        };

        vec![
            ("Source", source),
            ("Key", masked),
            ("Length", self.status.length.to_string()),
            ("Format", format.to_string()),
            (ENV_VAR, yes_no(self.status.env_set)),
            ("Credentials file", self.file.clone()),
            ("File exists", yes_no(self.file_exists)),
            ("File has key", yes_no(self.file_has_key)),
        ]
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

pub fn run(ctx: &Context) -> Result<()> {
    let resolver = ctx.resolver();
    let store = resolver.store();

    let report = StatusReport {
        status: resolver.status()?,
        file: store.path().display().to_string(),
        file_exists: store.exists(),
        file_has_key: store
            .get(ENV_VAR)?
            .is_some_and(|v| !v.is_empty()),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for (name, value) in report.rows() {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    println!("{table}");

    if !report.status.is_configured() {
        println!();
        println!("No API key found. Run `keygate login` or `keygate set-key <KEY>`.");
    } else if !report.status.looks_valid {
        println!();
        print_warning(&key_shape_warning());
    }

    Ok(())
}
