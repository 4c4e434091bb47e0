//! Formats command implementation.

use oxiwrap_dispatch::{Archiver, FormatSupport};
use std::fmt::Write;

pub fn cmd_formats(archiver: &Archiver, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = archiver.formats();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }
    Ok(())
}

/// Plain-text table, one block per format.
fn render(report: &[FormatSupport]) -> String {
    let mut out = String::new();
    for format in report {
        let _ = writeln!(out, "{} ({}):", format.format, format.description);
        for command in &format.commands {
            let _ = match &command.program {
                Some(program) => writeln!(
                    out,
                    "  {:<8} {} ({})",
                    command.command, program, command.status
                ),
                None => writeln!(out, "  {:<8} {}", command.command, command.status),
            };
        }
    }
    out
}
