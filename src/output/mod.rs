//
//  bbdc-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Output formatting for the CLI, supporting two modes:
//!
//! - **Table format**: human-readable summaries for interactive terminal use
//! - **JSON format**: the raw server response, pretty-printed, for scripting
//!   and automation (`--json` on any data-bearing command)
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: the available output formats
//! - [`OutputWriter`]: entry point for writing formatted output; takes both
//!   the raw server payload and the typed view so JSON mode never reshapes
//!   what the server sent
//! - [`TableOutput`]: trait for types that can render themselves as a table
//!   row or section
//! - [`write_json`]: pretty-prints any serializable value

use serde::Serialize;

/// Available output formats.
///
/// The default is [`OutputFormat::Table`], which provides the best experience
/// for interactive terminal use with color support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable format with optional color support.
    #[default]
    Table,
    /// Pretty-printed JSON for scripting and automation.
    Json,
}

/// A unified output writer for the configured format.
///
/// Color support is detected at construction time and disabled automatically
/// when output is piped or `NO_COLOR` is set.
///
/// # Example
///
/// ```rust,ignore
/// let writer = OutputWriter::table();
/// writer.write_list(&items)?;
/// writer.write_success("Pull request created");
/// ```
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Convenience constructor for JSON output.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    /// Convenience constructor for table output.
    pub fn table() -> Self {
        Self::new(OutputFormat::Table)
    }

    /// Whether color output is enabled.
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// The configured output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes one entity: the raw server payload in JSON mode, the typed
    /// view as a table otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn write<T: TableOutput>(&self, raw: &serde_json::Value, view: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(raw),
            OutputFormat::Table => {
                view.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes a list of entities: the raw payloads as one JSON array in JSON
    /// mode, each typed view as a table row otherwise.
    pub fn write_list<T: TableOutput>(
        &self,
        raw: &serde_json::Value,
        views: &[T],
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(raw),
            OutputFormat::Table => {
                for view in views {
                    view.print_table(self.color);
                }
                Ok(())
            }
        }
    }

    /// Writes an error message to stderr, styled in red when enabled.
    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    /// Writes an informational message to stdout.
    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Writes a success message to stdout with a green checkmark.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// A trait for types that can render themselves as a table row or section.
///
/// Implementations should be mindful of terminal width and truncate long
/// values with [`crate::util::truncate`].
pub trait TableOutput {
    /// Renders the type as a table row or section.
    fn print_table(&self, color: bool);
}

/// Writes a value as pretty-printed JSON to stdout.
///
/// Used for the `--json` path of every command, where the value is the raw
/// server response rather than a reshaped summary.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized to JSON.
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Prints a styled header with an underline.
pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.len()));
}

/// Prints a key-value pair, dimming the key when color is enabled.
pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_table() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_writer_reports_its_format() {
        assert_eq!(OutputWriter::json().format(), OutputFormat::Json);
        assert_eq!(OutputWriter::table().format(), OutputFormat::Table);
    }
}
