//! Result formatting for athenaq.
//!
//! Two output formats: comma-joined lines and a bordered table. Both render
//! null or absent cells as the literal `null`.

mod table;

pub use table::render_table;

use crate::error::Result;
use crate::service::{ResultSet, Row};
use std::io::Write;

/// Text rendered for a null or absent cell.
pub const NULL_TEXT: &str = "null";

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One comma-joined line per row, no header.
    #[default]
    Lines,
    /// Bordered table with a header row.
    Table,
}

impl OutputFormat {
    /// Picks the format from the `--table` flag.
    pub fn from_table_flag(table: bool) -> Self {
        if table {
            Self::Table
        } else {
            Self::Lines
        }
    }
}

/// Renders a cell, substituting `null` for missing values.
pub fn cell_text(cell: Option<&String>) -> &str {
    cell.map(String::as_str).unwrap_or(NULL_TEXT)
}

/// Renders one row as comma-joined text.
///
/// Embedded commas are not quoted.
pub fn format_line(row: &Row) -> String {
    row.iter()
        .map(|cell| cell_text(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders every row as a comma-joined line, each terminated by a newline.
pub fn format_lines(result: &ResultSet) -> String {
    result
        .rows
        .iter()
        .map(|row| format!("{}\n", format_line(row)))
        .collect()
}

/// Formats result sets in a fixed output format.
pub struct ResultFormatter {
    format: OutputFormat,
}

impl ResultFormatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &ResultSet) -> String {
        match self.format {
            OutputFormat::Lines => format_lines(result),
            OutputFormat::Table => render_table(result),
        }
    }

    /// Formats the result and writes it to `out`.
    pub fn write_to(&self, result: &ResultSet, out: &mut impl Write) -> Result<()> {
        out.write_all(self.format(result).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
