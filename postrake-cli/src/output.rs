//! Record output formatting.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;

use postrake_core::CanonicalPost;

/// Output format for fetched records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line, in input order.
    Ndjson,
    /// One pretty-printed JSON array.
    Json,
}

/// Writes records in the chosen format.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[CanonicalPost],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Ndjson => {
            for record in records {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
