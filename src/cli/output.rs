//! Output formatting utilities for the command-line tool.

use std::io::{self, Write};

use nf_filters::{FilterError, OutputFormat, Record};

/// Writes the canonical URL followed by the results in `format`.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if writing or serialisation fails.
pub fn write_results<W: Write>(
    writer: &mut W,
    url: &str,
    records: &[Record],
    tags_html: &str,
    format: OutputFormat,
) -> Result<(), FilterError> {
    writeln!(writer, "{url}").map_err(|e| io_error(&e))?;
    match format {
        OutputFormat::Jsonl => write_jsonl(writer, records),
        OutputFormat::Json => write_json(writer, records),
        OutputFormat::Tags => writeln!(writer, "{tags_html}").map_err(|e| io_error(&e)),
    }
}

/// Writes one record per line as compact JSON.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if writing or serialisation fails.
pub fn write_jsonl<W: Write>(writer: &mut W, records: &[Record]) -> Result<(), FilterError> {
    for record in records {
        serde_json::to_writer(&mut *writer, record).map_err(|e| FilterError::Io {
            message: format!("JSON serialization failed: {e}"),
        })?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes all records as one pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`FilterError::Io`] if writing or serialisation fails.
pub fn write_json<W: Write>(writer: &mut W, records: &[Record]) -> Result<(), FilterError> {
    serde_json::to_writer_pretty(&mut *writer, records).map_err(|e| FilterError::Io {
        message: format!("JSON serialization failed: {e}"),
    })?;
    writeln!(writer).map_err(|e| io_error(&e))
}

fn io_error(error: &io::Error) -> FilterError {
    FilterError::Io {
        message: error.to_string(),
    }
}
