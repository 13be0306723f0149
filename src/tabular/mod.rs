//! Spreadsheet and CSV input, normalised into uniform records.

mod delimited;
mod grid;
mod kind;
mod record;
mod spreadsheet;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

pub use kind::FileKind;
pub use record::{ParseResult, Record};

/// Parse an uploaded file's bytes into headers and records.
pub fn parse(bytes: &[u8], kind: FileKind) -> Result<ParseResult> {
    let grid = match kind {
        FileKind::Spreadsheet => spreadsheet::read_first_sheet(bytes)?,
        FileKind::Delimited => delimited::read_rows(bytes)?,
    };

    let result = grid::records_from_grid(grid)?;
    info!(
        ?kind,
        columns = result.headers.len(),
        rows = result.rows.len(),
        "parsed tabular input"
    );
    Ok(result)
}

/// Detect the kind from the extension, read the file, and parse it.
///
/// Unsupported extensions are rejected before the file is opened.
pub fn parse_file(path: &Path) -> Result<ParseResult> {
    let kind = FileKind::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&bytes, kind)
}
