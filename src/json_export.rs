use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::tabular::{ParseResult, Record};
use crate::template::FieldMapping;

/// A parsed upload as dumped by `inspect --json`: headers, mapping coverage, then records.
#[derive(Debug, Serialize)]
pub struct InspectReport<'a> {
    pub headers: &'a [String],
    pub record_count: usize,
    pub missing_fields: Vec<&'a str>,
    pub records: &'a [Record],
}

impl<'a> InspectReport<'a> {
    pub fn new(parsed: &'a ParseResult, mapping: &'a FieldMapping) -> Self {
        Self {
            headers: &parsed.headers,
            record_count: parsed.len(),
            missing_fields: parsed.missing_fields(mapping),
            records: &parsed.rows,
        }
    }
}

pub fn serialize_to_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn export_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serialize_to_json(data)?;
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_error)?;
    file.write_all(json.as_bytes()).map_err(write_error)?;
    Ok(())
}
