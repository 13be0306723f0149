use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::RenderError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported file format: {0} (expected .xlsx, .xls, .xlsm, .xlsb, .ods or .csv)")]
    UnsupportedFormat(String),

    #[error("no data found: the file needs a header row and at least one data row")]
    EmptyData,

    #[error("templates are not loaded yet")]
    TemplateNotLoaded,

    #[error("failed to load template {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "preview and document templates disagree on placeholders \
         (missing from preview: [{}], missing from document: [{}])",
        .missing_in_preview.join(", "),
        .missing_in_document.join(", ")
    )]
    TemplateMismatch {
        missing_in_preview: Vec<String>,
        missing_in_document: Vec<String>,
    },

    #[error(
        "templates use placeholders with no mapped field \
         (preview: [{}], document: [{}])",
        .in_preview.join(", "),
        .in_document.join(", ")
    )]
    UnmappedPlaceholders {
        in_preview: Vec<String>,
        in_document: Vec<String>,
    },

    #[error("placeholder opened at byte {offset} of the preview template is never closed")]
    UnclosedPlaceholder { offset: usize },

    #[error("failed to render document: {0}")]
    Render(#[from] RenderError),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("unable to parse delimited text: {0}")]
    Delimited(#[from] csv::Error),

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("invalid field mapping: {0}")]
    InvalidMapping(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("generation failed at record {}: {source}", .index + 1)]
    Generation {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for the errors caused by the uploaded data rather than the templates or the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::EmptyData
                | Self::Read { .. }
                | Self::Spreadsheet(_)
                | Self::Delimited(_)
        )
    }
}

impl From<calamine::Error> for Error {
    fn from(error: calamine::Error) -> Self {
        Self::Spreadsheet(error.to_string())
    }
}
