//! Turning filled placeholder bindings into binary documents.

pub mod docx;

use std::collections::BTreeSet;
use std::io;

use indexmap::IndexMap;
use thiserror::Error;

use crate::template::PlaceholderSyntax;

pub use docx::DocxCodec;

/// Placeholder token -> raw value, in mapping order.
pub type DataBindings = IndexMap<String, String>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template is not a valid document container: {0}")]
    MalformedTemplate(String),

    #[error("template is missing required part {0}")]
    MissingPart(String),

    #[error("placeholder {token} in {part} has no value bound to it")]
    UnresolvedPlaceholder { part: String, token: String },

    #[error("placeholder opened at byte {offset} of {part} is never closed")]
    UnbalancedDelimiter { part: String, offset: usize },

    #[error("placeholder {token} in {part} is split across formatting runs")]
    SplitPlaceholder { part: String, token: String },

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A document format that can be filled from [`DataBindings`].
///
/// Implementations must be deterministic: the same template and bindings produce an
/// equivalent artifact.
pub trait DocumentCodec {
    fn render(&self, template: &[u8], bindings: &DataBindings) -> Result<Vec<u8>, RenderError>;

    /// Delimiters this codec treats as placeholders. Preview markup is scanned with the same ones.
    fn syntax(&self) -> &PlaceholderSyntax;

    /// Every delimited placeholder the template declares, as plain text.
    fn placeholders(&self, template: &[u8]) -> Result<BTreeSet<String>, RenderError>;
}
