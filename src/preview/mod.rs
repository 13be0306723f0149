//! Record-by-record preview of the filled markup template.

mod navigator;
pub mod text;

pub use navigator::{MarkupRenderer, PreviewFrame, PreviewNavigator, PreviewRenderer};
pub use text::markup_to_text;
