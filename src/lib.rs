pub mod app;
pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod json_export;
pub mod preview;
pub mod tabular;
pub mod template;
pub mod ui;

pub use error::{Error, Result};
