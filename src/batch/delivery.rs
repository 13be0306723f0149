use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::batch::GeneratedDocument;
use crate::batch::archive::{create_archive, unique_names};
use crate::error::{Error, Result};

/// What a finished batch hands to the user: one document as-is, or a zip of many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Single(GeneratedDocument),
    Archive {
        filename: String,
        bytes: Vec<u8>,
        entries: Vec<String>,
    },
}

impl Delivery {
    pub fn filename(&self) -> &str {
        match self {
            Delivery::Single(document) => &document.filename,
            Delivery::Archive { filename, .. } => filename,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Delivery::Single(document) => &document.content,
            Delivery::Archive { bytes, .. } => bytes,
        }
    }

    /// Number of documents delivered.
    pub fn document_count(&self) -> usize {
        match self {
            Delivery::Single(_) => 1,
            Delivery::Archive { entries, .. } => entries.len(),
        }
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| Error::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.filename());
        fs::write(&path, self.bytes()).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            path = %path.display(),
            documents = self.document_count(),
            bytes = self.bytes().len(),
            "delivered"
        );
        Ok(path)
    }
}

/// One document is delivered directly; two or more are zipped under `archive_name`.
pub fn deliver(mut documents: Vec<GeneratedDocument>, archive_name: &str) -> Result<Delivery> {
    match documents.len() {
        0 => Err(Error::EmptyData),
        1 => Ok(Delivery::Single(documents.remove(0))),
        _ => Ok(Delivery::Archive {
            filename: archive_name.to_string(),
            bytes: create_archive(&documents)?,
            entries: unique_names(&documents),
        }),
    }
}

/// `<stem>_<YYYY-MM-DD>.zip`
pub fn archive_filename(stem: &str, date: NaiveDate) -> String {
    format!("{stem}_{}.zip", date.format("%Y-%m-%d"))
}
