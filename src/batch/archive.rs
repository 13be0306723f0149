use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::batch::GeneratedDocument;
use crate::error::Result;

/// Entry names for `documents`, with later duplicates renamed `stem_1.ext`, `stem_2.ext`, ...
pub fn unique_names(documents: &[GeneratedDocument]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(documents.len());
    let mut names = Vec::with_capacity(documents.len());

    for document in documents {
        let mut name = document.filename.clone();
        let mut counter = 1;
        while taken.contains(&name) {
            name = with_counter(&document.filename, counter);
            counter += 1;
        }
        taken.insert(name.clone());
        names.push(name);
    }

    names
}

fn with_counter(filename: &str, counter: usize) -> String {
    match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}_{counter}.{extension}"),
        _ => format!("{filename}_{counter}"),
    }
}

/// Zip every document, in order, under a unique entry name.
pub fn create_archive(documents: &[GeneratedDocument]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (document, name) in documents.iter().zip(unique_names(documents)) {
        debug!(entry = %name, bytes = document.content.len(), "adding archive entry");
        writer.start_file(name, options)?;
        writer.write_all(&document.content)?;
    }

    Ok(writer.finish()?.into_inner())
}
