use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Binary workbook container; only the first sheet is read.
    Spreadsheet,
    /// Comma-separated text with RFC 4180 quoting.
    Delimited,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Delimited),
            _ => None,
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            "text/csv" | "application/csv" => Some(Self::Delimited),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel.sheet.macroenabled.12"
            | "application/vnd.ms-excel.sheet.binary.macroenabled.12"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }
}

impl FromStr for FileKind {
    type Err = Error;

    /// Accepts a file name, a bare extension, or a MIME content type.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains('/')
            && let Some(kind) = Self::from_content_type(s)
        {
            return Ok(kind);
        }

        let extension = s.rsplit('.').next().unwrap_or(s);
        Self::from_extension(extension).ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension_case_insensitively() {
        assert_eq!(
            FileKind::from_path(Path::new("clients.XLSX")).ok(),
            Some(FileKind::Spreadsheet)
        );
        assert_eq!(
            FileKind::from_path(Path::new("data/clients.csv")).ok(),
            Some(FileKind::Delimited)
        );
        assert_eq!("report.ods".parse::<FileKind>().ok(), Some(FileKind::Spreadsheet));
        assert_eq!("xls".parse::<FileKind>().ok(), Some(FileKind::Spreadsheet));
    }

    #[test]
    fn detects_by_content_type() {
        assert_eq!(
            "text/csv; charset=utf-8".parse::<FileKind>().ok(),
            Some(FileKind::Delimited)
        );
        assert_eq!(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                .parse::<FileKind>()
                .ok(),
            Some(FileKind::Spreadsheet)
        );
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert!(matches!(
            FileKind::from_path(Path::new("notes.txt")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileKind::from_path(Path::new("no_extension")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            "application/pdf".parse::<FileKind>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
