use crate::error::{Error, Result};
use crate::tabular::{ParseResult, Record};

/// Turn a rectangular-ish grid of display strings into headers and records.
///
/// Blank rows are removed first, so the header is the first non-blank row. Cells past the
/// header count are ignored and short rows are padded with empty strings.
pub(crate) fn records_from_grid<I>(grid: I) -> Result<ParseResult>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rows = grid.into_iter().filter(|row| !is_blank(row));

    let headers: Vec<String> = rows
        .next()
        .ok_or(Error::EmptyData)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let records: Vec<Record> = rows.map(|cells| zip_with_headers(&headers, cells)).collect();

    if records.is_empty() {
        return Err(Error::EmptyData);
    }

    Ok(ParseResult {
        headers,
        rows: records,
    })
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn zip_with_headers(headers: &[String], cells: Vec<String>) -> Record {
    let mut cells = cells.into_iter();
    let mut record = Record::with_capacity(headers.len());

    for header in headers {
        record.insert(header.as_str(), cells.next().unwrap_or_default());
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn pads_short_rows_and_drops_extra_cells() {
        let result = records_from_grid(grid(&[
            &[" Client ", "Project"],
            &["Acme"],
            &["Globex", "Rocket", "extra"],
        ]))
        .expect("parse");

        assert_eq!(result.headers, vec!["Client", "Project"]);
        assert_eq!(result.rows[0].get("Project"), "");
        assert_eq!(result.rows[0].value("Project"), Some(""));
        assert_eq!(result.rows[1].get("Project"), "Rocket");
        assert_eq!(result.rows[1].len(), 2);
    }

    #[test]
    fn duplicate_headers_keep_last_value() {
        let result =
            records_from_grid(grid(&[&["Name", "Name"], &["first", "second"]])).expect("parse");

        assert_eq!(result.headers, vec!["Name", "Name"]);
        assert_eq!(result.rows[0].len(), 1);
        assert_eq!(result.rows[0].get("Name"), "second");
    }

    #[test]
    fn blank_rows_are_skipped_everywhere() {
        let result = records_from_grid(grid(&[
            &["", "  "],
            &["Client"],
            &["  "],
            &["Acme"],
            &[""],
            &["Globex"],
        ]))
        .expect("parse");

        assert_eq!(result.headers, vec!["Client"]);
        let clients: Vec<&str> = result.rows.iter().map(|row| row.get("Client")).collect();
        assert_eq!(clients, vec!["Acme", "Globex"]);
    }

    #[test]
    fn header_only_is_empty_data() {
        assert!(matches!(
            records_from_grid(grid(&[&["Client"], &[" "]])),
            Err(Error::EmptyData)
        ));
        assert!(matches!(records_from_grid(Vec::<Vec<String>>::new()), Err(Error::EmptyData)));
    }
}
