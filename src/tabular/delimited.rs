use csv::ReaderBuilder;

use crate::error::Result;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Split comma-separated text into rows of cells.
///
/// Quoted fields may hold commas, line breaks and doubled quotes; `\n` and `\r\n` both end
/// a row and a final row without a terminator is kept. Invalid UTF-8 is replaced, not fatal.
pub(super) fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoted_comma_and_escaped_quote_form_one_field() {
        let rows = read_rows(b"Client,Notes\n\"Smith, \"\"Bob\"\" Jones\",ok\n").expect("read");
        assert_eq!(
            rows,
            vec![
                vec!["Client".to_string(), "Notes".to_string()],
                vec!["Smith, \"Bob\" Jones".to_string(), "ok".to_string()],
            ]
        );
    }

    #[test]
    fn crlf_and_missing_final_terminator() {
        let rows = read_rows(b"a,b\r\n1,2\r\n3,4").expect("read");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["3".to_string(), "4".to_string()]);
    }

    #[test]
    fn quoted_newline_stays_in_field() {
        let rows = read_rows(b"a\n\"line one\nline two\"\n").expect("read");
        assert_eq!(rows[1], vec!["line one\nline two".to_string()]);
    }

    #[test]
    fn strips_byte_order_mark_and_tolerates_bad_utf8() {
        let rows = read_rows(b"\xEF\xBB\xBFClient\nAc\xFFme\n").expect("read");
        assert_eq!(rows[0], vec!["Client".to_string()]);
        assert_eq!(rows[1], vec!["Ac\u{FFFD}me".to_string()]);
    }
}
