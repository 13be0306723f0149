use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::{Duration, NaiveDate, Timelike};

use crate::error::{Error, Result};

/// Display strings for every cell of the first worksheet, in sheet order.
pub(super) fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = workbook.worksheet_range_at(0).ok_or(Error::EmptyData)??;

    Ok(grid_from_range(&range))
}

fn grid_from_range(range: &Range<Data>) -> Vec<Vec<String>> {
    let (height, width) = range.get_size();
    let mut grid = Vec::with_capacity(height);

    for row in range.rows() {
        let mut cells = Vec::with_capacity(width);
        cells.extend(row.iter().map(display_value));
        grid.push(cells);
    }

    grid
}

/// What a person sees in the cell, not the stored encoding.
pub(super) fn display_value(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_duration() {
                format_number(serial)
            } else {
                excel_serial_to_iso(serial).unwrap_or_else(|| format_number(serial))
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Integral values lose the fraction; everything else is cut to the 15 significant
/// digits the General number format shows.
fn format_number(f: f64) -> String {
    if !f.is_finite() {
        return f.to_string();
    }

    let rounded = format!("{f:.14e}").parse::<f64>().unwrap_or(f);
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        (rounded as i64).to_string()
    } else {
        rounded.to_string()
    }
}

/// Excel 1900-system serial to `YYYY-MM-DD`, with a `THH:MM:SS` part when the time is not
/// midnight. Serials below one carry no date and come out as `HH:MM:SS`.
pub(super) fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    // Serial 60 is the phantom 1900-02-29.
    let days = if serial >= 61.0 { serial - 1.0 } else { serial };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 31)?.and_hms_opt(0, 0, 0)?;
    let seconds = (days * 86_400.0).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::seconds(seconds))?;

    if serial < 1.0 {
        Some(datetime.format("%H:%M:%S").to_string())
    } else if datetime.num_seconds_from_midnight() == 0 {
        Some(datetime.format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn converts_serials_to_iso_dates() {
        assert_eq!(excel_serial_to_iso(1.0).as_deref(), Some("1900-01-01"));
        assert_eq!(excel_serial_to_iso(61.0).as_deref(), Some("1900-03-01"));
        assert_eq!(excel_serial_to_iso(45366.0).as_deref(), Some("2024-03-15"));
        assert_eq!(
            excel_serial_to_iso(45366.5).as_deref(),
            Some("2024-03-15T12:00:00")
        );
        assert_eq!(excel_serial_to_iso(0.5).as_deref(), Some("12:00:00"));
        assert_eq!(excel_serial_to_iso(-1.0), None);
    }

    #[test]
    fn formats_numbers_like_a_spreadsheet() {
        assert_eq!(display_value(&Data::Float(42.0)), "42");
        assert_eq!(display_value(&Data::Float(3.25)), "3.25");
        assert_eq!(display_value(&Data::Float(0.1 + 0.2)), "0.3");
        assert_eq!(display_value(&Data::Float(1.0 / 3.0)), "0.333333333333333");
        assert_eq!(display_value(&Data::Float(1e15 + 0.3)), "1000000000000000");
        assert_eq!(display_value(&Data::Int(-7)), "-7");
        assert_eq!(display_value(&Data::Bool(true)), "TRUE");
        assert_eq!(display_value(&Data::Empty), "");
    }

    #[test]
    fn reads_first_sheet_with_display_values() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Client").expect("write");
        sheet.write_string(0, 1, "Budget").expect("write");
        sheet.write_string(0, 2, "Date").expect("write");
        sheet.write_string(1, 0, "Acme").expect("write");
        sheet.write_number(1, 1, 1500.0).expect("write");
        let date = ExcelDateTime::from_ymd(2024, 3, 15).expect("date");
        sheet
            .write_datetime_with_format(1, 2, &date, &date_format)
            .expect("write");
        sheet.write_string(2, 0, "Globex").expect("write");
        sheet.write_number(2, 1, 99.5).expect("write");

        let other = workbook.add_worksheet();
        other.write_string(0, 0, "ignored").expect("write");

        let bytes = workbook.save_to_buffer().expect("save");
        let grid = read_first_sheet(&bytes).expect("read");

        assert_eq!(
            grid,
            vec![
                vec!["Client".to_string(), "Budget".to_string(), "Date".to_string()],
                vec!["Acme".to_string(), "1500".to_string(), "2024-03-15".to_string()],
                vec!["Globex".to_string(), "99.5".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn garbage_bytes_are_a_spreadsheet_error() {
        let result = read_first_sheet(b"definitely not a workbook");
        assert!(matches!(result, Err(Error::Spreadsheet(_))));
    }
}
