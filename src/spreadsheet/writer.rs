//! Writes rows of cells to an in-memory `.xlsx` file.

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use time::Date;

use crate::Error;

/// The header label and display width of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetColumn {
    pub label: &'static str,
    /// Width in characters.
    pub width: f64,
}

/// A single value to write to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Date(Date),
}

/// Write `rows` under a bold header row built from `columns` and return the
/// bytes of the `.xlsx` file.
///
/// Dates are written as real spreadsheet dates displayed as `yyyy-mm-dd`.
///
/// # Errors
/// Returns [Error::ExportError] if the workbook cannot be created, e.g. a
/// date is outside the range a spreadsheet can represent.
pub fn write_workbook(
    sheet_name: &str,
    columns: &[SheetColumn],
    rows: &[Vec<CellValue>],
) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, column) in (0u16..).zip(columns) {
        worksheet.set_column_width(col, column.width)?;
        worksheet.write_string_with_format(0, col, column.label, &header_format)?;
    }

    for (row_index, row) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(row) {
            match value {
                CellValue::Text(text) => {
                    worksheet.write_string(row_index, col, text)?;
                }
                CellValue::Integer(number) => {
                    worksheet.write_number(row_index, col, *number as f64)?;
                }
                CellValue::Date(date) => {
                    let date_time = to_excel_date(*date)?;
                    worksheet.write_datetime_with_format(row_index, col, &date_time, &date_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn to_excel_date(date: Date) -> Result<ExcelDateTime, Error> {
    let year = u16::try_from(date.year())
        .map_err(|_| Error::ExportError(format!("the year of {date} cannot be exported")))?;

    Ok(ExcelDateTime::from_ymd(year, date.month().into(), date.day())?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use time::macros::date;

    use super::{CellValue, SheetColumn, write_workbook};

    const COLUMNS: [SheetColumn; 2] = [
        SheetColumn {
            label: "Label",
            width: 20.0,
        },
        SheetColumn {
            label: "When",
            width: 12.0,
        },
    ];

    #[test]
    fn writes_header_and_rows_to_named_sheet() {
        let rows = vec![
            vec![
                CellValue::Text("Alice".to_owned()),
                CellValue::Date(date!(2025 - 01 - 01)),
            ],
            vec![CellValue::Integer(42), CellValue::Date(date!(2025 - 01 - 02))],
        ];

        let bytes = write_workbook("Sheet Under Test", &COLUMNS, &rows).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet Under Test".to_owned()]);
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.get((0, 0)), Some(&Data::String("Label".to_owned())));
        assert_eq!(range.get((0, 1)), Some(&Data::String("When".to_owned())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("Alice".to_owned())));
        assert!(matches!(
            range.get((2, 0)),
            Some(Data::Float(42.0)) | Some(Data::Int(42))
        ));
        match range.get((1, 1)) {
            Some(Data::DateTime(date_time)) => assert_eq!(date_time.as_f64(), 45_658.0),
            other => panic!("want a date cell, got {other:?}"),
        }
    }

    #[test]
    fn empty_rows_still_have_header() {
        let bytes = write_workbook("Empty", &COLUMNS, &[]).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.height(), 1);
    }
}
