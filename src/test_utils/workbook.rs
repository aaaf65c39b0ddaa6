use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use time::Date;

/// A cell in a spreadsheet fixture.
pub(crate) enum Cell {
    Text(&'static str),
    Number(f64),
    Date(Date),
    /// Nothing is written to the cell.
    Blank,
}

/// Build an `.xlsx` file with one worksheet holding `rows`.
#[track_caller]
pub(crate) fn must_make_xlsx(rows: &[&[Cell]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let worksheet = workbook.add_worksheet();

    for (row_index, row) in (0u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(row.iter()) {
            match cell {
                Cell::Text(text) => {
                    worksheet
                        .write_string(row_index, col, *text)
                        .expect("Could not write string cell");
                }
                Cell::Number(number) => {
                    worksheet
                        .write_number(row_index, col, *number)
                        .expect("Could not write number cell");
                }
                Cell::Date(date) => {
                    let date_time = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month().into(),
                        date.day(),
                    )
                    .expect("Could not convert date");
                    worksheet
                        .write_datetime_with_format(row_index, col, &date_time, &date_format)
                        .expect("Could not write date cell");
                }
                Cell::Blank => {}
            }
        }
    }

    workbook
        .save_to_buffer()
        .expect("Could not save workbook to buffer")
}
