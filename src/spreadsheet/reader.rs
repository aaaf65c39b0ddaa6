//! Turns the first worksheet of an `.xlsx` file into contributions.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use time::{Date, Duration, macros::date, macros::format_description};

use crate::{
    Error,
    contribution::{Contribution, NewContribution},
};

/// Day zero for spreadsheet date serials, i.e. serial 1.0 is 1899-12-31.
///
/// Using the 30th rather than the 31st of December absorbs the 1900 leap
/// year bug for every date after February 1900.
const EXCEL_EPOCH: Date = date!(1899 - 12 - 30);

/// The serial of 9999-12-31, the last date a spreadsheet can hold.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// The columns a backup must have and the header labels accepted for each.
const NAME_HEADERS: [&str; 2] = ["name", "member name"];
const AMOUNT_HEADERS: [&str; 2] = ["amount", "contribution (ugx)"];
const DATE_HEADERS: [&str; 2] = ["date", "date of entry"];

#[derive(Debug, PartialEq)]
struct ColumnIndices {
    name: usize,
    amount: usize,
    date: usize,
}

/// Parse the contributions in the first worksheet of the `.xlsx` file in
/// `bytes`.
///
/// The first non-empty row is the header. Columns are found by their header
/// text, so they may appear in any order and extra columns are ignored. Each
/// following non-empty row becomes one contribution, in file order.
///
/// # Errors
/// Returns [Error::InvalidSpreadsheet] if the file is not a readable
/// workbook, a column is missing, a cell cannot be converted, or there are
/// no data rows. The message names the spreadsheet row and column at fault.
pub fn read_contributions(bytes: &[u8]) -> Result<Vec<NewContribution>, Error> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(|error| {
        tracing::debug!("Could not open workbook: {error}");
        Error::InvalidSpreadsheet(format!("could not open the workbook: {error}"))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidSpreadsheet("the workbook has no worksheets".to_owned()))?
        .map_err(|error| {
            Error::InvalidSpreadsheet(format!("could not read the first worksheet: {error}"))
        })?;

    // Rows in a range are relative to its first used cell.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range
        .rows()
        .enumerate()
        .map(|(index, row)| (first_row + index + 1, row))
        .filter(|(_, row)| !is_blank_row(row));

    let Some((_, header)) = rows.next() else {
        return Err(Error::InvalidSpreadsheet(
            "the first worksheet is empty".to_owned(),
        ));
    };

    let columns = find_columns(header)?;

    let contributions = rows
        .map(|(row_number, row)| parse_row(row_number, row, &columns))
        .collect::<Result<Vec<_>, Error>>()?;

    if contributions.is_empty() {
        return Err(Error::InvalidSpreadsheet(
            "no contribution rows found".to_owned(),
        ));
    }

    Ok(contributions)
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(is_blank)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn find_columns(header: &[Data]) -> Result<ColumnIndices, Error> {
    let labels: Vec<String> = header
        .iter()
        .map(|cell| match cell {
            Data::String(text) => text.trim().to_ascii_lowercase(),
            _ => String::new(),
        })
        .collect();

    let find = |column: &str, accepted: &[&str]| {
        labels
            .iter()
            .position(|label| accepted.contains(&label.as_str()))
            .ok_or_else(|| Error::InvalidSpreadsheet(format!("missing column '{column}'")))
    };

    Ok(ColumnIndices {
        name: find("name", &NAME_HEADERS)?,
        amount: find("amount", &AMOUNT_HEADERS)?,
        date: find("date", &DATE_HEADERS)?,
    })
}

fn parse_row(
    row_number: usize,
    row: &[Data],
    columns: &ColumnIndices,
) -> Result<NewContribution, Error> {
    let cell = |index: usize| row.get(index).unwrap_or(&Data::Empty);
    let cell_error = |column: &str, problem: String| {
        Error::InvalidSpreadsheet(format!("row {row_number}, column '{column}': {problem}"))
    };

    let name = parse_name(cell(columns.name)).map_err(|problem| cell_error("name", problem))?;
    let amount =
        parse_amount(cell(columns.amount)).map_err(|problem| cell_error("amount", problem))?;
    let date = parse_date(cell(columns.date)).map_err(|problem| cell_error("date", problem))?;

    Ok(Contribution::build(&name, amount, date))
}

fn parse_name(cell: &Data) -> Result<String, String> {
    match cell {
        Data::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        Data::Int(number) => Ok(number.to_string()),
        Data::Float(number) => Ok(number.to_string()),
        cell if is_blank(cell) => Err("the name is blank".to_owned()),
        other => Err(format!("expected text, found {other:?}")),
    }
}

fn parse_amount(cell: &Data) -> Result<i64, String> {
    match cell {
        Data::Int(number) => Ok(*number),
        Data::Float(number) => float_to_whole(*number)
            .ok_or_else(|| format!("{number} is not a whole number of shillings")),
        Data::String(text) if !text.trim().is_empty() => {
            let digits: String = text
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();

            digits
                .parse()
                .map_err(|_| format!("\"{}\" is not a whole number", text.trim()))
        }
        cell if is_blank(cell) => Err("the amount is blank".to_owned()),
        other => Err(format!("expected a number, found {other:?}")),
    }
}

fn float_to_whole(number: f64) -> Option<i64> {
    // Beyond 2^53 floats can no longer represent every whole number.
    const LIMIT: f64 = 9_007_199_254_740_992.0;

    if number.is_finite() && number.fract() == 0.0 && number.abs() <= LIMIT {
        Some(number as i64)
    } else {
        None
    }
}

fn parse_date(cell: &Data) -> Result<Date, String> {
    match cell {
        Data::DateTime(date_time) if !date_time.is_duration() => {
            date_from_serial(date_time.as_f64())
        }
        Data::Float(serial) => date_from_serial(*serial),
        Data::Int(serial) => date_from_serial(*serial as f64),
        Data::DateTimeIso(text) => date_from_iso(text),
        Data::String(text) if !text.trim().is_empty() => date_from_iso(text.trim()),
        cell if is_blank(cell) => Err("the date is blank".to_owned()),
        other => Err(format!("expected a date, found {other:?}")),
    }
}

/// Convert a spreadsheet date serial to a date, discarding the time of day.
fn date_from_serial(serial: f64) -> Result<Date, String> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial.floor()) {
        return Err(format!("{serial} is not a valid spreadsheet date"));
    }

    EXCEL_EPOCH
        .checked_add(Duration::days(serial.floor() as i64))
        .ok_or_else(|| format!("{serial} is not a valid spreadsheet date"))
}

/// Parse `YYYY-MM-DD`, ignoring a trailing time such as `T08:30:00` or ` 08:30`.
///
/// Month and day may omit their leading zero, e.g. `2025-1-5`.
fn date_from_iso(text: &str) -> Result<Date, String> {
    let date_part = text
        .split_once(['T', ' '])
        .map_or(text, |(date_part, _time)| date_part);

    Date::parse(
        date_part,
        format_description!("[year]-[month padding:none]-[day padding:none]"),
    )
    .map_err(|_| format!("\"{text}\" is not a date in YYYY-MM-DD format"))
}
