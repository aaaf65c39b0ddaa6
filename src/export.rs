//! Downloading every contribution as an `.xlsx` backup with a running total.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    contribution::{Contribution, get_contributions_for_export, is_prepared},
    endpoints,
    spreadsheet::{CellValue, SheetColumn, write_workbook},
    timezone::local_today,
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const EXPORT_SHEET_NAME: &str = "All Contributions";

const EXPORT_COLUMNS: [SheetColumn; 4] = [
    SheetColumn {
        label: "Member Name",
        width: 30.0,
    },
    SheetColumn {
        label: "Contribution (UGX)",
        width: 22.0,
    },
    SheetColumn {
        label: "Date of Entry",
        width: 18.0,
    },
    SheetColumn {
        label: "Total Savings (UGX)",
        width: 25.0,
    },
];

/// The state needed for exporting contributions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kampala".
    pub local_timezone: String,
    /// The database connection for reading contributions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A contribution and the total saved up to and including it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub name: String,
    pub amount: i64,
    pub date: Date,
    pub running_balance: i64,
}

/// Pair each contribution with the sum of it and every contribution before it.
///
/// # Errors
/// Returns [Error::ExportError] if the total overflows.
pub fn with_running_balance(contributions: Vec<Contribution>) -> Result<Vec<ExportRow>, Error> {
    let mut balance: i64 = 0;

    contributions
        .into_iter()
        .map(|contribution| -> Result<ExportRow, Error> {
            balance = balance.checked_add(contribution.amount).ok_or_else(|| {
                Error::ExportError("the running balance is too large to export".to_owned())
            })?;

            Ok(ExportRow {
                name: contribution.name,
                amount: contribution.amount,
                date: contribution.date,
                running_balance: balance,
            })
        })
        .collect()
}

/// The download name for a backup made on `today`.
pub fn export_file_name(today: Date) -> String {
    format!("Family_Savings_Backup_{today}.xlsx")
}

/// Write `rows` to a spreadsheet with the backup's labels and column widths.
pub fn build_export_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, Error> {
    let cells: Vec<Vec<CellValue>> = rows
        .iter()
        .map(|row| {
            vec![
                CellValue::Text(row.name.clone()),
                CellValue::Integer(row.amount),
                CellValue::Date(row.date),
                CellValue::Integer(row.running_balance),
            ]
        })
        .collect();

    write_workbook(EXPORT_SHEET_NAME, &EXPORT_COLUMNS, &cells)
}

/// Route handler that downloads every contribution as an `.xlsx` file.
///
/// Redirects to the upload page when there is nothing to export.
pub async fn export_all_contributions(
    State(state): State<ExportState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let contributions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        if !is_prepared(&connection)? {
            tracing::info!("Nothing to export, redirecting to the upload page");
            return Ok(Redirect::to(endpoints::PREPARE_DB_VIEW).into_response());
        }

        get_contributions_for_export(&connection)?
    };

    let rows = with_running_balance(contributions)?;
    let bytes = build_export_workbook(&rows)?;
    let file_name = export_file_name(today);

    tracing::info!(
        "Exported {} contributions to {file_name} ({} bytes)",
        rows.len(),
        bytes.len()
    );

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
