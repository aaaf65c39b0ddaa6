//! The endpoint that replaces the stored contributions with an uploaded `.xlsx` backup.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, contribution::replace_all_contributions, endpoints,
    spreadsheet::read_contributions,
};

/// The multipart field that holds the uploaded spreadsheet.
pub const UPLOAD_FIELD_NAME: &str = "excel_file";

/// The state needed for loading contributions from a spreadsheet.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing contributions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An uploaded file.
#[derive(Debug, PartialEq)]
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Route handler for replacing every contribution with the contents of an
/// uploaded `.xlsx` file.
///
/// The old records are only removed once the whole file has been parsed, and
/// the delete and inserts share a single database transaction. On success the
/// client is sent to the page for recording new contributions.
pub async fn import_contributions(
    State(state): State<ImportState>,
    multipart: Multipart,
) -> Response {
    let start_time = std::time::Instant::now();

    match import(state, multipart).await {
        Ok(row_count) => {
            tracing::info!(
                "Imported {row_count} contributions in {}ms",
                start_time.elapsed().as_millis()
            );

            (
                HxRedirect(endpoints::RECORD_NEW_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::debug!("Import failed: {error}");
            error.into_alert_response()
        }
    }
}

async fn import(state: ImportState, multipart: Multipart) -> Result<usize, Error> {
    let upload = validate_upload(find_upload(multipart).await?)?;

    tracing::debug!(
        "Received file '{}' that is {} bytes",
        upload.file_name,
        upload.bytes.len()
    );

    let contributions = read_contributions(&upload.bytes)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    replace_all_contributions(&contributions, &connection)
        .inspect_err(|error| tracing::error!("Failed to replace contributions: {error}"))
}

/// Find the upload field in the form, other fields are skipped.
async fn find_upload(mut multipart: Multipart) -> Result<Option<Upload>, Error> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form field: {error}");
        Error::MultipartError(error.body_text())
    })? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(|error| {
            tracing::error!("Could not read data from multipart form field: {error}");
            Error::MultipartError(error.body_text())
        })?;

        return Ok(Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn validate_upload(upload: Option<Upload>) -> Result<Upload, Error> {
    let upload = match upload {
        Some(upload) if !upload.file_name.is_empty() && !upload.bytes.is_empty() => upload,
        _ => return Err(Error::MissingFile),
    };

    if !has_xlsx_extension(&upload.file_name) {
        return Err(Error::InvalidFileType(upload.file_name));
    }

    Ok(upload)
}

fn has_xlsx_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"))
}
