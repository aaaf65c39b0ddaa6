//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The import form was submitted without a file attached.
    #[error("no file was uploaded")]
    MissingFile,

    /// The uploaded file does not have the `.xlsx` extension.
    ///
    /// Callers should pass in the name of the uploaded file.
    #[error("\"{0}\" is not an .xlsx file")]
    InvalidFileType(String),

    /// The uploaded spreadsheet could not be turned into contributions, e.g.
    /// a column is missing or a cell holds a value of the wrong type.
    ///
    /// The string holds the details of the problem and is safe to show to
    /// the user.
    #[error("could not parse the spreadsheet: {0}")]
    InvalidSpreadsheet(String),

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// A request was missing a required value or the value was malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The contributions could not be written to a spreadsheet.
    #[error("could not export contributions: {0}")]
    ExportError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        tracing::error!("could not write spreadsheet: {value}");
        Error::ExportError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::ExportError(_) => InternalServerError {
                description: "Export Failed",
                fix: "The spreadsheet could not be created. Please try again.",
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingFile => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No file uploaded.".to_owned(),
                    details: "Choose an .xlsx backup file before uploading.".to_owned(),
                },
            ),
            Error::InvalidFileType(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid file type. Please upload an .xlsx file.".to_owned(),
                    details: format!("\"{file_name}\" is not an .xlsx file."),
                },
            ),
            Error::InvalidSpreadsheet(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Error processing file".to_owned(),
                    details: format!(
                        "Ensure columns are 'name', 'amount', 'date'. Details: {details}"
                    ),
                },
            ),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the upload".to_owned(),
                    details: "The form data was incomplete, please try uploading the file again."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        Error,
        test_utils::{assert_content_type, assert_valid_html, parse_html_fragment},
    };

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn user_errors_are_bad_requests() {
        let cases = [
            Error::MissingFile,
            Error::InvalidFileType("backup.csv".to_owned()),
            Error::InvalidSpreadsheet("missing column 'date'".to_owned()),
            Error::MultipartError("stream ended early".to_owned()),
        ];

        for error in cases {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_content_type(&response, "text/html; charset=utf-8");
            let html = parse_html_fragment(response).await;
            assert_valid_html(&html);
        }
    }

    #[tokio::test]
    async fn storage_errors_are_internal_server_errors() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
