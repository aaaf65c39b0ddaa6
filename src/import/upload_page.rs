//! The page for uploading an `.xlsx` backup of the savings ledger.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    contribution::is_prepared,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner},
    navigation::NavBar,
};

/// The state needed to show whether the ledger has already been loaded.
#[derive(Debug, Clone)]
pub struct UploadPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UploadPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn upload_form_view() -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::PREPARE_DB_VIEW)
            enctype="multipart/form-data"
            hx-disabled-elt="#excel_file, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="excel_file"
                    class="block mb-2 text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Choose a backup file to upload"
                }

                input
                    id="excel_file"
                    type="file"
                    name="excel_file"
                    accept=".xlsx"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-2 text-sm"
                {
                    "The first sheet must have the columns 'name', 'amount' and 'date'. "
                    "Backups downloaded from this app can be uploaded as they are."
                }
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (spinner) }
                " Upload Backup"
            }
        }
    }
}

fn upload_view(is_prepared: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::PREPARE_DB_VIEW).into_html();
    let form = upload_form_view();

    let content = html! {
        (nav_bar)

        div
            class="flex flex-col items-center px-6 py-8 mx-auto lg:py-0
            text-gray-900 dark:text-white max-w-md"
        {
            h1 class="text-2xl font-bold mb-4" { "Load Savings Records" }

            @if is_prepared {
                div
                    id="prepared-banner"
                    class="w-full p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 dark:bg-gray-800 dark:text-yellow-300"
                    role="alert"
                {
                    "Records are already loaded. Uploading a file replaces every existing record."
                }
            } @else {
                div
                    id="not-prepared-banner"
                    class="w-full p-4 mb-4 text-sm text-blue-800 rounded-lg bg-blue-50 dark:bg-gray-800 dark:text-blue-400"
                    role="alert"
                {
                    "No records have been loaded yet. Upload a backup to get started."
                }
            }

            div class="relative w-full"
            {
                (form)
            }
        }
    };

    base("Load Records", &[], &content)
}

/// Route handler for the upload page.
pub async fn get_upload_page(State(state): State<UploadPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let is_prepared = is_prepared(&connection)?;

    Ok(upload_view(is_prepared).into_response())
}
