//! The page for recording a single new contribution.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    contribution::{
        Contribution,
        core::{get_recent_contributions, is_prepared},
        form::{ContributionFormData, ContributionFormErrors, contribution_form},
    },
    endpoints,
    html::{
        FORM_CONTAINER_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, currency_input_styles, format_ugx, link,
    },
    navigation::NavBar,
    timezone::local_today,
};

/// How many of the latest entries to show under the form.
const RECENT_CONTRIBUTION_COUNT: u32 = 10;

/// The state needed for the record contribution page.
#[derive(Debug, Clone)]
pub struct RecordPageState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kampala".
    pub local_timezone: String,
    /// The database connection for checking whether the ledger is loaded.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for recording a contribution.
pub async fn get_record_page(State(state): State<RecordPageState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let is_prepared = is_prepared(&connection)?;
    let recent = get_recent_contributions(RECENT_CONTRIBUTION_COUNT, &connection)?;

    Ok(record_view(today, is_prepared, &recent).into_response())
}

fn record_view(today: Date, is_prepared: bool, recent: &[Contribution]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORD_NEW_VIEW).into_html();
    let form = contribution_form(
        &ContributionFormData::default(),
        &ContributionFormErrors::default(),
        today,
        is_prepared,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Record New Contribution" }

            @if !is_prepared {
                div
                    id="not-prepared-warning"
                    class="w-full p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 dark:bg-gray-800 dark:text-yellow-300"
                    role="alert"
                {
                    p
                    {
                        "The savings ledger has not been loaded yet. "
                        (link(endpoints::PREPARE_DB_VIEW, "Upload a backup"))
                        " before recording new contributions."
                    }
                }
            }

            (form)
        }

        @if !recent.is_empty() {
            div class=(PAGE_CONTAINER_STYLE)
            {
                h2 class="text-xl font-semibold mb-2" { "Latest Entries" }

                (recent_table(recent))
            }
        }
    };

    base("Record Contribution", &[currency_input_styles()], &content)
}

fn recent_table(recent: &[Contribution]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-2xl"
        {
            table id="recent-contributions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    }
                }

                tbody
                {
                    @for contribution in recent {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (contribution.name) }
                            td class=(TABLE_CELL_STYLE) { (format_ugx(contribution.amount)) }
                            td class=(TABLE_CELL_STYLE) { (contribution.date) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        contribution::{Contribution, create_contribution, record_page::RecordPageState},
        db::initialize,
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_record_page;

    fn get_state(connection: Connection) -> RecordPageState {
        RecordPageState {
            local_timezone: "Africa/Kampala".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[tokio::test]
    async fn renders_form() {
        let conn = get_test_connection();
        create_contribution(Contribution::build("Alice", 1, date!(2025 - 01 - 01)), &conn)
            .unwrap();

        let response = get_record_page(State(get_state(conn))).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::RECORD_NEW_VIEW, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        let button = html
            .select(&Selector::parse("#submit-button").unwrap())
            .next()
            .expect("No submit button");
        assert_eq!(button.value().attr("disabled"), None);
        assert!(
            html.select(&Selector::parse("#not-prepared-warning").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn warns_and_disables_submit_when_not_prepared() {
        let response = get_record_page(State(get_state(get_test_connection())))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let warning = html
            .select(&Selector::parse("#not-prepared-warning a").unwrap())
            .next()
            .expect("No link in warning");
        assert_eq!(warning.value().attr("href"), Some(endpoints::PREPARE_DB_VIEW));
        let button = html
            .select(&Selector::parse("#submit-button").unwrap())
            .next()
            .expect("No submit button");
        assert!(button.value().attr("disabled").is_some());
    }

    #[tokio::test]
    async fn lists_latest_entries() {
        let conn = get_test_connection();
        create_contribution(Contribution::build("Alice", 10_000, date!(2025 - 01 - 01)), &conn)
            .unwrap();
        create_contribution(Contribution::build("Bob", 2_500, date!(2025 - 01 - 02)), &conn)
            .unwrap();

        let response = get_record_page(State(get_state(conn))).await.unwrap();

        let html = parse_html_document(response).await;
        let rows: Vec<String> = html
            .select(&Selector::parse("#recent-contributions tbody tr").unwrap())
            .map(|row| row.text().collect::<Vec<_>>().join("|"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("Bob"), "want newest first, got {rows:?}");
        assert!(rows[0].contains("UGX 2,500"));
    }
}
