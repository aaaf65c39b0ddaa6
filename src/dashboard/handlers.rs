//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::aggregation::{DashboardSummary, summarize},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_ugx, link,
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading contributions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kampala".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the savings totals and this month's contributions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = summarize(today, &connection)?;

    if summary.is_prepared {
        Ok(dashboard_view(&summary).into_response())
    } else {
        Ok(dashboard_not_prepared_view().into_response())
    }
}

fn dashboard_not_prepared_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let upload_link = link(endpoints::PREPARE_DB_VIEW, "uploading a backup");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p id="prepare-prompt"
            {
                "Savings totals will show up here once the records are loaded. "
                "Get started by " (upload_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(summary: &DashboardSummary) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            section class="grid grid-cols-1 md:grid-cols-2 gap-4 w-full max-w-2xl mt-4"
            {
                (summary_card("total-balance", "Total Savings", summary.total_balance))
                (summary_card(
                    "monthly-total",
                    &format!("Saved in {}", summary.current_month_name),
                    summary.monthly_total,
                ))
            }

            div class="flex gap-4 mt-6"
            {
                a href=(endpoints::RECORD_NEW_VIEW) id="record-link" class=(BUTTON_SECONDARY_STYLE)
                {
                    "Record Contribution"
                }

                a href=(endpoints::EXPORT_ALL) id="export-link" class=(BUTTON_SECONDARY_STYLE)
                {
                    "Download Backup"
                }
            }

            section class=(PAGE_CONTAINER_STYLE)
            {
                h3 class="text-xl font-semibold mb-4"
                {
                    (summary.current_month_name) " Contributions"
                }

                (month_table(summary))
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn summary_card(id: &str, title: &str, amount: i64) -> Markup {
    html! {
        div class="p-6 bg-white border border-gray-200 rounded-lg shadow dark:bg-gray-800 dark:border-gray-700"
        {
            p class="mb-2 text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p id=(id) class="text-3xl font-bold tracking-tight" { (format_ugx(amount)) }
        }
    }
}

fn month_table(summary: &DashboardSummary) -> Markup {
    if summary.contributions.is_empty() {
        return html! {
            p id="no-contributions"
            {
                "No contributions have been recorded in "
                (summary.current_month_name) " yet."
            }
        };
    }

    html! {
        div class="relative overflow-x-auto shadow-md sm:rounded-lg w-full max-w-2xl"
        {
            table id="month-contributions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
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
                    @for contribution in &summary.contributions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (contribution.name) }
                            td class=(TABLE_CELL_STYLE) { (format_ugx(contribution.amount)) }
                            td class=(TABLE_CELL_STYLE) { (contribution.date) }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(TABLE_CELL_STYLE) { (format_ugx(summary.monthly_total)) }
                        td class=(TABLE_CELL_STYLE) {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Duration, macros::date};

    use crate::{
        contribution::{Contribution, create_contribution},
        db::initialize,
        endpoints,
        test_utils::{assert_content_type, assert_valid_html, parse_html_document},
        timezone::local_today,
    };

    use super::{DashboardState, get_dashboard_page};

    const TIMEZONE: &str = "Africa/Kampala";

    fn get_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: TIMEZONE.to_owned(),
        }
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn prompts_for_upload_when_not_prepared() {
        let response = get_dashboard_page(State(get_state())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let prompt_link = html
            .select(&Selector::parse("#prepare-prompt a").unwrap())
            .next()
            .expect("No upload link");
        assert_eq!(prompt_link.value().attr("href"), Some(endpoints::PREPARE_DB_VIEW));
        assert!(
            html.select(&Selector::parse("#export-link").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn shows_totals_and_month_listing() {
        let state = get_state();
        let today = local_today(TIMEZONE).unwrap();
        // Far enough back to always be in an earlier month.
        let long_ago = today - Duration::days(400);
        {
            let connection = state.db_connection.lock().unwrap();
            create_contribution(Contribution::build("Alice", 10_000, today), &connection).unwrap();
            create_contribution(Contribution::build("Bob", 5_000, long_ago), &connection).unwrap();
        }

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(text_of(&html, "#total-balance"), "UGX 15,000");
        assert_eq!(text_of(&html, "#monthly-total"), "UGX 10,000");
        let rows = html
            .select(&Selector::parse("#month-contributions tbody tr").unwrap())
            .count();
        assert_eq!(rows, 1);
        let export_link = html
            .select(&Selector::parse("#export-link").unwrap())
            .next()
            .expect("No export link");
        assert_eq!(export_link.value().attr("href"), Some(endpoints::EXPORT_ALL));
    }

    #[tokio::test]
    async fn says_so_when_month_is_empty() {
        let state = get_state();
        create_contribution(
            Contribution::build("Alice", 100, date!(2000 - 01 - 01)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        assert!(text_of(&html, "#no-contributions").starts_with("No contributions"));
        assert_eq!(text_of(&html, "#monthly-total"), "UGX 0");
    }
}
