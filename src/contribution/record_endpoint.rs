//! Defines the endpoint for recording a new contribution.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    contribution::{
        core::{create_contribution, is_prepared},
        form::{ContributionFormData, contribution_form},
    },
    endpoints,
    timezone::local_today,
};

/// The state needed to record a contribution.
#[derive(Debug, Clone)]
pub struct RecordContributionState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kampala".
    pub local_timezone: String,
    /// The database connection for storing contributions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecordContributionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for recording a single contribution.
///
/// Redirects to the upload page if the ledger has not been loaded, shows the
/// form again with messages if a field is invalid, and otherwise redirects
/// back to the blank form.
pub async fn record_contribution_endpoint(
    State(state): State<RecordContributionState>,
    Form(form): Form<ContributionFormData>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match is_prepared(&connection) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Tried to record a contribution before the ledger was loaded");
            return (
                HxRedirect(endpoints::PREPARE_DB_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response();
        }
        Err(error) => return error.into_alert_response(),
    }

    let contribution = match form.validate(today) {
        Ok(contribution) => contribution,
        Err(errors) => {
            return contribution_form(&form, &errors, today, true).into_response();
        }
    };

    match create_contribution(contribution, &connection) {
        Ok(contribution) => {
            tracing::info!("Recorded contribution {contribution}");

            (
                HxRedirect(endpoints::RECORD_NEW_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while recording a contribution: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        contribution::{
            Contribution, count_contributions, create_contribution, get_all_contributions,
            form::ContributionFormData,
        },
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_redirect, assert_valid_html, get_header,
            must_get_form, parse_html_fragment,
        },
    };

    use super::{RecordContributionState, record_contribution_endpoint};

    fn get_state(connection: Connection) -> RecordContributionState {
        RecordContributionState {
            local_timezone: "Africa/Kampala".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_prepared_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_contribution(Contribution::build("Alice", 100, date!(2025 - 01 - 01)), &conn)
            .unwrap();
        conn
    }

    fn form(name: &str, amount: &str, date: &str) -> ContributionFormData {
        ContributionFormData {
            name: name.to_owned(),
            amount: amount.to_owned(),
            date: date.to_owned(),
        }
    }

    #[tokio::test]
    async fn records_contribution() {
        let state = get_state(get_prepared_connection());

        let response = record_contribution_endpoint(
            State(state.clone()),
            Form(form("Bob", "2500", "2025-02-03")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::RECORD_NEW_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let got = get_all_contributions(&connection).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].name, "Bob");
        assert_eq!(got[1].amount, 2_500);
        assert_eq!(got[1].date, date!(2025 - 02 - 03));
    }

    #[tokio::test]
    async fn redirects_to_upload_when_not_prepared() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = get_state(conn);

        let response = record_contribution_endpoint(
            State(state.clone()),
            Form(form("Bob", "2500", "2025-02-03")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PREPARE_DB_VIEW);
        assert_eq!(
            count_contributions(&state.db_connection.lock().unwrap()),
            Ok(0)
        );
    }

    #[tokio::test]
    async fn invalid_form_is_rendered_again_with_values() {
        let state = get_state(get_prepared_connection());

        let response =
            record_contribution_endpoint(State(state.clone()), Form(form("Bob", "lots", "")))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "name", "text", "Bob");
        assert_form_input_with_value(&form, "amount", "number", "lots");
        let amount_error = form
            .select(&Selector::parse("#amount-error").unwrap())
            .next()
            .expect("No amount error")
            .text()
            .collect::<String>();
        assert_eq!(amount_error, "\"lots\" is not a whole number of shillings.");
        assert!(
            form.select(&Selector::parse("#name-error").unwrap())
                .next()
                .is_none()
        );
        assert_eq!(
            count_contributions(&state.db_connection.lock().unwrap()),
            Ok(1)
        );
    }

    #[tokio::test]
    async fn duplicates_are_allowed() {
        let state = get_state(get_prepared_connection());

        for _ in 0..2 {
            let response = record_contribution_endpoint(
                State(state.clone()),
                Form(form("Alice", "100", "2025-01-01")),
            )
            .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }

        assert_eq!(
            count_contributions(&state.db_connection.lock().unwrap()),
            Ok(3)
        );
    }
}
