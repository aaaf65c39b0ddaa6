//! JSON endpoints for the illustrative contributor board.
//!
//! The board is a fixed list of entries held in [AppState] rather than the
//! contribution table, and can be filtered by month.

use std::{str::FromStr, sync::Arc};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, Error};

/// One entry on the contributor board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorEntry {
    /// The contributor's display name.
    pub name: String,
    /// The amount as display text, e.g. "10,000".
    pub amount: String,
    /// The ISO date of the contribution, e.g. "2025-08-05".
    pub time: String,
    /// The CSS class for the contributor's rank badge.
    pub color: String,
}

impl ContributorEntry {
    fn new(name: &str, amount: &str, time: &str, color: &str) -> Self {
        Self {
            name: name.to_owned(),
            amount: amount.to_owned(),
            time: time.to_owned(),
            color: color.to_owned(),
        }
    }

    /// The two digit month of the entry's date, e.g. "08".
    fn month(&self) -> Option<&str> {
        self.time.split('-').nth(1)
    }
}

/// The entries shown on the board when no other list is configured.
pub fn sample_contributors() -> Arc<[ContributorEntry]> {
    Arc::from(vec![
        ContributorEntry::new("Opio Daniel", "10,000", "2025-07-05", "rank-gold"),
        ContributorEntry::new("Aryono innocent", "10,000", "2025-07-07", "rank-silver"),
        ContributorEntry::new("Ekwang Oscar", "10,000", "2025-08-05", "rank-bronze"),
        ContributorEntry::new("Ogwal Walter", "10,000", "2025-08-09", "rank-gold"),
        ContributorEntry::new("Aryono Jimmy", "10,000", "2025-09-05", "rank-silver"),
    ])
}

/// Which entries to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthSelection {
    All,
    /// A calendar month from 1 to 12.
    Month(u8),
}

impl FromStr for MonthSelection {
    type Err = Error;

    /// Parse "all" or a two digit month from "01" to "12".
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token == "all" {
            return Ok(Self::All);
        }

        let is_two_digits = token.len() == 2 && token.bytes().all(|byte| byte.is_ascii_digit());

        match token.parse::<u8>() {
            Ok(month @ 1..=12) if is_two_digits => Ok(Self::Month(month)),
            _ => Err(Error::InvalidRequest(format!(
                "selected_date must be \"all\" or a month from \"01\" to \"12\", got {token:?}"
            ))),
        }
    }
}

/// Keep the entries whose date falls in the selected month, in their original
/// order. An empty result is not an error.
pub fn filter_by_month(
    entries: &[ContributorEntry],
    selection: MonthSelection,
) -> Vec<ContributorEntry> {
    match selection {
        MonthSelection::All => entries.to_vec(),
        MonthSelection::Month(month) => {
            let token = format!("{month:02}");

            entries
                .iter()
                .filter(|entry| entry.month() == Some(token.as_str()))
                .cloned()
                .collect()
        }
    }
}

/// The state needed for filtering the contributor board.
#[derive(Debug, Clone)]
pub struct MonthFilterState {
    pub contributors: Arc<[ContributorEntry]>,
}

impl FromRef<AppState> for MonthFilterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            contributors: state.contributors.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthFilterForm {
    pub selected_date: Option<String>,
}

/// Route handler that returns the board entries for the selected month as
/// `{"contributors": [...]}`.
///
/// Responds with 400 and `{"error": "..."}` if `selected_date` is missing or
/// malformed.
pub async fn sort_by_month(
    State(state): State<MonthFilterState>,
    Form(form): Form<MonthFilterForm>,
) -> Response {
    let selection = form
        .selected_date
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::InvalidRequest("selected_date is required".to_owned()))
        .and_then(MonthSelection::from_str);

    match selection {
        Ok(selection) => {
            let contributors = filter_by_month(&state.contributors, selection);
            Json(json!({ "contributors": contributors })).into_response()
        }
        Err(error) => {
            tracing::debug!("Rejected month filter request: {error}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

/// The fields echoed back by [record_amount], `None` when not submitted.
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AmountEcho {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

/// Route handler that echoes the submitted `name`, `amount` and `date` as JSON
/// without saving anything.
pub async fn record_amount(Form(form): Form<AmountEcho>) -> Json<AmountEcho> {
    Json(form)
}
