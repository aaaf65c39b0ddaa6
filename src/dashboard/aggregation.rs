//! Totals and listings shown on the dashboard.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    contribution::{Contribution, get_contributions_in_month, is_prepared, sum_contributions},
};

/// Everything the dashboard shows, computed for a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// The sum of every contribution ever made.
    pub total_balance: i64,
    /// The English name of the current month, e.g. "January".
    pub current_month_name: String,
    /// This month's contributions, newest first with ties broken by name.
    pub contributions: Vec<Contribution>,
    /// The sum of this month's contributions.
    pub monthly_total: i64,
    /// Whether the ledger has been loaded.
    pub is_prepared: bool,
}

/// Compute the dashboard figures as of `today`.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the queries fail.
pub fn summarize(today: Date, connection: &Connection) -> Result<DashboardSummary, Error> {
    let total_balance = sum_contributions(connection)
        .inspect_err(|error| tracing::error!("could not sum contributions: {error}"))?;

    let contributions = get_contributions_in_month(today, connection).inspect_err(|error| {
        tracing::error!("could not get contributions for {}: {error}", today.month())
    })?;

    let monthly_total = contributions
        .iter()
        .map(|contribution| contribution.amount)
        .sum();

    let is_prepared = is_prepared(connection)?;

    Ok(DashboardSummary {
        total_balance,
        current_month_name: today.month().to_string(),
        contributions,
        monthly_total,
        is_prepared,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        contribution::{Contribution, create_contribution},
        db::initialize,
    };

    use super::summarize;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn empty_store() {
        let conn = get_test_connection();

        let got = summarize(date!(2025 - 03 - 15), &conn).unwrap();

        assert_eq!(got.total_balance, 0);
        assert_eq!(got.monthly_total, 0);
        assert!(got.contributions.is_empty());
        assert!(!got.is_prepared);
        assert_eq!(got.current_month_name, "March");
    }

    #[test]
    fn monthly_total_only_counts_current_month() {
        let conn = get_test_connection();
        for (name, amount, date) in [
            ("Alice", 100, date!(2025 - 03 - 01)),
            ("Bob", 250, date!(2025 - 03 - 15)),
            ("Carol", 1_000, date!(2025 - 02 - 28)),
            ("Dan", 5_000, date!(2024 - 03 - 10)),
        ] {
            create_contribution(Contribution::build(name, amount, date), &conn).unwrap();
        }

        let got = summarize(date!(2025 - 03 - 20), &conn).unwrap();

        assert_eq!(got.total_balance, 6_350);
        assert_eq!(got.monthly_total, 350);
        let names: Vec<&str> = got.contributions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);
        assert!(got.is_prepared);
    }

    #[test]
    fn prepared_with_nothing_this_month() {
        let conn = get_test_connection();
        create_contribution(Contribution::build("Alice", 100, date!(2024 - 12 - 31)), &conn)
            .unwrap();

        let got = summarize(date!(2025 - 01 - 01), &conn).unwrap();

        assert!(got.is_prepared);
        assert_eq!(got.total_balance, 100);
        assert_eq!(got.monthly_total, 0);
        assert_eq!(got.current_month_name, "January");
    }
}
