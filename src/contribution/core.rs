//! Defines the core data model and database queries for contributions.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{Error, database_id::DatabaseId, html::format_ugx};

// ============================================================================
// MODELS
// ============================================================================

/// Money a member paid into the shared savings pot on a given day.
///
/// To create a new `Contribution`, use [Contribution::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// The ID of the contribution, also its position in insertion order.
    pub id: DatabaseId,
    /// The name of the member who paid.
    pub name: String,
    /// The amount paid in whole Ugandan shillings.
    pub amount: i64,
    /// The day the contribution was made.
    pub date: Date,
}

impl Contribution {
    /// Create a new contribution that has not been saved yet.
    ///
    /// Shortcut for [NewContribution] for discoverability.
    pub fn build(name: &str, amount: i64, date: Date) -> NewContribution {
        NewContribution {
            name: name.to_owned(),
            amount,
            date,
        }
    }
}

impl Display for Contribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} on {}",
            self.name,
            format_ugx(self.amount),
            self.date
        )
    }
}

/// The data for a contribution before it is given an ID by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContribution {
    /// The name of the member who paid.
    pub name: String,
    /// The amount paid in whole Ugandan shillings.
    pub amount: i64,
    /// The day the contribution was made.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Add a single contribution to the end of the ledger.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_contribution(
    contribution: NewContribution,
    connection: &Connection,
) -> Result<Contribution, Error> {
    let contribution = connection
        .prepare(
            "INSERT INTO contribution (name, amount, date)
             VALUES (?1, ?2, ?3)
             RETURNING id, name, amount, date",
        )?
        .query_row(
            (contribution.name, contribution.amount, contribution.date),
            map_contribution_row,
        )?;

    Ok(contribution)
}

/// Delete every contribution and insert `contributions` in their place.
///
/// The delete and the inserts happen in one transaction, if any insert fails
/// the ledger is left exactly as it was.
///
/// Returns the number of contributions inserted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn replace_all_contributions(
    contributions: &[NewContribution],
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute("DELETE FROM contribution", ())?;

    {
        let mut statement =
            transaction.prepare("INSERT INTO contribution (name, amount, date) VALUES (?1, ?2, ?3)")?;

        for contribution in contributions {
            statement.execute((&contribution.name, contribution.amount, contribution.date))?;
        }
    }

    transaction.commit()?;

    Ok(contributions.len())
}

/// Get the total number of contributions in the database.
#[cfg(test)]
pub fn count_contributions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM contribution", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Whether the ledger has been loaded, i.e. holds at least one contribution.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn is_prepared(connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row("SELECT EXISTS(SELECT 1 FROM contribution)", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// The sum of every contribution ever made, zero for an empty ledger.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn sum_contributions(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COALESCE(SUM(amount), 0) FROM contribution", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Get the contributions made in the same calendar month as `date`, newest
/// first, ties broken by name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_contributions_in_month(
    date: Date,
    connection: &Connection,
) -> Result<Vec<Contribution>, Error> {
    let (start, end) = month_bounds(date);

    connection
        .prepare(
            "SELECT id, name, amount, date FROM contribution
             WHERE date >= :start AND date < :end
             ORDER BY date DESC, name ASC",
        )?
        .query_map(
            rusqlite::named_params! {":start": start, ":end": end},
            map_contribution_row,
        )?
        .map(|maybe_contribution| maybe_contribution.map_err(Error::from))
        .collect()
}

/// Get every contribution in the order they should appear in a backup,
/// oldest first with insertion order breaking ties.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_contributions_for_export(connection: &Connection) -> Result<Vec<Contribution>, Error> {
    connection
        .prepare("SELECT id, name, amount, date FROM contribution ORDER BY date ASC, id ASC")?
        .query_map([], map_contribution_row)?
        .map(|maybe_contribution| maybe_contribution.map_err(Error::from))
        .collect()
}

/// Get the `limit` most recently dated contributions, latest entries first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_recent_contributions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Contribution>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, date FROM contribution
             ORDER BY date DESC, id DESC
             LIMIT :limit",
        )?
        .query_map(rusqlite::named_params! {":limit": limit}, map_contribution_row)?
        .map(|maybe_contribution| maybe_contribution.map_err(Error::from))
        .collect()
}

/// Get every contribution ordered by date and then name.
#[cfg(test)]
pub fn get_all_contributions(connection: &Connection) -> Result<Vec<Contribution>, Error> {
    connection
        .prepare("SELECT id, name, amount, date FROM contribution ORDER BY date ASC, name ASC")?
        .query_map([], map_contribution_row)?
        .map(|maybe_contribution| maybe_contribution.map_err(Error::from))
        .collect()
}

/// Create the contribution table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_contribution_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS contribution (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (name <> ''),
                amount INTEGER NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Dashboard and export both scan by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_contribution_date ON contribution(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Contribution.
fn map_contribution_row(row: &Row) -> Result<Contribution, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;

    Ok(Contribution {
        id,
        name,
        amount,
        date,
    })
}

/// The first day of the month containing `date` and the first day of the
/// month after it.
fn month_bounds(date: Date) -> (Date, Date) {
    let start = first_of_month(date);
    // 31 days after the 1st always lands in the following month.
    let end = first_of_month(start + Duration::days(31));

    (start, end)
}

fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

// ============================================================================
// TESTS
// ============================================================================
