//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, month_filter::ContributorEntry, timezone::get_local_offset};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kampala".
    pub local_timezone: String,

    /// The entries shown on the contributor board.
    pub contributors: Arc<[ContributorEntry]>,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the contribution table.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Africa/Kampala".
    ///
    /// # Errors
    /// Returns an error if `local_timezone` is not a known timezone or the
    /// database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        contributors: Arc<[ContributorEntry]>,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            contributors,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
