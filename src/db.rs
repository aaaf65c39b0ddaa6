//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, contribution::create_contribution_table};

/// Create the application's tables if they do not exist yet.
///
/// All tables are created in a single transaction, so a failure leaves the
/// database untouched.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_contribution_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
