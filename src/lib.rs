//! Family Savings is a web app for tracking the contributions members make to
//! a shared savings pot.
//!
//! Historical records are loaded from an `.xlsx` backup, new contributions are
//! recorded one at a time, and the whole ledger can be downloaded again as a
//! spreadsheet with a running balance.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod contribution;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod export;
mod html;
mod import;
mod internal_server_error;
mod logging;
mod month_filter;
mod navigation;
mod not_found;
mod routing;
mod spreadsheet;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use contribution::{Contribution, NewContribution, create_contribution};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month_filter::{ContributorEntry, sample_contributors};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
