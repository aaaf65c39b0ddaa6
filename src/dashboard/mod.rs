//! Dashboard module
//!
//! Provides an overview page with the savings total and this month's
//! contributions.

mod aggregation;
mod handlers;

pub use handlers::get_dashboard_page;
