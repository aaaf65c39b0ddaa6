//! Contribution management for the savings ledger.
//!
//! This module contains everything related to contributions:
//! - The `Contribution` model and `NewContribution` for creating contributions
//! - Database functions for storing, querying, and replacing contributions
//! - The page and endpoint for recording a single contribution

mod core;
mod form;
mod record_endpoint;
mod record_page;

pub use core::{
    Contribution, NewContribution, create_contribution, create_contribution_table,
    get_contributions_for_export, get_contributions_in_month, is_prepared,
    replace_all_contributions, sum_contributions,
};
pub use record_endpoint::record_contribution_endpoint;
pub use record_page::get_record_page;

#[cfg(test)]
pub use core::{count_contributions, get_all_contributions};
