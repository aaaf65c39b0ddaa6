//! Loading the savings ledger from an `.xlsx` backup.
//!
//! Uploading a file replaces every stored contribution with the rows in the
//! file, or changes nothing if any row is invalid.

mod import_endpoint;
mod upload_page;

pub use import_endpoint::import_contributions;
pub use upload_page::get_upload_page;
