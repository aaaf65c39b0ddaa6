//! The API endpoints URIs.

/// The landing page showing the savings totals.
pub const DASHBOARD_VIEW: &str = "/";
/// The page for loading contributions from a spreadsheet backup.
pub const PREPARE_DB_VIEW: &str = "/prepare-db/";
/// The page for recording a new contribution.
pub const RECORD_NEW_VIEW: &str = "/record-new/";
/// The route for downloading every contribution as a spreadsheet.
pub const EXPORT_ALL: &str = "/export-all/";
/// The route for filtering the contributor board by month.
pub const SORT_BY_MONTH: &str = "/sort_by_month/";
/// The route that echoes a submitted amount back as JSON.
pub const RECORD_AMOUNT: &str = "/record_amount/";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
