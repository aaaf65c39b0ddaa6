//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    contribution::{get_record_page, record_contribution_endpoint},
    dashboard::get_dashboard_page,
    endpoints,
    export::export_all_contributions,
    import::{get_upload_page, import_contributions},
    internal_server_error::get_internal_server_error_page,
    month_filter::{record_amount, sort_by_month},
    not_found::get_404_not_found,
};

/// The largest spreadsheet upload that will be accepted, in bytes.
const UPLOAD_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::RECORD_NEW_VIEW,
            get(get_record_page).post(record_contribution_endpoint),
        )
        .route(endpoints::EXPORT_ALL, get(export_all_contributions))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let upload_routes = Router::new()
        .route(
            endpoints::PREPARE_DB_VIEW,
            get(get_upload_page).post(import_contributions),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_SIZE_LIMIT));

    let json_routes = Router::new()
        .route(endpoints::SORT_BY_MONTH, post(sort_by_month))
        .route(endpoints::RECORD_AMOUNT, post(record_amount));

    page_routes
        .merge(upload_routes)
        .merge(json_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
