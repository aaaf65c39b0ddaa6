//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Only text bodies are read. Uploaded files and spreadsheet downloads are
/// passed through untouched and only their headers are logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let body = if has_text_body(&parts.headers) {
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("could not read request body: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        log_request(&parts, Some(&bytes));
        Body::from(bytes)
    } else {
        log_request(&parts, None);
        body
    };

    let response = next.run(Request::from_parts(parts, body)).await;
    let (parts, body) = response.into_parts();

    let body = if has_text_body(&parts.headers) {
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("could not read response body: {error}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        log_response(&parts, Some(&bytes));
        Body::from(bytes)
    } else {
        log_response(&parts, None);
        body
    };

    Response::from_parts(parts, body)
}

/// Whether the content type is one that is worth printing.
///
/// Bodies without a content type, e.g. GET requests and redirects, are
/// treated as text since they are usually empty.
fn has_text_body(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };

    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime == "application/x-www-form-urlencoded"
        || mime == "application/json"
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: Option<&Bytes>) {
    let Some(body) = body else {
        tracing::info!("Received request: {parts:#?}\nbody: <not logged>");
        return;
    };

    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: Option<&Bytes>) {
    let Some(body) = body else {
        tracing::info!("Sending response: {parts:#?}\nbody: <not logged>");
        return;
    };

    let body = String::from_utf8_lossy(body);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}
