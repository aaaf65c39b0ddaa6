use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{Request, header::CONTENT_TYPE},
};

const BOUNDARY: &str = "----family-savings-test-boundary";

/// A single part of a multipart form.
pub(crate) struct FormPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub bytes: &'a [u8],
}

/// Encode `parts` as a `multipart/form-data` request body.
pub(crate) fn must_make_multipart_request(parts: &[FormPart<'_>]) -> Request<Body> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());

        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }

        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Could not build multipart request")
}

/// Build the multipart extractor for a form holding one file under `excel_file`.
pub(crate) async fn must_make_upload(file_name: &str, bytes: &[u8]) -> Multipart {
    let request = must_make_multipart_request(&[FormPart {
        name: "excel_file",
        file_name: Some(file_name),
        bytes,
    }]);

    must_extract_multipart(request).await
}

pub(crate) async fn must_extract_multipart(request: Request<Body>) -> Multipart {
    Multipart::from_request(request, &())
        .await
        .expect("Could not extract multipart form")
}
