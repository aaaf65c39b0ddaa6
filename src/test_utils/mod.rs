#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod multipart;
pub(crate) mod workbook;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_status_ok, get_header, must_get_json,
};
pub(crate) use multipart::{
    FormPart, must_extract_multipart, must_make_multipart_request, must_make_upload,
};
pub(crate) use workbook::{Cell, must_make_xlsx};
