//! Shared test utilities and fixtures.

use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue},
};
use serde_json::{Value, json};

use crate::transport::{RawResponse, SESSION_ID_HEADER};

pub(crate) fn make_response(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: body.to_string(),
    }
}

pub(crate) fn make_session_required(session_id: &str) -> RawResponse {
    let mut response = make_response(409, "{}");
    response.headers.insert(
        SESSION_ID_HEADER,
        HeaderValue::from_str(session_id).unwrap(),
    );
    response
}

pub(crate) fn make_success(arguments: Value) -> RawResponse {
    make_response(
        200,
        &json!({ "result": "success", "arguments": arguments }).to_string(),
    )
}
