use http::HeaderName;
use uuid::Uuid;

use crate::http_client::request::Request;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Stamps `request` with a fresh `x-request-id` unless the caller already set one.
pub fn with_request_id(mut request: Request) -> Request {
    if request.headers.get(X_REQUEST_ID.as_str()).is_none() {
        request
            .headers
            .insert(X_REQUEST_ID.to_string(), new_request_id());
    }
    request
}
