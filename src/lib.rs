//! Stream operators that filter HTTP responses by status code and decode their bodies as
//! JSON, text or images, surfacing failures as typed errors on the stream.

pub mod http_client;
pub mod request_id;
pub mod response_processor;
pub mod response_provider;
pub mod stream;
