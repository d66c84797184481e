use std::{future, ops::RangeInclusive};

use futures_util::Stream;
use image::DynamicImage;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::http_client::response::{
    Response, SUCCESSFUL_AND_REDIRECT_STATUS_CODES, SUCCESSFUL_STATUS_CODES,
};
use crate::response_processor::error::{ProcessingError, ProcessingErrorKind};
use crate::stream::flat_map_latest;

/// Post-processing operators for streams of HTTP responses.
///
/// Every operator replaces each upstream [`Response`] with the outcome of a decode step and
/// keeps the upstream's termination: the first error ends the derived stream.
pub trait ResponseProcessor: Stream<Item = Result<Response, ProcessingError>> + Sized {
    /// Runs `decode` on every response. Errors of the `expected` kind pass through untouched,
    /// any other error becomes the `expected` variant carrying the response.
    fn try_map_response<T, F>(
        self,
        expected: ProcessingErrorKind,
        mut decode: F,
    ) -> impl Stream<Item = Result<T, ProcessingError>>
    where
        F: FnMut(&Response) -> Result<T, ProcessingError>,
    {
        flat_map_latest(self, move |response: Response| {
            let result = decode(&response).map_err(|err| {
                let err = err.normalize(expected, response);
                debug!("Response processing failed: {}", err);
                err
            });
            future::ready(result)
        })
    }

    fn filter_status_codes(
        self,
        range: RangeInclusive<u16>,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> {
        self.try_map_response(ProcessingErrorKind::StatusCode, move |response| {
            response.filter_status_codes(&range)
        })
    }

    fn filter_status_code(
        self,
        code: u16,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> {
        self.filter_status_codes(code..=code)
    }

    fn filter_successful_status_codes(
        self,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> {
        self.filter_status_codes(SUCCESSFUL_STATUS_CODES)
    }

    fn filter_successful_status_and_redirect_codes(
        self,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> {
        self.filter_status_codes(SUCCESSFUL_AND_REDIRECT_STATUS_CODES)
    }

    fn map_image(self) -> impl Stream<Item = Result<DynamicImage, ProcessingError>> {
        self.try_map_response(ProcessingErrorKind::ImageMapping, Response::map_image)
    }

    fn map_json(self) -> impl Stream<Item = Result<Value, ProcessingError>> {
        self.try_map_response(ProcessingErrorKind::JsonMapping, Response::map_json)
    }

    fn map_deserialize<T: DeserializeOwned>(
        self,
    ) -> impl Stream<Item = Result<T, ProcessingError>> {
        self.try_map_response(ProcessingErrorKind::JsonMapping, Response::map_deserialize::<T>)
    }

    fn map_string(self) -> impl Stream<Item = Result<String, ProcessingError>> {
        self.try_map_response(ProcessingErrorKind::StringMapping, Response::map_string)
    }
}

impl<S> ResponseProcessor for S where S: Stream<Item = Result<Response, ProcessingError>> {}
