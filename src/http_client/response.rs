use std::ops::RangeInclusive;

use bytes::Bytes;
use image::DynamicImage;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::http_client::request::RequestHeaders;
use crate::response_processor::error::ProcessingError;

pub const SUCCESSFUL_STATUS_CODES: RangeInclusive<u16> = 200..=299;
pub const SUCCESSFUL_AND_REDIRECT_STATUS_CODES: RangeInclusive<u16> = 200..=399;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: RequestHeaders,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Response {
            status,
            headers: RequestHeaders::default(),
            body: body.into(),
        }
    }

    /// Returns a copy of the response when its status lies in `range`, both ends included.
    pub fn filter_status_codes(
        &self,
        range: &RangeInclusive<u16>,
    ) -> Result<Response, ProcessingError> {
        if range.contains(&self.status) {
            Ok(self.clone())
        } else {
            debug!(
                "Status {} is outside {}..={}",
                self.status,
                range.start(),
                range.end()
            );
            Err(ProcessingError::StatusCode(self.clone()))
        }
    }

    pub fn filter_status_code(&self, code: u16) -> Result<Response, ProcessingError> {
        self.filter_status_codes(&(code..=code))
    }

    pub fn filter_successful_status_codes(&self) -> Result<Response, ProcessingError> {
        self.filter_status_codes(&SUCCESSFUL_STATUS_CODES)
    }

    pub fn filter_successful_status_and_redirect_codes(
        &self,
    ) -> Result<Response, ProcessingError> {
        self.filter_status_codes(&SUCCESSFUL_AND_REDIRECT_STATUS_CODES)
    }

    pub fn map_image(&self) -> Result<DynamicImage, ProcessingError> {
        image::load_from_memory(&self.body).map_err(|err| {
            debug!("Body of {} bytes is not an image: {}", self.body.len(), err);
            ProcessingError::ImageMapping(self.clone())
        })
    }

    /// Parses the body into an untyped JSON value. Scalars at the top level are accepted.
    pub fn map_json(&self) -> Result<Value, ProcessingError> {
        self.map_deserialize()
    }

    pub fn map_deserialize<T: DeserializeOwned>(&self) -> Result<T, ProcessingError> {
        serde_json::from_slice(&self.body).map_err(|err| {
            debug!("Body of {} bytes is not valid JSON: {}", self.body.len(), err);
            ProcessingError::JsonMapping(self.clone())
        })
    }

    pub fn map_string(&self) -> Result<String, ProcessingError> {
        std::str::from_utf8(&self.body)
            .map(str::to_owned)
            .map_err(|err| {
                debug!("Body is not valid UTF-8: {}", err);
                ProcessingError::StringMapping(self.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{GenericImageView, ImageFormat, RgbImage};
    use serde::Deserialize;
    use serde_json::json;

    use crate::http_client::response::Response;
    use crate::response_processor::error::ProcessingError;

    fn png_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(3, 2)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn keeps_responses_inside_a_closed_range() {
        for status in [200, 250, 299] {
            let response = Response::new(status, "");
            assert_eq!(response.filter_status_codes(&(200..=299)).unwrap(), response);
        }
    }

    #[test]
    fn rejects_responses_outside_the_range() {
        for status in [100, 199, 300, 404, 500] {
            let response = Response::new(status, "");
            let err = response.filter_status_codes(&(200..=299)).unwrap_err();
            assert_eq!(err, ProcessingError::StatusCode(response));
        }
    }

    #[test]
    fn filters_a_single_status_code() {
        assert!(Response::new(201, "").filter_status_code(201).is_ok());
        assert!(Response::new(200, "").filter_status_code(201).is_err());
        assert!(Response::new(202, "").filter_status_code(201).is_err());
    }

    #[test]
    fn accepts_redirects_only_when_asked_to() {
        let redirect = Response::new(302, "");

        assert!(redirect.filter_successful_status_codes().is_err());
        assert!(redirect.filter_successful_status_and_redirect_codes().is_ok());
        assert!(
            Response::new(400, "")
                .filter_successful_status_and_redirect_codes()
                .is_err()
        );
    }

    #[test]
    fn maps_a_json_body() {
        let response = Response::new(200, r#"{"a":1}"#);
        assert_eq!(response.map_json().unwrap(), json!({"a": 1}));
    }

    #[test]
    fn maps_top_level_json_scalars() {
        assert_eq!(Response::new(200, "42").map_json().unwrap(), json!(42));
        assert_eq!(Response::new(200, "null").map_json().unwrap(), json!(null));
    }

    #[test]
    fn fails_to_map_invalid_json() {
        let response = Response::new(200, "not json");
        assert_eq!(
            response.map_json().unwrap_err(),
            ProcessingError::JsonMapping(response)
        );
    }

    #[test]
    fn fails_to_map_an_empty_body_as_json() {
        let response = Response::new(204, "");
        assert!(matches!(
            response.map_json(),
            Err(ProcessingError::JsonMapping(_))
        ));
    }

    #[test]
    fn deserializes_into_typed_values() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            name: String,
        }

        let response = Response::new(200, r#"{"name":"ada"}"#);
        assert_eq!(
            response.map_deserialize::<User>().unwrap(),
            User {
                name: "ada".to_string()
            }
        );

        let response = Response::new(200, r#"{"id":1}"#);
        assert_eq!(
            response.map_deserialize::<User>().unwrap_err(),
            ProcessingError::JsonMapping(response)
        );
    }

    #[test]
    fn maps_a_text_body() {
        assert_eq!(
            Response::new(200, "héllo").map_string().unwrap(),
            "héllo".to_string()
        );
    }

    #[test]
    fn maps_an_empty_body_to_an_empty_string() {
        assert_eq!(Response::new(200, "").map_string().unwrap(), "");
    }

    #[test]
    fn fails_to_map_invalid_utf8() {
        let response = Response::new(200, vec![0xFF, 0xFE, 0xFD]);
        assert_eq!(
            response.map_string().unwrap_err(),
            ProcessingError::StringMapping(response)
        );
    }

    #[test]
    fn maps_an_image_body() {
        let image = Response::new(200, png_bytes()).map_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn fails_to_map_a_non_image_body() {
        let response = Response::new(200, "definitely not a png");
        assert_eq!(
            response.map_image().unwrap_err(),
            ProcessingError::ImageMapping(response)
        );
    }

    #[test]
    fn fails_to_map_an_empty_body_as_an_image() {
        let response = Response::new(200, "");
        assert_eq!(
            response.map_image().unwrap_err(),
            ProcessingError::ImageMapping(response)
        );
    }
}
