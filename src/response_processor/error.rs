use crate::http_client::{error::Error as HttpClientError, response::Response};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessingError {
    #[error("Status code {} is outside the accepted range", .0.status)]
    StatusCode(Response),

    #[error("Failed to map response body of {} bytes to JSON", .0.body.len())]
    JsonMapping(Response),

    #[error("Failed to map response body of {} bytes to a string", .0.body.len())]
    StringMapping(Response),

    #[error("Failed to map response body of {} bytes to an image", .0.body.len())]
    ImageMapping(Response),

    #[error("Request failed: {0}")]
    Underlying(#[from] HttpClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingErrorKind {
    StatusCode,
    JsonMapping,
    StringMapping,
    ImageMapping,
}

impl ProcessingErrorKind {
    pub fn into_error(self, response: Response) -> ProcessingError {
        match self {
            ProcessingErrorKind::StatusCode => ProcessingError::StatusCode(response),
            ProcessingErrorKind::JsonMapping => ProcessingError::JsonMapping(response),
            ProcessingErrorKind::StringMapping => ProcessingError::StringMapping(response),
            ProcessingErrorKind::ImageMapping => ProcessingError::ImageMapping(response),
        }
    }
}

impl ProcessingError {
    /// The operator error kind, `None` for transport failures.
    pub fn kind(&self) -> Option<ProcessingErrorKind> {
        match self {
            ProcessingError::StatusCode(_) => Some(ProcessingErrorKind::StatusCode),
            ProcessingError::JsonMapping(_) => Some(ProcessingErrorKind::JsonMapping),
            ProcessingError::StringMapping(_) => Some(ProcessingErrorKind::StringMapping),
            ProcessingError::ImageMapping(_) => Some(ProcessingErrorKind::ImageMapping),
            ProcessingError::Underlying(_) => None,
        }
    }

    /// The response that triggered the error, if one was received.
    pub fn response(&self) -> Option<&Response> {
        match self {
            ProcessingError::StatusCode(response)
            | ProcessingError::JsonMapping(response)
            | ProcessingError::StringMapping(response)
            | ProcessingError::ImageMapping(response) => Some(response),
            ProcessingError::Underlying(_) => None,
        }
    }

    /// Keeps the error when it already is of `expected` kind, otherwise replaces it with the
    /// `expected` variant carrying `response`.
    pub fn normalize(self, expected: ProcessingErrorKind, response: Response) -> ProcessingError {
        if self.kind() == Some(expected) {
            self
        } else {
            expected.into_error(response)
        }
    }
}
