pub mod error;
#[allow(clippy::module_inception)]
pub mod response_processor;

pub use error::{ProcessingError, ProcessingErrorKind};
pub use response_processor::ResponseProcessor;
