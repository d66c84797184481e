use std::sync::Arc;

use futures_util::{Stream, StreamExt, stream};
use tracing::{info, warn};

use crate::http_client::{http_client::HttpClient, request::Request, response::Response};
use crate::request_id::{X_REQUEST_ID, with_request_id};
use crate::response_processor::error::ProcessingError;
use crate::stream::flat_map_latest;

/// Source of response streams backed by an [`HttpClient`].
#[derive(Clone)]
pub struct ResponseProvider {
    http_client: Arc<dyn HttpClient>,
}

impl ResponseProvider {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// A stream yielding the single response to `request`, or the transport failure.
    pub fn request(
        &self,
        request: Request,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> + Send + use<> {
        let http_client = self.http_client.clone();
        stream::once(execute(http_client, request))
    }

    /// Sends every request coming from `requests`. A request still in flight when the next
    /// one arrives is abandoned, so only the latest request produces a response.
    pub fn request_latest<R>(
        &self,
        requests: R,
    ) -> impl Stream<Item = Result<Response, ProcessingError>> + use<R>
    where
        R: Stream<Item = Request>,
    {
        let http_client = self.http_client.clone();
        flat_map_latest(
            requests.map(Ok::<Request, ProcessingError>),
            move |request| execute(http_client.clone(), request),
        )
    }
}

async fn execute(
    http_client: Arc<dyn HttpClient>,
    request: Request,
) -> Result<Response, ProcessingError> {
    let request = with_request_id(request);
    let request_id = request
        .headers
        .get(X_REQUEST_ID.as_str())
        .cloned()
        .unwrap_or_default();

    info!("[{}] {} {}", request_id, request.method, request.url);

    http_client.execute(request).await.map_err(|err| {
        warn!("[{}] Request failed: {}", request_id, err);
        ProcessingError::from(err)
    })
}
