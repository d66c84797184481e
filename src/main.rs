mod cli_arguments;

use std::pin::pin;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures_util::{Stream, StreamExt};
use image::GenericImageView;
use response_stream::http_client::reqwest_http_client::ReqwestHttpClient;
use response_stream::http_client::response::Response;
use response_stream::response_processor::{ProcessingError, ResponseProcessor};
use response_stream::response_provider::ResponseProvider;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli_arguments::{CliArguments, Decode};

async fn first<T>(
    stream: impl Stream<Item = Result<T, ProcessingError>>,
) -> Option<Result<T, ProcessingError>> {
    let mut stream = pin!(stream);
    stream.next().await
}

/// Decodes the first response of `responses` and renders it for the terminal.
async fn render<S>(responses: S, decode: Decode) -> Option<Result<String, ProcessingError>>
where
    S: Stream<Item = Result<Response, ProcessingError>>,
{
    match decode {
        Decode::Raw => first(responses).await.map(|result| {
            result.map(|response| {
                format!(
                    "{} ({} bytes)\n{}",
                    response.status,
                    response.body.len(),
                    String::from_utf8_lossy(&response.body)
                )
            })
        }),
        Decode::Json => first(responses.map_json()).await.map(|result| {
            result.map(|value| {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            })
        }),
        Decode::String => first(responses.map_string()).await,
        Decode::Image => first(responses.map_image()).await.map(|result| {
            result.map(|image| {
                let (width, height) = image.dimensions();
                format!("{}x{} image ({:?})", width, height, image.color())
            })
        }),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: CliArguments = CliArguments::parse();

    let timeout = Duration::from_secs(args.timeout_secs);
    let http_client = match ReqwestHttpClient::with_timeout(timeout) {
        Ok(http_client) => http_client,
        Err(err) => {
            error!("Failed to build the HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let provider = ResponseProvider::new(Arc::new(http_client));
    let responses = args.expect.apply(provider.request(args.request()));

    match render(responses, args.decode).await {
        Some(Ok(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Some(Err(err)) => {
            error!("{err}");
            if let Some(response) = err.response() {
                info!(
                    "Offending response: status {}, {} bytes",
                    response.status,
                    response.body.len()
                );
            }
            ExitCode::FAILURE
        }
        None => {
            error!("No response received");
            ExitCode::FAILURE
        }
    }
}
