use std::io::Cursor;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{HeaderName, Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use clap::Parser;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    port: u16,
}

#[derive(Clone, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4()
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

async fn health() -> impl IntoResponse {
    "PONG"
}

async fn json_fixture() -> impl IntoResponse {
    Json(json!({ "id": 1, "name": "fixture", "tags": ["a", "b"] }))
}

async fn text_fixture() -> impl IntoResponse {
    "hello from dummy-backend"
}

async fn binary_fixture() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        vec![0xFF_u8, 0xFE, 0xFD],
    )
}

async fn image_fixture() -> impl IntoResponse {
    let image = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]));
    let mut png = Cursor::new(Vec::new());

    match image.write_to(&mut png, ImageFormat::Png) {
        Ok(()) => ([(header::CONTENT_TYPE, "image/png")], png.into_inner()).into_response(),
        Err(err) => {
            warn!("Failed to encode fixture image: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn status_fixture(Path(code): Path<u16>) -> impl IntoResponse {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")).into_response(),
    }
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/json", get(json_fixture))
        .route("/text", get(text_fixture))
        .route("/binary", get(binary_fixture))
        .route("/image", get(image_fixture))
        .route("/status/{code}", get(status_fixture))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Args = Args::parse();
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .unwrap();

    info!("Dummy backend listening on port {}", args.port);

    axum::serve(listener, router()).await.unwrap();
}
