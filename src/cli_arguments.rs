use std::str::FromStr;

use bytes::Bytes;
use clap::{Parser, ValueEnum};
use futures_util::{Stream, StreamExt, stream::LocalBoxStream};
use response_stream::http_client::request::{Request, RequestHeaders, RequestMethod};
use response_stream::http_client::response::Response;
use response_stream::response_processor::{ProcessingError, ResponseProcessor};

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub(crate) struct CliArguments {
    #[arg(short, long)]
    pub url: String,

    #[arg(short, long, default_value = "GET")]
    pub method: RequestMethod,

    #[arg(short, long)]
    pub body: Option<String>,

    /// any, success, success-or-redirect, a single code (404) or a range (200-204)
    #[arg(short, long, default_value = "success")]
    pub expect: StatusExpectation,

    #[arg(short, long, value_enum, default_value_t = Decode::Raw)]
    pub decode: Decode,

    #[arg(short, long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl CliArguments {
    pub(crate) fn request(&self) -> Request {
        Request {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: RequestHeaders::default(),
            body: self
                .body
                .clone()
                .map(Bytes::from)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub(crate) enum Decode {
    Raw,
    Json,
    String,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StatusExpectation {
    Any,
    Successful,
    SuccessfulOrRedirect,
    Code(u16),
    Range(u16, u16),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StatusExpectationError {
    #[error("invalid status code {0}")]
    InvalidCode(String),

    #[error("range {0}-{1} is empty")]
    EmptyRange(u16, u16),
}

impl FromStr for StatusExpectation {
    type Err = StatusExpectationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_code = |code: &str| {
            code.trim()
                .parse::<u16>()
                .map_err(|_| StatusExpectationError::InvalidCode(code.to_string()))
        };

        match value {
            "any" => Ok(StatusExpectation::Any),
            "success" => Ok(StatusExpectation::Successful),
            "success-or-redirect" => Ok(StatusExpectation::SuccessfulOrRedirect),
            _ => match value.split_once('-') {
                Some((from, to)) => {
                    let (from, to) = (parse_code(from)?, parse_code(to)?);
                    if from > to {
                        return Err(StatusExpectationError::EmptyRange(from, to));
                    }
                    Ok(StatusExpectation::Range(from, to))
                }
                None => parse_code(value).map(StatusExpectation::Code),
            },
        }
    }
}

impl StatusExpectation {
    pub(crate) fn apply<S>(
        &self,
        responses: S,
    ) -> LocalBoxStream<'static, Result<Response, ProcessingError>>
    where
        S: Stream<Item = Result<Response, ProcessingError>> + 'static,
    {
        match *self {
            StatusExpectation::Any => responses.boxed_local(),
            StatusExpectation::Successful => {
                responses.filter_successful_status_codes().boxed_local()
            }
            StatusExpectation::SuccessfulOrRedirect => responses
                .filter_successful_status_and_redirect_codes()
                .boxed_local(),
            StatusExpectation::Code(code) => responses.filter_status_code(code).boxed_local(),
            StatusExpectation::Range(from, to) => {
                responses.filter_status_codes(from..=to).boxed_local()
            }
        }
    }
}
