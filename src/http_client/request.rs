use std::{
    collections::HashMap,
    fmt::{self, Display},
    ops::{Deref, DerefMut},
    str::FromStr,
};

use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: RequestMethod,
    pub url: String,
    pub headers: RequestHeaders,
    pub body: Bytes,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            method: RequestMethod::Get,
            url: url.into(),
            headers: RequestHeaders::default(),
            body: Bytes::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestHeaders(pub HashMap<String, String>);

impl RequestHeaders {
    /// Case-insensitive lookup, header names coming back from the wire are lowercase.
    pub fn get(&self, key: &str) -> Option<&String> {
        HashMap::get(self, key).or_else(|| {
            self.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        })
    }
}

impl Deref for RequestHeaders {
    type Target = HashMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RequestHeaders {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[(String, String); N]> for RequestHeaders {
    fn from(arr: [(String, String); N]) -> Self {
        let map = arr.into_iter().collect();
        RequestHeaders(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Patch => "PATCH",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RequestMethod {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            "PATCH" => Ok(RequestMethod::Patch),
            _ => Err(RequestError::UnsupportedMethod(value.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("HTTP method {0} is not supported")]
    UnsupportedMethod(String),
}

#[cfg(test)]
mod tests {
    use crate::http_client::request::{RequestError, RequestHeaders, RequestMethod};

    #[test]
    fn request_method_to_string() {
        let methods = [
            RequestMethod::Get,
            RequestMethod::Post,
            RequestMethod::Put,
            RequestMethod::Delete,
            RequestMethod::Patch,
        ];

        let expected = ["GET", "POST", "PUT", "DELETE", "PATCH"];

        for (method, &expected_str) in methods.iter().zip(expected.iter()) {
            assert_eq!(method.to_string(), expected_str);
        }
    }

    #[test]
    fn parses_request_methods_ignoring_case() {
        assert_eq!("get".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("Post".parse::<RequestMethod>().unwrap(), RequestMethod::Post);
        assert_eq!("PATCH".parse::<RequestMethod>().unwrap(), RequestMethod::Patch);

        match "OPTIONS".parse::<RequestMethod>().unwrap_err() {
            RequestError::UnsupportedMethod(m) => assert_eq!(m, "OPTIONS"),
        }
    }

    #[test]
    fn looks_up_headers_without_case_sensitivity() {
        let headers = RequestHeaders::from([(
            "content-type".to_string(),
            "application/json".to_string(),
        )]);

        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("accept"), None);
    }
}
