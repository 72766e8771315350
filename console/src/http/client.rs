//! HTTP client implementation

use std::time::Duration;

use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::Method;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::ConsoleError;

/// Failure of a management API call
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be interpreted
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of the failure, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend rejected the credentials or token
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Request payload
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON with an `application/json` content type
    Json(Value),
    /// Sent unmodified, no content type is set
    Raw(Vec<u8>),
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions<'a> {
    pub method: Method,
    pub body: Option<RequestBody>,
    pub token: Option<&'a str>,
    pub headers: HeaderMap,
}

impl<'a> RequestOptions<'a> {
    pub fn get(token: &'a str) -> Self {
        Self {
            token: Some(token),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_raw(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }
}

/// HTTP client for the management API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConsoleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// The body is only parsed when the response declares a JSON content
    /// type, otherwise `None` is returned.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions<'_>,
    ) -> Result<Option<Value>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", options.method, url);

        let mut headers = options.headers;
        let mut request = self.client.request(options.method.clone(), &url);

        match options.body {
            Some(RequestBody::Json(value)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                let bytes =
                    serde_json::to_vec(&value).map_err(|e| ApiError::Decode(e.to_string()))?;
                request = request.body(bytes);
            }
            Some(RequestBody::Raw(bytes)) => {
                request = request.body(bytes);
            }
            None => {}
        }

        if let Some(token) = options.token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }

        let response = request.headers(headers).send().await?;
        let status = response.status();

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        let payload = if is_json {
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                None
            } else {
                match serde_json::from_slice::<Value>(&bytes) {
                    Ok(value) => Some(value),
                    Err(e) if status.is_success() => return Err(ApiError::Decode(e.to_string())),
                    Err(_) => None,
                }
            }
        } else {
            None
        };

        if !status.is_success() {
            let message = payload
                .as_ref()
                .and_then(|p| p.get("error"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));
            warn!("{} {} failed: {} - {}", options.method, url, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(payload)
    }
}

/// Decode a payload that must be present
pub fn decode_required<T: DeserializeOwned>(payload: Option<Value>) -> Result<T, ApiError> {
    let value = payload.ok_or_else(|| ApiError::Decode("empty response body".to_string()))?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a payload, an absent body yields the default value
pub fn decode_or_default<T: DeserializeOwned + Default>(
    payload: Option<Value>,
) -> Result<T, ApiError> {
    match payload {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_client::DeviceCounts;

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status {
            status: 401,
            message: "invalid token".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "invalid token");

        let err = ApiError::Decode("bad".to_string());
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_helpers() {
        let counts: DeviceCounts = decode_or_default(None).unwrap();
        assert_eq!(counts, DeviceCounts::default());

        let counts: DeviceCounts =
            decode_or_default(Some(serde_json::json!({"pending": 4}))).unwrap();
        assert_eq!(counts.pending, 4);

        assert!(decode_required::<DeviceCounts>(None).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpClient::new("http://localhost:8080/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }
}
