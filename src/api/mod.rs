//! Clinic API transport.
//!
//! The rest of the core talks to the backend through the [`Transport`]
//! trait: one generic `send(method, path, params, body)` operation. The
//! production implementation is [`HttpTransport`] (reqwest + bearer auth);
//! tests substitute scripted stubs. Keeping the seam this narrow is what
//! lets the status mutator express its fallback chain as plain request
//! descriptions.

pub mod fetch;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

/// A single request against the clinic API, fully described as data.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `/appointments/{id}`.
    pub path: String,
    /// Query parameters.
    pub params: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Errors from a single transport attempt.
///
/// These never reach the top of the application as failures: the mutator
/// recovers by advancing its chain, and the dashboard aggregator degrades
/// the affected section.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid API base URL: {0}")]
    BadBaseUrl(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Generic request/response seam to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, TransportError>;
}

/// Production transport: reqwest against the configured base URL with
/// bearer auth. Non-2xx responses become `TransportError::Api`.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: &str) -> Result<Self, TransportError> {
        // Trailing slash matters for Url::join: without it the last path
        // segment of the base is replaced instead of appended.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| TransportError::BadBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|e| TransportError::BadBaseUrl(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value, TransportError> {
        let url = self.endpoint(&request.path)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .bearer_auth(&self.token);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_builder() {
        let req = ApiRequest::new(Method::PATCH, "/appointments/a1/payment-status")
            .param("payment_status", "paid");
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.path, "/appointments/a1/payment-status");
        assert_eq!(
            req.params,
            vec![("payment_status".to_string(), "paid".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let transport = HttpTransport::new("https://clinic.test/api", "tok").unwrap();
        let url = transport.endpoint("/appointments/a1").unwrap();
        assert_eq!(url.as_str(), "https://clinic.test/api/appointments/a1");

        // Base URL with trailing slash behaves the same
        let transport = HttpTransport::new("https://clinic.test/api/", "tok").unwrap();
        let url = transport.endpoint("appointments").unwrap();
        assert_eq!(url.as_str(), "https://clinic.test/api/appointments");
    }

    #[test]
    fn test_bad_base_url_rejected() {
        assert!(matches!(
            HttpTransport::new("not a url", "tok"),
            Err(TransportError::BadBaseUrl(_))
        ));
    }
}
