//! HTTP transport interface

use crate::{config::ClientConfig, Error, Result, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

/// HTTP method used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET with query parameters
    Get,
    /// POST with a JSON body
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Outgoing request, fully built by the client
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers (authentication included)
    pub headers: Vec<(String, String)>,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response handed back to the client
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

/// Transport trait
///
/// Sends one request and returns the raw response. Implementations must not
/// retry and must not interpret the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send request
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;

    /// Get transport name
    fn name(&self) -> &str;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create new transport honouring the configured timeout
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.timeout(),
        })
    }

    fn map_error(&self, err: reqwest::Error, url: &str) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout: self.timeout,
                operation: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_error(e, &request.url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(e, &request.url))?;

        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: Method::Get,
            url: "https://ohmyfin.ai/api/ssi".to_string(),
            headers: vec![("KEY".to_string(), "secret".to_string())],
            query: Vec::new(),
            body: None,
        };

        assert_eq!(request.header("key"), Some("secret"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn test_reqwest_transport_builds() {
        let transport = ReqwestTransport::new(&ClientConfig::new("test-key")).unwrap();
        assert_eq!(transport.name(), "reqwest");
    }
}
