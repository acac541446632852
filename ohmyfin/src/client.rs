//! Ohmyfin API client

use crate::{
    config::ClientConfig,
    metrics::*,
    transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport},
    types::*,
    Error, FieldErrors, Result, TransportError,
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Track endpoint
pub const TRACK_PATH: &str = "/api/track";
/// Validate endpoint
pub const VALIDATE_PATH: &str = "/api/validate";
/// SSI endpoint
pub const SSI_PATH: &str = "/api/ssi";
/// Change endpoint
pub const CHANGE_PATH: &str = "/api/change";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "KEY";

/// Ohmyfin API client
///
/// Holds only immutable configuration and a shared transport, so one instance
/// can serve concurrent calls.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

/// Error body returned by the API on 4xx/5xx
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl Client {
    /// Create new client backed by reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// Create new client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Track a SWIFT transaction
    pub async fn track(&self, request: &TrackRequest) -> Result<TrackResult> {
        request.validate()?;
        let body = encode_body(&request.without_empty_fields())?;

        self.observe("track", async {
            let bytes = self
                .round_trip("track", Method::Post, TRACK_PATH, Vec::new(), Some(body))
                .await?;
            decode_json(&bytes)
        })
        .await
    }

    /// Validate payment details before sending
    pub async fn validate(&self, request: &ValidateRequest) -> Result<ValidateResult> {
        request.validate()?;
        let body = encode_body(&request.without_empty_fields())?;

        self.observe("validate", async {
            let bytes = self
                .round_trip("validate", Method::Post, VALIDATE_PATH, Vec::new(), Some(body))
                .await?;
            decode_json(&bytes)
        })
        .await
    }

    /// Get Standard Settlement Instructions for a bank
    pub async fn get_ssi(&self, request: &SsiRequest) -> Result<SsiResult> {
        request.validate()?;

        self.observe("get_ssi", async {
            let bytes = self
                .round_trip("get_ssi", Method::Get, SSI_PATH, request.query(), None)
                .await?;
            decode_json(&bytes)
        })
        .await
    }

    /// Report a transaction status change (for financial institutions)
    pub async fn change(&self, request: &ChangeRequest) -> Result<ChangeAck> {
        request.validate()?;
        let body = encode_body(&request.without_empty_fields())?;

        self.observe("change", async {
            let bytes = self
                .round_trip("change", Method::Post, CHANGE_PATH, Vec::new(), Some(body))
                .await?;

            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(ChangeAck::from_body(serde_json::Value::Null));
            }
            decode_json(&bytes).map(ChangeAck::from_body)
        })
        .await
    }

    /// Record metrics and the final log line for one operation
    ///
    /// A call dropped before completion (e.g. through [`crate::cancellable`])
    /// is recorded by the guard as a transport error.
    async fn observe<T>(
        &self,
        operation: &'static str,
        call: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let mut guard = CallGuard::start(operation);
        let result = call.await;
        let duration = guard.finish(&result);

        match &result {
            Ok(_) => info!("Ohmyfin {} completed in {:?}", operation, duration),
            Err(Error::Api {
                status_code,
                message,
                ..
            }) => warn!(
                "Ohmyfin {} rejected with status {}: {}",
                operation, status_code, message
            ),
            Err(e @ Error::Transport(_)) => error!("Ohmyfin {} failed: {}", operation, e),
            Err(e) => warn!("Ohmyfin {} failed: {}", operation, e),
        }

        result
    }

    /// Send one request and return the body of a 2xx response
    async fn round_trip(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Bytes>,
    ) -> Result<Bytes> {
        let request = self.build_request(method, path, query, body);
        debug!(
            "Sending Ohmyfin {} request: {} {} via {}",
            operation,
            method,
            request.url,
            self.transport.name()
        );

        let timeout = self.config.timeout();
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| TransportError::Timeout {
                timeout,
                operation: operation.to_string(),
            })??;

        debug!(
            "Ohmyfin {} answered with status {} ({} bytes)",
            operation,
            response.status,
            response.body.len()
        );

        if (200..300).contains(&response.status) {
            Ok(response.body)
        } else {
            Err(error_from_response(&response))
        }
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Bytes>,
    ) -> HttpRequest {
        let mut headers = vec![
            (API_KEY_HEADER.to_string(), self.config.api_key().to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.config.user_agent().to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url(), path),
            headers,
            query,
            body,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("transport", &self.transport.name())
            .finish()
    }
}

fn encode_body<T: Serialize>(request: &T) -> Result<Bytes> {
    serde_json::to_vec(request)
        .map(Bytes::from)
        .map_err(|e| Error::Validation(format!("Failed to encode request: {}", e)))
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("Unexpected response body: {}", e)))
}

/// Map a non-2xx response onto [`Error::Api`]
fn error_from_response(response: &HttpResponse) -> Error {
    let status_code = response.status;
    let status_text = reqwest::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("API request failed with status {}", status_code));

    let payload = serde_json::from_slice::<ErrorPayload>(&response.body).ok();
    let client_error = (400..500).contains(&status_code);

    let (message, errors) = match payload {
        Some(payload) if client_error => (
            payload
                .message
                .unwrap_or_else(|| "API request failed".to_string()),
            payload.errors.map(field_errors).unwrap_or_default(),
        ),
        Some(payload) => (
            payload.message.unwrap_or(status_text),
            FieldErrors::new(),
        ),
        None => (status_text, FieldErrors::new()),
    };

    Error::Api {
        status_code,
        message,
        errors,
    }
}

/// Normalise the `errors` object; single strings become one-element lists
fn field_errors(value: serde_json::Value) -> FieldErrors {
    let serde_json::Value::Object(map) = value else {
        return FieldErrors::new();
    };

    map.into_iter()
        .map(|(field, messages)| {
            let messages = match messages {
                serde_json::Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
                serde_json::Value::String(s) => vec![s],
                serde_json::Value::Null => Vec::new(),
                other => vec![other.to_string()],
            };
            (field, messages)
        })
        .collect()
}
