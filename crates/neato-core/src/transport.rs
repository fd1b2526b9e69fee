//! JSON over HTTP helpers shared by the account session and the robot client.
//!
//! Every request is attempted exactly once with a fixed total timeout. A
//! status of 400 or above is reported without looking at the body.

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::TransportError;
use crate::headers::HeaderSet;

/// Total time allowed for one request, connection included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether server certificates are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Standard certificate validation.
    Verify,
    /// Accept any certificate. Needed for the robot message endpoint, whose
    /// wildcard certificate does not match the host it is reached through.
    SkipVerify,
}

/// A blocking-style JSON client: one request in, one decoded document out.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    tls: TlsMode,
}

impl Transport {
    /// Build a transport with the given TLS mode.
    ///
    /// # Errors
    ///
    /// Returns `RequestBuild` if the underlying HTTP client cannot be created.
    pub fn new(tls: TlsMode) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(tls == TlsMode::SkipVerify)
            .build()
            .map_err(|e| TransportError::RequestBuild(format!("HTTP client: {e}")))?;
        Ok(Self { client, tls })
    }

    /// The TLS mode this transport was built with.
    #[must_use]
    pub const fn tls_mode(&self) -> TlsMode {
        self.tls
    }

    /// GET `uri` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`TransportError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        uri: &str,
        headers: &HeaderSet,
    ) -> Result<T, TransportError> {
        self.send(Method::GET, uri, headers, None).await
    }

    /// Serialize `body` as JSON, POST it to `uri` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`TransportError`].
    pub async fn post<B, T>(
        &self,
        uri: &str,
        headers: &HeaderSet,
        body: &B,
    ) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| TransportError::RequestBuild(format!("request body: {e}")))?;
        self.post_bytes(uri, headers, bytes).await
    }

    /// POST an already serialized JSON body and decode the JSON response.
    ///
    /// The bytes are sent untouched, which is what signed requests rely on.
    ///
    /// # Errors
    ///
    /// See [`TransportError`].
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        uri: &str,
        headers: &HeaderSet,
        body: Vec<u8>,
    ) -> Result<T, TransportError> {
        self.send(Method::POST, uri, headers, Some(body)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        headers: &HeaderSet,
        body: Option<Vec<u8>>,
    ) -> Result<T, TransportError> {
        let url = Url::parse(uri)
            .map_err(|e| TransportError::RequestBuild(format!("invalid URI '{uri}': {e}")))?;
        let header_map = headers.to_header_map()?;

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }
        // Caller headers go last so they win over anything set above.
        request = request.headers(header_map);

        debug!(%method, uri, "sending request");
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::RequestBuild(e.to_string())
            } else {
                TransportError::Network(e)
            }
        })?;

        let status = response.status();
        debug!(%method, uri, status = status.as_u16(), "received response");
        if status.as_u16() >= 400 {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(TransportError::Network)?;
        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }
}
