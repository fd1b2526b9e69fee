//! Authenticated session against the Neato account service.
//!
//! A session is an endpoint plus the headers sent with every account call.
//! Logging in fills in `Authorization`; callers that persist credentials hand
//! the same endpoint and headers back through [`AccountSession::from_credentials`].

use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NeatoError, Result, TransportError};
use crate::headers::HeaderSet;
use crate::transport::{TlsMode, Transport};

/// Production account service.
pub const DEFAULT_ENDPOINT: &str = "https://beehive.neatocloud.com";

/// Platform reported on login.
const LOGIN_PLATFORM: &str = "ios";

/// Bytes of randomness in the login token.
const LOGIN_TOKEN_BYTES: usize = 64;

/// The serializable part of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    /// Account service base URL.
    pub endpoint: String,
    /// Headers sent with every account call.
    #[serde(default)]
    pub header: HeaderSet,
}

/// Request payload for email/password login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Client platform.
    pub platform: String,
    /// Client-generated idempotency token.
    pub token: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Access token for `Authorization: Token token=...`.
    pub access_token: String,
    /// Server time at login.
    #[serde(default)]
    pub current_time: Option<String>,
}

/// Session against the account service.
#[derive(Debug, Clone)]
pub struct AccountSession {
    endpoint: String,
    header: HeaderSet,
    transport: Transport,
}

impl AccountSession {
    /// Create a session with the given endpoint and headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: impl Into<String>, header: HeaderSet) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            header,
            transport: Transport::new(TlsMode::Verify)?,
        })
    }

    /// Restore a previously saved session without logging in again.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_credentials(credentials: SessionCredentials) -> Result<Self> {
        Self::new(credentials.endpoint, credentials.header)
    }

    /// Create a session that authenticates with an already issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_token(endpoint: impl Into<String>, token: &str) -> Result<Self> {
        let mut header = HeaderSet::new();
        header.set("Authorization", authorization_value(token));
        Self::new(endpoint, header)
    }

    /// Account service base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers sent with every account call.
    #[must_use]
    pub fn header(&self) -> &HeaderSet {
        &self.header
    }

    /// Snapshot of endpoint and headers for persistence.
    #[must_use]
    pub fn credentials(&self) -> SessionCredentials {
        SessionCredentials {
            endpoint: self.endpoint.clone(),
            header: self.header.clone(),
        }
    }

    /// Returns `true` if an `Authorization` header is set.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.header
            .get("Authorization")
            .is_some_and(|value| !value.is_empty())
    }

    /// Log in with email and password and keep the returned access token.
    ///
    /// # Errors
    ///
    /// Returns `Auth` if the request fails or the response cannot be decoded.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            platform: LOGIN_PLATFORM.to_string(),
            token: login_token(),
        };

        let response: LoginResponse = self
            .post("sessions", &request)
            .await
            .map_err(NeatoError::Auth)?;

        debug!(current_time = ?response.current_time, "login accepted");
        self.header
            .set("Authorization", authorization_value(&response.access_token));
        info!(endpoint = %self.endpoint, "logged in");
        Ok(())
    }

    /// GET `path` relative to the endpoint.
    ///
    /// # Errors
    ///
    /// See [`TransportError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> std::result::Result<T, TransportError> {
        self.transport.get(&self.url(path), &self.header).await
    }

    /// POST `body` as JSON to `path` relative to the endpoint.
    ///
    /// # Errors
    ///
    /// See [`TransportError`].
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.transport.post(&self.url(path), &self.header, body).await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn authorization_value(token: &str) -> String {
    format!("Token token={token}")
}

fn login_token() -> String {
    let mut bytes = [0u8; LOGIN_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
