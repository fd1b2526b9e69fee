//! Error types for the Neato cloud client.
//!
//! Transport failures are kept separate from the higher-level failures that
//! wrap them, so callers can tell a dead connection from a robot that
//! answered but refused the command.

use thiserror::Error;

use crate::state::RobotResult;

/// A result type using `NeatoError`.
pub type Result<T> = std::result::Result<T, NeatoError>;

/// Failures of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The URI, headers or body could not be turned into a request.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// Connecting, sending or reading the response failed (timeouts included).
    #[error("HTTP request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a status of 400 or above.
    #[error("expected HTTP 2xx/3xx, got {status} {reason}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },

    /// The response body was not the JSON document we expected.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransportError {
    /// Returns the HTTP status code if the server rejected the request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures while listing robots or maps for an account.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The robot list could not be fetched.
    #[error("failed to fetch robots: {0}")]
    Robots(#[source] TransportError),

    /// The map list of one robot could not be fetched.
    #[error("failed to fetch maps for robot {serial}: {source}")]
    Maps {
        /// Serial of the robot whose maps failed.
        serial: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
}

/// Errors surfaced by the Neato client.
#[derive(Debug, Error)]
pub enum NeatoError {
    /// A request failed at the HTTP level.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Logging in to the account service failed.
    #[error("login failed: {0}")]
    Auth(#[source] TransportError),

    /// The robot answered but did not accept the command.
    #[error("robot {serial} rejected {command}: {result}")]
    Command {
        /// Serial of the robot.
        serial: String,
        /// Command name as sent on the wire.
        command: String,
        /// Result code reported by the robot.
        result: RobotResult,
    },

    /// Robot or map listing failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The robot's message endpoint could not be derived from its nucleo URL.
    #[error("invalid nucleo URL for robot {serial}: {url}")]
    InvalidNucleoUrl {
        /// Serial of the robot.
        serial: String,
        /// URL reported by the account service.
        url: String,
    },
}

impl NeatoError {
    /// Returns `true` if the robot was reached and reported a non-"ok" result.
    #[must_use]
    pub const fn is_command_rejected(&self) -> bool {
        matches!(self, Self::Command { .. })
    }
}
