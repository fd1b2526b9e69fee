//! Robots registered to an account.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::de::null_as_default;
use crate::error::{DirectoryError, NeatoError, Result};
use crate::map::{Map, MapsResponse};
use crate::session::AccountSession;

/// Whether the port listed in a robot's nucleo URL is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PortPolicy {
    /// Drop any explicit port. The production message endpoint rejects the
    /// port the account service lists.
    #[default]
    Strip,
    /// Use the URL as listed.
    Keep,
}

/// A robot as listed by the account service.
///
/// `serial` and `secret_key` are required; the pair identifies the robot and
/// signs every request to it. Values are never changed after the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    /// Unique device identifier.
    pub serial: String,
    /// Serial prefix.
    #[serde(default)]
    pub prefix: Option<String>,
    /// User-given name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Firmware version.
    #[serde(default)]
    pub firmware: Option<String>,
    /// IANA time zone of the robot.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Shared signing secret.
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Purchase timestamp.
    #[serde(default)]
    pub purchased_at: Option<String>,
    /// When the robot was linked to the account.
    #[serde(default)]
    pub linked_at: Option<String>,
    /// Base URL of the robot message endpoint.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nucleo_url: String,
    /// Feature flags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: Vec<String>,
    /// Uploaded proof of purchase.
    #[serde(default)]
    pub proof_of_purchase_url: Option<String>,
    /// Lifetime of `proof_of_purchase_url`.
    #[serde(default)]
    pub proof_of_purchase_url_valid_for_seconds: Option<u64>,
    /// When `proof_of_purchase_url` was issued.
    #[serde(default)]
    pub proof_of_purchase_generated_at: Option<String>,
    /// Wi-Fi MAC address.
    #[serde(default)]
    pub mac_address: Option<String>,
    /// Registration timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Robot {
    /// URL of this robot's message endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNucleoUrl` if the nucleo URL cannot be parsed or has
    /// no host.
    pub fn messages_url(&self, ports: PortPolicy) -> Result<Url> {
        let invalid = || NeatoError::InvalidNucleoUrl {
            serial: self.serial.clone(),
            url: self.nucleo_url.clone(),
        };

        let mut url = Url::parse(&self.nucleo_url).map_err(|_| invalid())?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(invalid());
        }
        if ports == PortPolicy::Strip {
            url.set_port(None).map_err(|()| invalid())?;
        }
        let path = format!(
            "{}/vendors/neato/robots/{}/messages",
            url.path().trim_end_matches('/'),
            self.serial
        );
        url.set_path(&path);
        Ok(url)
    }

    /// Maps recorded by this robot, newest first as the service returns them.
    ///
    /// # Errors
    ///
    /// Returns `Directory` naming this robot if the request fails.
    pub async fn maps(&self, session: &AccountSession) -> Result<Vec<Map>> {
        let path = format!("users/me/robots/{}/maps", self.serial);
        let response: MapsResponse =
            session
                .get(&path)
                .await
                .map_err(|source| DirectoryError::Maps {
                    serial: self.serial.clone(),
                    source,
                })?;
        debug!(serial = %self.serial, count = response.maps.len(), "fetched maps");
        Ok(response.maps)
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: '{}', Serial: {}, Model: {}",
            self.name,
            self.serial,
            self.model.as_deref().unwrap_or("<not set>")
        )
    }
}
