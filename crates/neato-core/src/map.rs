//! Cleaning maps recorded by a robot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

const NOT_SET: &str = "<not set>";

/// One map (cleaning run) as returned by the account service.
///
/// Almost every field is optional on the wire; absent and `null` both decode
/// to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Map {
    pub version: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    pub url_valid_for_seconds: Option<u64>,
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub launched_from: Option<String>,
    pub error: Option<String>,
    pub category: Option<u8>,
    pub mode: Option<u8>,
    pub modifier: Option<u8>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub end_orientation_relative_degrees: Option<i32>,
    pub run_charge_at_start: Option<u8>,
    pub run_charge_at_end: Option<u8>,
    pub suspended_cleaning_charging_count: Option<u32>,
    pub time_in_suspended_cleaning: Option<u64>,
    pub time_in_error: Option<u64>,
    pub time_in_pause: Option<u64>,
    pub cleaned_area: Option<f64>,
    pub base_count: Option<u32>,
    pub is_docked: Option<bool>,
    pub delocalized: Option<bool>,
    pub generated_at: Option<String>,
    pub persistent_map_id: Option<String>,
    pub valid_as_persistent_map: Option<bool>,
    pub navigation_mode: Option<u8>,
}

/// Body of `GET users/me/robots/{serial}/maps`.
///
/// The response also carries a `stats` object whose shape is undocumented;
/// it is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MapsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub maps: Vec<Map>,
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cleaned_area = self
            .cleaned_area
            .map_or_else(|| NOT_SET.to_string(), |area| format!("{area:.2}"));
        write!(
            f,
            "ID: '{}', URL: {}, Error: {}, Cleaned area: {} sqm",
            self.id,
            self.url,
            self.error.as_deref().unwrap_or(NOT_SET),
            cleaned_area
        )
    }
}
