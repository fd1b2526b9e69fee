//! Command envelopes for the robot message endpoint.
//!
//! A command is `{reqId, cmd, params?}`. Only `startCleaning` carries
//! parameters, and which ones the robot accepts depends on the version of its
//! house cleaning service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Correlation id sent with every command.
pub const REQUEST_ID: &str = "1";

// =============================================================================
// Service versions
// =============================================================================

/// Version tag of a robot service, e.g. `basic-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceVersion {
    /// `basic-1`
    Basic1,
    /// `basic-2`
    Basic2,
    /// `minimal-2`
    Minimal2,
    /// `basic-3`
    Basic3,
    /// `basic-4`
    Basic4,
    /// Any tag this client has no table entry for.
    Other(String),
}

/// Which start parameters a service version accepts besides `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartShape {
    /// `mode` and `modifier`.
    pub mode: bool,
    /// `navigationMode`.
    pub navigation: bool,
    /// Supports persistent maps, so `mapId`/`boundaryId` may be sent.
    pub persistent_maps: bool,
}

impl ServiceVersion {
    /// Wire representation of the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic1 => "basic-1",
            Self::Basic2 => "basic-2",
            Self::Minimal2 => "minimal-2",
            Self::Basic3 => "basic-3",
            Self::Basic4 => "basic-4",
            Self::Other(tag) => tag,
        }
    }

    /// Start parameter table.
    #[must_use]
    pub const fn start_shape(&self) -> StartShape {
        let (mode, navigation, persistent_maps) = match self {
            Self::Basic1 => (true, false, false),
            Self::Basic2 => (true, true, false),
            Self::Minimal2 => (false, true, false),
            Self::Basic3 | Self::Basic4 => (true, true, true),
            Self::Other(_) => (false, false, false),
        };
        StartShape {
            mode,
            navigation,
            persistent_maps,
        }
    }

    /// Category used when the caller did not pick one.
    #[must_use]
    pub const fn default_category(&self) -> CleaningCategory {
        if self.start_shape().persistent_maps {
            CleaningCategory::PersistentMap
        } else {
            CleaningCategory::NonPersistentMap
        }
    }
}

impl From<String> for ServiceVersion {
    fn from(value: String) -> Self {
        match value.as_str() {
            "basic-1" => Self::Basic1,
            "basic-2" => Self::Basic2,
            "minimal-2" => Self::Minimal2,
            "basic-3" => Self::Basic3,
            "basic-4" => Self::Basic4,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ServiceVersion {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ServiceVersion> for String {
    fn from(version: ServiceVersion) -> Self {
        match version {
            ServiceVersion::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cleaning options
// =============================================================================

/// Suction power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleaningMode {
    /// Quieter, longer battery life.
    #[default]
    Eco,
    /// Full power.
    Turbo,
}

impl CleaningMode {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Eco => 1,
            Self::Turbo => 2,
        }
    }
}

/// How carefully the robot moves around obstacles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationMode {
    /// Default navigation.
    #[default]
    Normal,
    /// Gentler around furniture.
    ExtraCare,
    /// Slower, more thorough passes.
    Deep,
}

impl NavigationMode {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::ExtraCare => 2,
            Self::Deep => 3,
        }
    }
}

/// Whether a run uses a remembered floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningCategory {
    /// Single-session map.
    NonPersistentMap,
    /// Remembered map.
    PersistentMap,
}

impl CleaningCategory {
    /// Wire value.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::NonPersistentMap => 2,
            Self::PersistentMap => 4,
        }
    }
}

/// Error returned when parsing an option name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl FromStr for CleaningMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eco" => Ok(Self::Eco),
            "turbo" => Ok(Self::Turbo),
            _ => Err(ParseOptionError {
                kind: "cleaning mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for NavigationMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "extra-care" => Ok(Self::ExtraCare),
            "deep" => Ok(Self::Deep),
            _ => Err(ParseOptionError {
                kind: "navigation mode",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for CleaningCategory {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non-persistent" | "non-persistent-map" => Ok(Self::NonPersistentMap),
            "persistent" | "persistent-map" => Ok(Self::PersistentMap),
            _ => Err(ParseOptionError {
                kind: "category",
                value: s.to_string(),
            }),
        }
    }
}

/// Caller's wishes for a cleaning run, before they are fitted to the robot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningOptions {
    /// Suction power.
    pub mode: CleaningMode,
    /// Navigation mode.
    pub navigation: NavigationMode,
    /// Map category; `None` lets the service version decide.
    pub category: Option<CleaningCategory>,
    /// Boundary to clean within a persistent map.
    pub boundary_id: Option<String>,
    /// Persistent map to clean.
    pub map_id: Option<String>,
}

// =============================================================================
// Envelopes
// =============================================================================

/// Parameters of `startCleaning`, already fitted to a service version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCleaningParams {
    /// Category code as a decimal string; the robot expects a string here.
    pub category: String,
    /// Cleaning mode code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u8>,
    /// Always 1 when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<u8>,
    /// Navigation mode code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_mode: Option<u8>,
    /// Persistent map id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_id: Option<String>,
    /// Boundary id within the persistent map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_id: Option<String>,
}

impl StartCleaningParams {
    /// Fit `options` to a robot whose house cleaning service is `version`.
    ///
    /// `None` means the robot did not report a version and is treated like an
    /// unknown tag.
    #[must_use]
    pub fn resolve(options: &CleaningOptions, version: Option<&ServiceVersion>) -> Self {
        let unknown = ServiceVersion::Other(String::new());
        let version = version.unwrap_or(&unknown);
        let shape = version.start_shape();
        let category = options
            .category
            .unwrap_or_else(|| version.default_category());
        let with_map = shape.persistent_maps && category == CleaningCategory::PersistentMap;

        Self {
            category: category.code().to_string(),
            mode: shape.mode.then_some(options.mode.code()),
            modifier: shape.mode.then_some(1),
            navigation_mode: shape.navigation.then_some(options.navigation.code()),
            map_id: options.map_id.clone().filter(|_| with_map),
            boundary_id: options.boundary_id.clone().filter(|_| with_map),
        }
    }
}

/// A command sent to the robot message endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Correlation id.
    #[serde(rename = "reqId")]
    pub req_id: String,
    /// Command name.
    pub cmd: String,
    /// Parameters, `startCleaning` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<StartCleaningParams>,
}

impl Command {
    /// `getRobotState`
    pub const GET_ROBOT_STATE: &'static str = "getRobotState";
    /// `startCleaning`
    pub const START_CLEANING: &'static str = "startCleaning";
    /// `stopCleaning`
    pub const STOP_CLEANING: &'static str = "stopCleaning";

    fn new(cmd: &str, params: Option<StartCleaningParams>) -> Self {
        Self {
            req_id: REQUEST_ID.to_string(),
            cmd: cmd.to_string(),
            params,
        }
    }

    /// Ask for the full robot state.
    #[must_use]
    pub fn get_robot_state() -> Self {
        Self::new(Self::GET_ROBOT_STATE, None)
    }

    /// Start a house cleaning run.
    #[must_use]
    pub fn start_cleaning(params: StartCleaningParams) -> Self {
        Self::new(Self::START_CLEANING, Some(params))
    }

    /// Stop the current run.
    #[must_use]
    pub fn stop_cleaning() -> Self {
        Self::new(Self::STOP_CLEANING, None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params_for(tag: &str) -> serde_json::Value {
        let version = ServiceVersion::from(tag);
        let params = StartCleaningParams::resolve(&CleaningOptions::default(), Some(&version));
        serde_json::to_value(params).unwrap()
    }

    #[test]
    fn start_table() {
        assert_eq!(
            params_for("basic-1"),
            json!({ "category": "2", "mode": 1, "modifier": 1 })
        );
        assert_eq!(
            params_for("basic-2"),
            json!({ "category": "2", "mode": 1, "modifier": 1, "navigationMode": 1 })
        );
        assert_eq!(
            params_for("minimal-2"),
            json!({ "category": "2", "navigationMode": 1 })
        );
        assert_eq!(
            params_for("basic-3"),
            json!({ "category": "4", "mode": 1, "modifier": 1, "navigationMode": 1 })
        );
        assert_eq!(
            params_for("basic-4"),
            json!({ "category": "4", "mode": 1, "modifier": 1, "navigationMode": 1 })
        );
        assert_eq!(params_for("basic-9"), json!({ "category": "2" }));
    }

    #[test]
    fn missing_version_sends_category_only() {
        let params = StartCleaningParams::resolve(&CleaningOptions::default(), None);
        assert_eq!(serde_json::to_value(params).unwrap(), json!({ "category": "2" }));
    }

    #[test]
    fn explicit_options_are_kept() {
        let options = CleaningOptions {
            mode: CleaningMode::Turbo,
            navigation: NavigationMode::Deep,
            category: Some(CleaningCategory::NonPersistentMap),
            ..CleaningOptions::default()
        };
        let params = StartCleaningParams::resolve(&options, Some(&ServiceVersion::Basic3));
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({ "category": "2", "mode": 2, "modifier": 1, "navigationMode": 3 })
        );
    }

    #[test]
    fn map_ids_only_for_persistent_capable_services() {
        let options = CleaningOptions {
            map_id: Some("map-1".to_string()),
            boundary_id: Some("zone-1".to_string()),
            ..CleaningOptions::default()
        };

        let basic4 = StartCleaningParams::resolve(&options, Some(&ServiceVersion::Basic4));
        assert_eq!(basic4.map_id.as_deref(), Some("map-1"));
        assert_eq!(basic4.boundary_id.as_deref(), Some("zone-1"));

        let basic2 = StartCleaningParams::resolve(&options, Some(&ServiceVersion::Basic2));
        assert_eq!(basic2.map_id, None);
        assert_eq!(basic2.boundary_id, None);
    }

    #[test]
    fn start_envelope_bytes() {
        let params = StartCleaningParams::resolve(
            &CleaningOptions::default(),
            Some(&ServiceVersion::Basic1),
        );
        let body = serde_json::to_string(&Command::start_cleaning(params)).unwrap();
        assert_eq!(
            body,
            r#"{"reqId":"1","cmd":"startCleaning","params":{"category":"2","mode":1,"modifier":1}}"#
        );
    }

    #[test]
    fn parameterless_envelopes() {
        assert_eq!(
            serde_json::to_string(&Command::get_robot_state()).unwrap(),
            r#"{"reqId":"1","cmd":"getRobotState"}"#
        );
        assert_eq!(
            serde_json::to_string(&Command::stop_cleaning()).unwrap(),
            r#"{"reqId":"1","cmd":"stopCleaning"}"#
        );
    }

    #[test]
    fn service_version_round_trip() {
        let version: ServiceVersion = serde_json::from_value(json!("minimal-2")).unwrap();
        assert_eq!(version, ServiceVersion::Minimal2);
        let other: ServiceVersion = serde_json::from_value(json!("beta-7")).unwrap();
        assert_eq!(other, ServiceVersion::Other("beta-7".to_string()));
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("beta-7"));
    }

    #[test]
    fn option_names_parse() {
        assert_eq!("turbo".parse::<CleaningMode>(), Ok(CleaningMode::Turbo));
        assert_eq!(
            "extra-care".parse::<NavigationMode>(),
            Ok(NavigationMode::ExtraCare)
        );
        assert_eq!(
            "persistent".parse::<CleaningCategory>(),
            Ok(CleaningCategory::PersistentMap)
        );
        assert!("loud".parse::<CleaningMode>().is_err());
    }
}
