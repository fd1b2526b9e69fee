//! Robot state documents returned by the message endpoint.
//!
//! The robot answers every command with the same document shape. Commands
//! such as `stopCleaning` only fill in the envelope fields, so everything but
//! `result` is optional on the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::ServiceVersion;

// =============================================================================
// Result codes
// =============================================================================

/// Outcome of a robot command as reported in `result`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RobotResult {
    /// The command was accepted.
    Ok,
    /// The request body was not valid JSON.
    InvalidJson,
    /// The request was malformed.
    BadRequest,
    /// The robot does not know the command.
    CommandNotFound,
    /// The robot refused the command in its current state.
    CommandRejected,
    /// Generic failure.
    Ko,
    /// The command needs the robot to be docked.
    NotOnChargeBase,
    /// A code this client does not know yet.
    Unknown(String),
}

impl RobotResult {
    /// Wire representation of the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::InvalidJson => "invalid_json",
            Self::BadRequest => "bad_request",
            Self::CommandNotFound => "command_not_found",
            Self::CommandRejected => "command_rejected",
            Self::Ko => "ko",
            Self::NotOnChargeBase => "not_on_charge_base",
            Self::Unknown(code) => code,
        }
    }

    /// Returns `true` only for the literal `"ok"` code.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<String> for RobotResult {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ok" => Self::Ok,
            "invalid_json" => Self::InvalidJson,
            "bad_request" => Self::BadRequest,
            "command_not_found" => Self::CommandNotFound,
            "command_rejected" => Self::CommandRejected,
            "ko" => Self::Ko,
            "not_on_charge_base" => Self::NotOnChargeBase,
            _ => Self::Unknown(value),
        }
    }
}

impl From<RobotResult> for String {
    fn from(result: RobotResult) -> Self {
        match result {
            RobotResult::Unknown(code) => code,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for RobotResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Device state and action
// =============================================================================

/// Coarse device state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DeviceState {
    /// Not reported or not recognized.
    #[default]
    Invalid,
    /// Waiting for a command.
    Idle,
    /// Running an action.
    Busy,
    /// Action paused.
    Paused,
    /// Stuck in an error.
    Error,
}

impl From<u8> for DeviceState {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Idle,
            2 => Self::Busy,
            3 => Self::Paused,
            4 => Self::Error,
            _ => Self::Invalid,
        }
    }
}

impl From<DeviceState> for u8 {
    fn from(state: DeviceState) -> Self {
        match state {
            DeviceState::Invalid => 0,
            DeviceState::Idle => 1,
            DeviceState::Busy => 2,
            DeviceState::Paused => 3,
            DeviceState::Error => 4,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invalid => "invalid",
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Paused => "paused",
            Self::Error => "error",
        })
    }
}

/// What the robot is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RobotAction {
    /// Not reported or not recognized.
    #[default]
    Invalid,
    /// Cleaning the whole house.
    HouseCleaning,
    /// Cleaning a spot.
    SpotCleaning,
    /// Driven manually.
    ManualCleaning,
    /// Returning to the base.
    Docking,
    /// Someone is using the on-device menu.
    UserMenuActive,
    /// Cleaning suspended, usually to recharge.
    SuspendedCleaning,
    /// Firmware update in progress.
    Updating,
    /// Copying logs.
    CopyingLogs,
    /// Relocalizing after being moved.
    RecoveringLocation,
    /// Factory test.
    IecTest,
    /// Cleaning a persistent map.
    MapCleaning,
    /// Exploring to build a map.
    ExploringMap,
    /// Fetching persistent map identifiers.
    AcquiringPersistentMapIds,
    /// Creating and uploading a map.
    CreatingAndUploadingMap,
    /// Exploration suspended.
    SuspendedExploration,
}

impl RobotAction {
    const ALL: [Self; 16] = [
        Self::Invalid,
        Self::HouseCleaning,
        Self::SpotCleaning,
        Self::ManualCleaning,
        Self::Docking,
        Self::UserMenuActive,
        Self::SuspendedCleaning,
        Self::Updating,
        Self::CopyingLogs,
        Self::RecoveringLocation,
        Self::IecTest,
        Self::MapCleaning,
        Self::ExploringMap,
        Self::AcquiringPersistentMapIds,
        Self::CreatingAndUploadingMap,
        Self::SuspendedExploration,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::HouseCleaning => "house cleaning",
            Self::SpotCleaning => "spot cleaning",
            Self::ManualCleaning => "manual cleaning",
            Self::Docking => "docking",
            Self::UserMenuActive => "user menu active",
            Self::SuspendedCleaning => "suspended cleaning",
            Self::Updating => "updating",
            Self::CopyingLogs => "copying logs",
            Self::RecoveringLocation => "recovering location",
            Self::IecTest => "IEC test",
            Self::MapCleaning => "map cleaning",
            Self::ExploringMap => "exploring map",
            Self::AcquiringPersistentMapIds => "acquiring persistent map IDs",
            Self::CreatingAndUploadingMap => "creating and uploading map",
            Self::SuspendedExploration => "suspended exploration",
        }
    }
}

impl From<u8> for RobotAction {
    fn from(value: u8) -> Self {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(Self::Invalid)
    }
}

impl From<RobotAction> for u8 {
    fn from(action: RobotAction) -> Self {
        // ALL is indexed by wire value and has 16 entries.
        RobotAction::ALL
            .iter()
            .position(|a| *a == action)
            .and_then(|i| u8::try_from(i).ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for RobotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Document sections
// =============================================================================

/// Parameters of the current or last cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningState {
    /// Map category (2 = non-persistent, 4 = persistent).
    pub category: u8,
    /// Cleaning mode (1 = eco, 2 = turbo).
    pub mode: u8,
    /// Cleaning frequency modifier.
    pub modifier: u8,
    /// Navigation mode, when the firmware reports it.
    pub navigation_mode: Option<u8>,
    /// Spot width in centimetres.
    pub spot_width: u32,
    /// Spot height in centimetres.
    pub spot_height: u32,
}

/// Charging and docking flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Details {
    /// Currently charging.
    pub is_charging: bool,
    /// Sitting on the base.
    pub is_docked: bool,
    /// Scheduled cleaning is enabled.
    pub is_schedule_enabled: bool,
    /// The base has been seen during the current run.
    pub dock_has_been_seen: bool,
    /// Battery level in percent.
    pub charge: u8,
}

/// Commands the robot would accept right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailableCommands {
    /// `startCleaning`.
    pub start: bool,
    /// `stopCleaning`.
    pub stop: bool,
    /// `pauseCleaning`.
    pub pause: bool,
    /// `resumeCleaning`.
    pub resume: bool,
    /// `sendToBase`.
    pub go_to_base: bool,
}

/// Capability name to service version tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableServices {
    /// Version of the house cleaning service; selects the start parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_cleaning: Option<ServiceVersion>,
    /// Every other capability, verbatim.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Model and firmware as reported by the robot itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    /// Model name.
    pub model_name: Option<String>,
    /// Firmware version.
    pub firmware: Option<String>,
}

/// Full answer of the robot to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotState {
    /// Protocol version.
    #[serde(default)]
    pub version: u32,
    /// Echo of the request correlation id.
    #[serde(default)]
    pub req_id: String,
    /// Command outcome.
    pub result: RobotResult,
    /// Current error code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Current alert code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Device state.
    #[serde(default)]
    pub state: DeviceState,
    /// Current activity.
    #[serde(default)]
    pub action: RobotAction,
    /// Cleaning parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning: Option<CleaningState>,
    /// Charging and docking flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    /// Commands available right now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_commands: Option<AvailableCommands>,
    /// Service versions.
    #[serde(default)]
    pub available_services: AvailableServices,
    /// Model and firmware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, Action: {}, Result: {}",
            self.state, self.action, self.result
        )?;
        if let Some(details) = &self.details {
            write!(
                f,
                ", Charge: {}%, Docked: {}, Charging: {}",
                details.charge, details.is_docked, details.is_charging
            )?;
        }
        if let Some(error) = &self.error {
            write!(f, ", Error: {error}")?;
        }
        Ok(())
    }
}
