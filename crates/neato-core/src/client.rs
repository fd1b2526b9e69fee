//! Signed RPC client for the robot message endpoint.
//!
//! Every call serializes the command once, signs exactly those bytes and
//! posts them. A robot that answers with anything but `"ok"` to a start or
//! stop command yields [`NeatoError::Command`], which is distinct from any
//! transport failure.

use tracing::debug;

use crate::command::{CleaningOptions, Command, StartCleaningParams};
use crate::error::{NeatoError, Result, TransportError};
use crate::robot::{PortPolicy, Robot};
use crate::signer;
use crate::state::RobotState;
use crate::transport::{TlsMode, Transport};

/// Client for the robot message endpoint.
#[derive(Debug, Clone)]
pub struct RobotClient {
    transport: Transport,
    ports: PortPolicy,
}

impl RobotClient {
    /// Create a client. Certificates are not verified, see [`TlsMode::SkipVerify`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Transport::new(TlsMode::SkipVerify)?))
    }

    /// Create a client over an existing transport.
    #[must_use]
    pub fn with_transport(transport: Transport) -> Self {
        Self {
            transport,
            ports: PortPolicy::default(),
        }
    }

    /// Choose whether the port of the nucleo URL is used.
    #[must_use]
    pub const fn with_port_policy(mut self, ports: PortPolicy) -> Self {
        self.ports = ports;
        self
    }

    /// Fetch the current state of `robot`.
    ///
    /// # Errors
    ///
    /// Returns transport or decode errors from the request.
    pub async fn state(&self, robot: &Robot) -> Result<RobotState> {
        self.post(robot, &Command::get_robot_state()).await
    }

    /// Start a house cleaning run.
    ///
    /// The robot's state is fetched first so the parameters match its house
    /// cleaning service version. `None` uses [`CleaningOptions::default`].
    ///
    /// # Errors
    ///
    /// Returns `Command` if the robot does not answer `"ok"`, or any error
    /// from the two requests.
    pub async fn start(
        &self,
        robot: &Robot,
        options: Option<CleaningOptions>,
    ) -> Result<RobotState> {
        let options = options.unwrap_or_default();
        let state = self.state(robot).await?;
        let version = state.available_services.house_cleaning.as_ref();
        debug!(serial = %robot.serial, ?version, "resolving start parameters");

        let params = StartCleaningParams::resolve(&options, version);
        let command = Command::start_cleaning(params);
        let state = self.post(robot, &command).await?;
        ensure_ok(robot, &command, state)
    }

    /// Stop the current run.
    ///
    /// # Errors
    ///
    /// Returns `Command` if the robot does not answer `"ok"`, or any error
    /// from the request.
    pub async fn stop(&self, robot: &Robot) -> Result<RobotState> {
        let command = Command::stop_cleaning();
        let state = self.post(robot, &command).await?;
        ensure_ok(robot, &command, state)
    }

    /// Sign and send `command` to `robot` and decode its answer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNucleoUrl` for an unusable robot URL, otherwise
    /// transport and decode errors.
    pub async fn post(&self, robot: &Robot, command: &Command) -> Result<RobotState> {
        let url = robot.messages_url(self.ports)?;
        let body = serde_json::to_vec(command)
            .map_err(|e| TransportError::RequestBuild(format!("command body: {e}")))?;
        let headers = signer::sign(&robot.serial, &robot.secret_key, &body);

        debug!(serial = %robot.serial, cmd = %command.cmd, %url, "posting robot command");
        let state: RobotState = self.transport.post_bytes(url.as_str(), &headers, body).await?;
        debug!(serial = %robot.serial, result = %state.result, "robot answered");
        Ok(state)
    }
}

fn ensure_ok(robot: &Robot, command: &Command, state: RobotState) -> Result<RobotState> {
    if state.result.is_ok() {
        Ok(state)
    } else {
        Err(NeatoError::Command {
            serial: robot.serial.clone(),
            command: command.cmd.clone(),
            result: state.result,
        })
    }
}
