//! Client for the Neato robot vacuum cloud.
//!
//! This crate provides the request layer used by the `neato` command line tool:
//!
//! - **Session**: email/password login against the account service and
//!   persistable credentials
//! - **Directory**: cached robot list and per-robot map listing
//! - **Robot RPC**: HMAC-signed commands to each robot's message endpoint
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   users/me/...   ┌──────────────────┐
//! │  AccountSession  │─────────────────▶│ account service  │
//! └────────┬─────────┘                  └──────────────────┘
//!          │ &session
//! ┌────────▼─────────┐
//! │     Account      │  robots(), maps()
//! └────────┬─────────┘
//!          │ &Robot
//! ┌────────▼─────────┐  signed POST     ┌──────────────────┐
//! │   RobotClient    │─────────────────▶│ robot messages   │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use neato_core::{Account, AccountSession, HeaderSet, RobotClient, DEFAULT_ENDPOINT};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = AccountSession::new(DEFAULT_ENDPOINT, HeaderSet::new())?;
//! session.login("user@example.com", "secret").await?;
//!
//! let mut account = Account::new(&session);
//! let client = RobotClient::new()?;
//! for robot in account.robots().await? {
//!     let state = client.state(robot).await?;
//!     println!("{robot}: {state}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod client;
pub mod command;
mod de;
pub mod error;
pub mod headers;
pub mod map;
pub mod robot;
pub mod session;
pub mod signer;
pub mod state;
pub mod transport;

pub use account::Account;
pub use client::RobotClient;
pub use command::{
    CleaningCategory, CleaningMode, CleaningOptions, Command, NavigationMode, ServiceVersion,
    StartCleaningParams,
};
pub use error::{DirectoryError, NeatoError, Result, TransportError};
pub use headers::HeaderSet;
pub use map::Map;
pub use robot::{PortPolicy, Robot};
pub use session::{AccountSession, SessionCredentials, DEFAULT_ENDPOINT};
pub use state::{DeviceState, RobotAction, RobotResult, RobotState};
pub use transport::{TlsMode, Transport};
