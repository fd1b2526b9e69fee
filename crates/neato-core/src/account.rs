//! Robot and map directory of an account.
//!
//! The robot list is fetched on first use and kept for the lifetime of the
//! [`Account`]; build a new one to see changes made elsewhere.

use tracing::debug;

use crate::error::{DirectoryError, Result};
use crate::map::Map;
use crate::robot::Robot;
use crate::session::AccountSession;

const ROBOTS_PATH: &str = "users/me/robots";

/// Robots and maps reachable through a session.
#[derive(Debug)]
pub struct Account<'s> {
    session: &'s AccountSession,
    robots: Option<Vec<Robot>>,
}

impl<'s> Account<'s> {
    /// Create a directory over `session`. Nothing is fetched yet.
    #[must_use]
    pub const fn new(session: &'s AccountSession) -> Self {
        Self {
            session,
            robots: None,
        }
    }

    /// The session used for directory calls.
    #[must_use]
    pub const fn session(&self) -> &'s AccountSession {
        self.session
    }

    /// Robots of the account, fetched once and then served from memory.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the robot list cannot be fetched.
    pub async fn robots(&mut self) -> Result<&[Robot]> {
        let robots = match self.robots.take() {
            Some(robots) => robots,
            None => {
                let robots: Vec<Robot> = self
                    .session
                    .get(ROBOTS_PATH)
                    .await
                    .map_err(DirectoryError::Robots)?;
                debug!(count = robots.len(), "fetched robots");
                robots
            }
        };
        Ok(self.robots.insert(robots).as_slice())
    }

    /// Robot at `index` in the robot list.
    ///
    /// # Errors
    ///
    /// Returns `Directory` if the robot list cannot be fetched.
    pub async fn robot(&mut self, index: usize) -> Result<Option<&Robot>> {
        Ok(self.robots().await?.get(index))
    }

    /// Maps of every robot, concatenated in robot order.
    ///
    /// Stops at the first robot whose maps cannot be fetched.
    ///
    /// # Errors
    ///
    /// Returns `Directory` naming the robot that failed.
    pub async fn maps(&mut self) -> Result<Vec<Map>> {
        let session = self.session;
        let mut maps = Vec::new();
        for robot in self.robots().await? {
            maps.extend(robot.maps(session).await?);
        }
        Ok(maps)
    }
}
