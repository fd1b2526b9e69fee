//! Command handlers of the `neato` CLI.
//!
//! Each handler resolves the session from the config file (or `--token`),
//! talks to the cloud through `neato-core` and prints the result.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use neato_core::{
    Account, AccountSession, CleaningOptions, HeaderSet, Robot, RobotClient, RobotState,
    DEFAULT_ENDPOINT,
};
use tracing::debug;

use crate::config::CliConfig;
use crate::output::{self, RobotMaps};

/// Shared state of one CLI invocation.
#[derive(Debug)]
pub struct App {
    config_path: PathBuf,
    config: CliConfig,
    token: Option<String>,
    json: bool,
}

impl App {
    /// Load the config at `config_path`.
    pub fn new(config_path: PathBuf, token: Option<String>, json: bool) -> anyhow::Result<Self> {
        let config = CliConfig::load(&config_path)?;
        debug!(path = %config_path.display(), "loaded config");
        Ok(Self {
            config_path,
            config,
            token,
            json,
        })
    }

    /// Log in and store the session in the config file.
    pub async fn login(
        &mut self,
        email: Option<String>,
        password: Option<String>,
        endpoint: &str,
    ) -> anyhow::Result<()> {
        let email = match email.or_else(|| self.config.email.clone()) {
            Some(email) => email,
            None => prompt("Type your Neato account email")?,
        };
        let password = match password {
            Some(password) => password,
            // The prompt echoes; scripts should pass --password or NEATO_PASSWORD.
            None => prompt("Type your Neato account password (input is shown)")?,
        };

        let mut session = AccountSession::new(endpoint, HeaderSet::new())?;
        session.login(&email, &password).await?;

        self.config.email = Some(email);
        self.config.session = Some(session.credentials());
        self.config.save(&self.config_path)?;
        println!("Logged in, session saved to '{}'", self.config_path.display());
        Ok(())
    }

    /// List robots.
    pub async fn robots(&self) -> anyhow::Result<()> {
        let session = self.session()?;
        let mut account = Account::new(&session);
        let robots = account.robots().await.context("Cannot get robots")?;

        if self.json {
            println!("{}", output::json(robots)?);
        } else if robots.is_empty() {
            println!("No robots found");
        } else {
            println!("{}", output::robots(robots));
        }
        Ok(())
    }

    /// Show the latest map (or all maps) of every robot.
    ///
    /// A robot whose maps cannot be fetched is reported and skipped.
    pub async fn maps(&self, all: bool) -> anyhow::Result<()> {
        let session = self.session()?;
        let mut account = Account::new(&session);
        let robots = account.robots().await.context("Cannot get robots")?;
        if robots.is_empty() {
            println!("No robots found");
            return Ok(());
        }

        let mut fetched = Vec::with_capacity(robots.len());
        for robot in robots {
            match robot.maps(&session).await {
                Ok(maps) => fetched.push((robot, maps)),
                Err(e) => eprintln!(
                    "Failed to get map for robot '{}' (serial: '{}'): {e}",
                    robot.name, robot.serial
                ),
            }
        }

        if self.json {
            let listing: Vec<RobotMaps<'_>> = fetched
                .iter()
                .map(|(robot, maps)| RobotMaps {
                    serial: &robot.serial,
                    name: &robot.name,
                    maps: maps.as_slice(),
                })
                .collect();
            println!("{}", output::json(&listing)?);
        } else {
            for (robot, maps) in &fetched {
                println!("{}", output::robot_maps(robot, maps, all));
            }
        }
        Ok(())
    }

    /// Print the state of the robot at `index`.
    pub async fn state(&self, index: usize) -> anyhow::Result<()> {
        let session = self.session()?;
        let mut account = Account::new(&session);
        let robot = select_robot(account.robots().await?, index)?;

        let state = RobotClient::new()?
            .state(robot)
            .await
            .context("Failed to get robot state")?;
        if self.json {
            println!("{}", output::json(&state)?);
        } else {
            println!("{}", output::state(robot, &state));
        }
        Ok(())
    }

    /// Start cleaning with the robot at `index`.
    pub async fn start(&self, index: usize, options: CleaningOptions) -> anyhow::Result<()> {
        let session = self.session()?;
        let mut account = Account::new(&session);
        let robot = select_robot(account.robots().await?, index)?;

        let state = RobotClient::new()?
            .start(robot, Some(options))
            .await
            .context("Failed to start robot")?;
        self.report(robot, "Cleaning started", &state)
    }

    /// Stop the robot at `index`.
    pub async fn stop(&self, index: usize) -> anyhow::Result<()> {
        let session = self.session()?;
        let mut account = Account::new(&session);
        let robot = select_robot(account.robots().await?, index)?;

        let state = RobotClient::new()?
            .stop(robot)
            .await
            .context("Failed to stop robot")?;
        self.report(robot, "Cleaning stopped", &state)
    }

    fn report(&self, robot: &Robot, what: &str, state: &RobotState) -> anyhow::Result<()> {
        if self.json {
            println!("{}", output::json(state)?);
        } else {
            println!("{what} on robot '{}' (serial: '{}')", robot.name, robot.serial);
        }
        Ok(())
    }

    /// Session from `--token` or from the saved credentials.
    fn session(&self) -> anyhow::Result<AccountSession> {
        let endpoint = self
            .config
            .session
            .as_ref()
            .map_or(DEFAULT_ENDPOINT, |s| s.endpoint.as_str());
        if let Some(token) = &self.token {
            return Ok(AccountSession::with_token(endpoint, token)?);
        }

        let session = match &self.config.session {
            Some(credentials) => AccountSession::from_credentials(credentials.clone())?,
            None => AccountSession::new(endpoint, HeaderSet::new())?,
        };
        if session.endpoint().is_empty() || !session.is_authenticated() {
            bail!(
                "no session.endpoint or session.header.Authorization found in '{}', you need to log in first",
                self.config_path.display()
            );
        }
        Ok(session)
    }
}

/// Robot at `index`, with the CLI's error messages for bad indexes.
pub fn select_robot(robots: &[Robot], index: usize) -> anyhow::Result<&Robot> {
    if robots.is_empty() {
        bail!("No robots found");
    }
    robots.get(index).with_context(|| {
        format!(
            "Robot index is too high: got {index}, must be in range 0-{}",
            robots.len() - 1
        )
    })
}

fn prompt(text: &str) -> anyhow::Result<String> {
    print!("{text} > ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        bail!("no input given");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn robots(n: usize) -> Vec<Robot> {
        (0..n)
            .map(|i| {
                serde_json::from_value(json!({
                    "serial": format!("OPS{i}"),
                    "secret_key": "k",
                    "nucleo_url": "https://nucleo.example"
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn selects_by_index() {
        let list = robots(2);
        assert_eq!(select_robot(&list, 1).unwrap().serial, "OPS1");
    }

    #[test]
    fn index_out_of_range() {
        let err = select_robot(&robots(2), 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Robot index is too high: got 2, must be in range 0-1"
        );
    }

    #[test]
    fn no_robots() {
        let err = select_robot(&[], 0).unwrap_err();
        assert_eq!(err.to_string(), "No robots found");
    }

    #[test]
    fn requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path().join("config.toml"), None, false).unwrap();
        let err = app.session().unwrap_err();
        assert!(err.to_string().contains("you need to log in first"));
    }

    #[test]
    fn token_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(dir.path().join("config.toml"), Some("abc".to_string()), false).unwrap();
        let session = app.session().unwrap();
        assert_eq!(session.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(session.header().get("Authorization"), Some("Token token=abc"));
    }
}
