//! Neato CLI - control Neato robot vacuums through the Neato cloud.
//!
//! This is the entry point for the `neato` binary.

mod app;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use neato_core::{
    CleaningCategory, CleaningMode, CleaningOptions, NavigationMode, DEFAULT_ENDPOINT,
};

use app::App;
use config::CliConfig;

/// Neato CLI - control Neato robot vacuums through the Neato cloud.
#[derive(Parser, Debug)]
#[command(name = "neato")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file holding the saved session.
    #[arg(short, long, env = "NEATO_CONFIG")]
    config: Option<PathBuf>,

    /// Authentication token, used instead of the saved session.
    #[arg(short, long, env = "NEATO_TOKEN")]
    token: Option<String>,

    /// Enable debug logging.
    #[arg(short = 'D', long, default_value = "false")]
    debug: bool,

    /// Print output as JSON.
    #[arg(short, long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in to the Neato cloud and save the session.
    Login {
        /// Email address of the Neato account.
        #[arg(short, long, env = "NEATO_EMAIL")]
        email: Option<String>,

        /// Account password. Prefer this flag or `NEATO_PASSWORD`: when both
        /// are omitted the password is read from stdin and echoed.
        #[arg(long, env = "NEATO_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Account service URL.
        #[arg(long, env = "NEATO_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },

    /// Show the robots of the logged in account.
    Robots,

    /// Show the most recent map of every robot.
    Maps {
        /// Show all maps of each robot instead of the most recent one.
        #[arg(short, long)]
        all: bool,
    },

    /// Show the state of a robot.
    State {
        /// Robot index as listed by `neato robots`, starting at 0.
        #[arg(default_value_t = 0)]
        index: usize,
    },

    /// Start cleaning.
    Start {
        /// Robot index as listed by `neato robots`, starting at 0.
        #[arg(default_value_t = 0)]
        index: usize,

        /// Cleaning mode: eco or turbo.
        #[arg(long, default_value = "eco")]
        mode: CleaningMode,

        /// Navigation mode: normal, extra-care or deep.
        #[arg(long, default_value = "normal")]
        navigation: NavigationMode,

        /// Map category: persistent or non-persistent. Picked from the
        /// robot's capabilities when omitted.
        #[arg(long)]
        category: Option<CleaningCategory>,

        /// Persistent map to clean (basic-3/basic-4 robots only).
        #[arg(long)]
        map_id: Option<String>,

        /// Boundary within the persistent map to clean.
        #[arg(long, requires = "map_id")]
        boundary_id: Option<String>,
    },

    /// Stop cleaning.
    Stop {
        /// Robot index as listed by `neato robots`, starting at 0.
        #[arg(default_value_t = 0)]
        index: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("neato_cli=debug,neato_core=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = match args.config {
        Some(path) => path,
        None => CliConfig::default_path()
            .context("cannot determine the config directory, use --config")?,
    };
    let mut app = App::new(config_path, args.token, args.json)?;

    match args.command {
        Commands::Login {
            email,
            password,
            endpoint,
        } => app.login(email, password, &endpoint).await,
        Commands::Robots => app.robots().await,
        Commands::Maps { all } => app.maps(all).await,
        Commands::State { index } => app.state(index).await,
        Commands::Start {
            index,
            mode,
            navigation,
            category,
            map_id,
            boundary_id,
        } => {
            let options = CleaningOptions {
                mode,
                navigation,
                category,
                boundary_id,
                map_id,
            };
            app.start(index, options).await
        }
        Commands::Stop { index } => app.stop(index).await,
    }
}
