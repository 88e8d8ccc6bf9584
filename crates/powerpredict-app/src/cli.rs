//! CLI argument definitions for the PowerPredict application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use powerpredict_core::types::{BillSettings, EfficiencyRating, HomeSize, Season};

/// Port used when neither flag, env var nor config provides one.
const DEFAULT_PORT: u16 = 5000;

/// PowerPredict: household electricity bill estimator and energy-saving advisor.
#[derive(Parser, Debug)]
#[command(name = "powerpredict", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server.
    Serve {
        /// API server port.
        #[arg(short = 'p', long = "port")]
        port: Option<u16>,

        /// Bind address.
        #[arg(long = "host")]
        host: Option<String>,
    },

    /// Estimate the monthly bill for a JSON appliance list.
    Estimate {
        /// JSON file holding an array of appliances.
        appliances: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Chat with the energy assistant on the terminal.
    Chat {
        /// JSON appliance list used to personalize answers.
        #[arg(short = 'a', long = "appliances")]
        appliances: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Bill settings overrides. Unset flags keep the configured defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Utility region, e.g. "Pacific".
    #[arg(long = "region")]
    pub region: Option<String>,

    /// spring, summer, fall or winter.
    #[arg(long = "season")]
    pub season: Option<Season>,

    /// small, medium or large.
    #[arg(long = "home-size")]
    pub home_size: Option<HomeSize>,

    /// poor, average, good or excellent.
    #[arg(long = "efficiency")]
    pub efficiency: Option<EfficiencyRating>,

    /// Apply time-of-use category factors.
    #[arg(long = "time-of-use")]
    pub time_of_use: bool,
}

impl SettingsArgs {
    /// Overlay the flags on top of `base`.
    pub fn apply(&self, base: &BillSettings) -> BillSettings {
        let mut settings = base.clone();
        if let Some(ref region) = self.region {
            settings.region = region.clone();
        }
        if let Some(season) = self.season {
            settings.season = season;
        }
        if let Some(home_size) = self.home_size {
            settings.home_size = home_size;
        }
        if let Some(efficiency) = self.efficiency {
            settings.efficiency_rating = efficiency;
        }
        if self.time_of_use {
            settings.use_time_of_use = true;
        }
        settings
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > POWERPREDICT_CONFIG env var > ~/.powerpredict/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("POWERPREDICT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > POWERPREDICT_PORT env var > config file value > 5000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Command::Serve { port: Some(p), .. } = self.command {
            return p;
        }
        if let Ok(val) = std::env::var("POWERPREDICT_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        DEFAULT_PORT
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value > "info".
    pub fn resolve_log_level(&self, config_level: Option<&str>) -> String {
        self.log_level
            .clone()
            .or_else(|| config_level.map(str::to_string))
            .unwrap_or_else(|| "info".to_string())
    }
}

/// Question text of an `/ask` chat command, or `None` for anything else.
///
/// The command must stand alone or be followed by whitespace, so
/// "/asking about LEDs" is an ordinary message.
pub fn ask_command(input: &str) -> Option<&str> {
    let rest = input.strip_prefix("/ask")?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".powerpredict").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".powerpredict").join("config.toml");
    }
    PathBuf::from("config.toml")
}
