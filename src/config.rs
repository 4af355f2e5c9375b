/// config gathers everything the agent needs from the command line and environment
use clap;

use crate::board::BoardKind;
use crate::errors::{MausError, Result};

pub const DEFAULT_ALERT_TOPIC: &str = "Arduino/command/LED";
const DEFAULT_CLIENT_ID: &str = "boardmaus";
const MIN_KEEP_ALIVE: u64 = 5;
// Keep alive travels as a u16 in the CONNECT packet
const MAX_KEEP_ALIVE: u64 = u16::MAX as u64;

#[derive(Debug, clap::Parser)]
#[command(
    name = "boardmaus",
    about = "Bridge a board's GPIO pin and CPU temperature to MQTT"
)]
pub struct Args {
    /// MQTT broker host
    #[arg(long, env = "MAUS_MQTT_HOST", default_value = "localhost")]
    pub mqtt_host: String,

    #[arg(long, env = "MAUS_MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    #[arg(long, env = "MAUS_MQTT_USERNAME")]
    pub mqtt_username: Option<String>,

    #[arg(long, env = "MAUS_MQTT_PASSWORD", hide_env_values = true)]
    pub mqtt_password: Option<String>,

    /// Client id, also the topic prefix; defaults to the host name
    #[arg(long, env = "MAUS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// MQTT keep alive in seconds
    #[arg(long, default_value_t = 20)]
    pub keep_alive: u64,

    #[arg(long, value_enum, default_value_t = BoardKind::Sysfs)]
    pub board: BoardKind,

    /// SysFS class path
    #[arg(long, default_value = crate::sysfs::PATH)]
    pub sysfs_path: std::path::PathBuf,

    /// GPIO line number behind D5
    #[arg(long, default_value_t = 5)]
    pub gpio: u32,

    /// Topic receiving the high temperature alert
    #[arg(long, default_value = DEFAULT_ALERT_TOPIC)]
    pub alert_topic: String,

    /// Starting temperature of the dummy board
    #[arg(long, default_value_t = 45.0)]
    pub dummy_temperature: f64,

    /// Also show MQTT client debug messages
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub client_id: String,
    pub keep_alive: u64,
    pub board: BoardKind,
    pub sysfs_path: std::path::PathBuf,
    pub gpio: u32,
    pub alert_topic: String,
    pub dummy_temperature: f64,
    /// 0: warnings only, 1: program messages, 2: program and MQTT client messages
    pub verbosity: u8,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(MausError::Config("client id is empty".to_string()));
        }
        if self.client_id.starts_with(char::is_whitespace) {
            return Err(MausError::Config(format!(
                "client id {:?} may not start with whitespace",
                self.client_id
            )));
        }
        if self.client_id.contains(|c: char| c == '/' || c == '#' || c == '+') {
            return Err(MausError::Config(format!(
                "client id {:?} may not contain '/', '#' or '+'",
                self.client_id
            )));
        }
        if !(MIN_KEEP_ALIVE..=MAX_KEEP_ALIVE).contains(&self.keep_alive) {
            return Err(MausError::Config(format!(
                "keep alive must be between {} and {} seconds",
                MIN_KEEP_ALIVE, MAX_KEEP_ALIVE
            )));
        }
        if self.alert_topic.contains(|c: char| c == '#' || c == '+') {
            return Err(MausError::Config(format!(
                "alert topic {:?} may not contain wildcards",
                self.alert_topic
            )));
        }
        Ok(())
    }

    /// env_logger filter for the configured verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info,rumqttc=warn",
            _ => "debug",
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = MausError;

    fn try_from(args: Args) -> Result<Self> {
        let verbosity = match (args.quiet, args.verbose) {
            (true, _) => 0,
            (false, 0) => 1,
            (false, _) => 2,
        };
        let config = Self {
            mqtt_host: args.mqtt_host,
            mqtt_port: args.mqtt_port,
            mqtt_username: args.mqtt_username,
            mqtt_password: args.mqtt_password,
            client_id: args.client_id.unwrap_or_else(default_client_id),
            keep_alive: args.keep_alive,
            board: args.board,
            sysfs_path: args.sysfs_path,
            gpio: args.gpio,
            alert_topic: args.alert_topic,
            dummy_temperature: args.dummy_temperature,
            verbosity,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Host name turned into a topic friendly slug
pub fn default_client_id() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .map(slug::slugify)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string())
}
