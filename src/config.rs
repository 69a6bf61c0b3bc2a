//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::DisplayMode;

/// Shortest refresh interval accepted
pub const MIN_TICK_MS: u64 = 100;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "nntime")]
#[command(about = "A stopwatch/clock session server with a live activity companion surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// What the display shows
    #[arg(short, long, value_enum, default_value_t = DisplayMode::Stopwatch)]
    pub mode: DisplayMode,

    /// Display refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Title shown on the live activity
    #[arg(long)]
    pub activity_name: Option<String>,

    /// Run as if live activities were turned off
    #[arg(long)]
    pub no_live_activity: bool,

    /// Draw the display string on the terminal
    #[arg(long)]
    pub render: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Refresh interval, never shorter than [`MIN_TICK_MS`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    /// Live activity title, defaulting to the mode name
    pub fn activity_name(&self) -> String {
        match &self.activity_name {
            Some(name) => name.clone(),
            None => match self.mode {
                DisplayMode::Stopwatch => "Stopwatch".to_string(),
                DisplayMode::Clock => "Clock".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["nntime"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.mode, DisplayMode::Stopwatch);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.activity_name(), "Stopwatch");
        assert_eq!(config.log_level(), "info");
        assert!(!config.no_live_activity);
    }

    #[test]
    fn clock_mode_and_tick_floor() {
        let config = Config::try_parse_from(["nntime", "--mode", "clock", "--tick-ms", "5", "-v"]).unwrap();
        assert_eq!(config.mode, DisplayMode::Clock);
        assert_eq!(config.tick_interval(), Duration::from_millis(MIN_TICK_MS));
        assert_eq!(config.activity_name(), "Clock");
        assert_eq!(config.log_level(), "debug");
    }
}
