//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::timer::CueSettings;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "ring-timer")]
#[command(about = "A round-based interval timer daemon for combat-sports training")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Seconds remaining in a round or rest at which the warning cue fires
    #[arg(short, long, default_value = "10")]
    pub warning_threshold: u32,

    /// Start with all cues muted
    #[arg(short, long)]
    pub muted: bool,

    /// Do not hand phase boundaries to the notification outbox when backgrounded
    #[arg(long)]
    pub no_notifications: bool,

    /// Seconds between suspend checks
    #[arg(long, default_value = "5")]
    pub recovery_interval: u64,

    /// Seconds the wall clock must run ahead of the monotonic clock to count as a suspension
    #[arg(long, default_value = "2")]
    pub suspend_gap: u64,

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

    /// Initial cue settings snapshot for the engine
    pub fn cue_settings(&self) -> CueSettings {
        CueSettings {
            muted: self.muted,
            notifications_enabled: !self.no_notifications,
            warning_threshold: self.warning_threshold,
        }
    }

    pub fn recovery_interval(&self) -> Duration {
        Duration::from_secs(self.recovery_interval.max(1))
    }

    pub fn suspend_gap(&self) -> Duration {
        Duration::from_secs(self.suspend_gap)
    }
}
