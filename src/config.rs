//! Configuration and CLI argument handling

use clap::Parser;

use crate::services::Durations;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "tomato-clock")]
#[command(about = "A state-managed HTTP server for Pomodoro focus timing")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20673")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// User whose focus profile to load
    #[arg(short, long, default_value = "default")]
    pub user: String,

    /// Work phase length in minutes (overrides the profile)
    #[arg(long)]
    pub work: Option<u64>,

    /// Short break length in minutes (overrides the profile)
    #[arg(long)]
    pub short_break: Option<u64>,

    /// Long break length in minutes (overrides the profile)
    #[arg(long)]
    pub long_break: Option<u64>,

    /// Short breaks to complete before a long break is due (overrides the profile)
    #[arg(long)]
    pub long_break_interval: Option<u64>,

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
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Apply CLI duration overrides on top of a looked-up profile
    pub fn merge_durations(&self, profile: Durations) -> Durations {
        Durations {
            work_minutes: self.work.unwrap_or(profile.work_minutes),
            short_break_minutes: self.short_break.unwrap_or(profile.short_break_minutes),
            long_break_minutes: self.long_break.unwrap_or(profile.long_break_minutes),
            long_break_interval: self
                .long_break_interval
                .unwrap_or(profile.long_break_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_profile_without_overrides() {
        let config = Config::try_parse_from(["tomato-clock"]).unwrap();
        let durations = config.merge_durations(Durations::default());
        assert_eq!(durations.work_minutes, 25);
        assert_eq!(durations.long_break_interval, 4);
    }

    #[test]
    fn merge_applies_cli_overrides() {
        let config = Config::try_parse_from([
            "tomato-clock",
            "--work",
            "50",
            "--long-break-interval",
            "2",
        ])
        .unwrap();
        let durations = config.merge_durations(Durations::default());
        assert_eq!(durations.work_minutes, 50);
        assert_eq!(durations.short_break_minutes, 5);
        assert_eq!(durations.long_break_interval, 2);
    }

    #[test]
    fn address_joins_host_and_port() {
        let config = Config::try_parse_from(["tomato-clock", "--host", "127.0.0.1", "-p", "9000"])
            .unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
    }
}
