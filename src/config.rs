//! Process configuration, read once at startup from flags or environment.

use std::time::Duration;

use clap::Args;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Service settings. A zero value means "use the default".
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// Timeout for each token and stream-link request (e.g. 4s, 1500ms)
    #[arg(long, env = "TIMEOUT", default_value = "4s", value_parser = parse_duration, global = true)]
    timeout: Duration,

    /// How often streams are re-resolved; also how long a cached URL stays valid (e.g. 2h, 90m)
    #[arg(
        long,
        env = "REFRESH_INTERVAL",
        default_value = "2h",
        value_parser = parse_duration,
        global = true
    )]
    refresh_interval: Duration,
}

impl Config {
    #[must_use]
    pub fn new(port: u16, timeout: Duration, refresh_interval: Duration) -> Self {
        Self {
            port,
            timeout,
            refresh_interval,
        }
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        non_zero_or(self.timeout, DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        non_zero_or(self.refresh_interval, DEFAULT_REFRESH_INTERVAL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_TIMEOUT, DEFAULT_REFRESH_INTERVAL)
    }
}

fn non_zero_or(value: Duration, default: Duration) -> Duration {
    if value.is_zero() {
        default
    } else {
        value
    }
}

/// Parse a human-readable duration such as `4s`, `100ms`, `2h` or `1h30m`.
pub fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s.trim())
}
