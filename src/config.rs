//! Runtime configuration.
//!
//! Operator inputs come from the command line; engine timing can be tuned
//! through environment variables.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::capture::CaptureFilter;
use crate::error::ConfigError;

const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
const DEFAULT_GROWTH_CAP: u32 = 10;
const DEFAULT_IDLE_WAIT_MS: u64 = 500;

const ENV_POLL_INTERVAL: &str = "THOR_POLL_INTERVAL_MS";
const ENV_GROWTH_CAP: &str = "THOR_GROWTH_CAP";
const ENV_IDLE_WAIT: &str = "THOR_IDLE_WAIT_MS";

/// Timing knobs for the termination engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// How long to watch the mailbox for growth before draining
    pub poll_interval: Duration,
    /// Consecutive growth polls tolerated before acting anyway
    pub growth_cap: u32,
    /// Slice of the blocking wait on an empty mailbox
    pub idle_wait: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            growth_cap: DEFAULT_GROWTH_CAP,
            idle_wait: Duration::from_millis(DEFAULT_IDLE_WAIT_MS),
        }
    }
}

impl EngineSettings {
    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(val) = lookup(ENV_POLL_INTERVAL) {
            settings.poll_interval = Duration::from_millis(parse_env(ENV_POLL_INTERVAL, &val)?);
        }
        if let Some(val) = lookup(ENV_GROWTH_CAP) {
            settings.growth_cap = parse_env(ENV_GROWTH_CAP, &val)?;
        }
        if let Some(val) = lookup(ENV_IDLE_WAIT) {
            settings.idle_wait = Duration::from_millis(parse_env(ENV_IDLE_WAIT, &val)?);
        }

        // A zero wait would turn both the growth poll and the idle wait
        // into busy loops.
        if settings.poll_interval.is_zero() {
            return Err(ConfigError::InvalidEnv {
                var: ENV_POLL_INTERVAL,
                value: "0".to_string(),
            });
        }
        if settings.idle_wait.is_zero() {
            return Err(ConfigError::InvalidEnv {
                var: ENV_IDLE_WAIT,
                value: "0".to_string(),
            });
        }

        Ok(settings)
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

/// Everything the binary needs to start killing connections.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to capture on; `None` asks the operator
    pub interface: Option<String>,
    pub filter: CaptureFilter,
    /// Keep killing matching connections after the first confirmed kill
    pub persist: bool,
    /// Number of `-v` flags given
    pub verbosity: u8,
    pub engine: EngineSettings,
}

impl Config {
    /// Validate operator inputs. A target address or port is mandatory.
    pub fn new(
        interface: Option<String>,
        target_ip: Option<Ipv4Addr>,
        target_port: Option<u16>,
        persist: bool,
        verbosity: u8,
        engine: EngineSettings,
    ) -> Result<Self, ConfigError> {
        let filter = CaptureFilter::new(target_ip, target_port)?;

        Ok(Self {
            interface,
            filter,
            persist,
            verbosity,
            engine,
        })
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn tracing_filter(&self) -> &'static str {
        if self.verbosity >= 2 {
            "thor=debug"
        } else {
            "thor=info"
        }
    }
}
