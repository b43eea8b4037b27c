//! Log verbosity and subscriber setup for the binaries.

use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr};
use thiserror::Error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Log level selected with `--verbosity`.
///
/// Accepts a name (`silent`, `error`, `warn`, `info`, `debug`, `trace`) or
/// the matching number `0` to `5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Verbosity {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown verbosity level {0:?}")]
pub struct UnknownVerbosity(pub String);

impl Verbosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Verbosity::Silent => "silent",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Silent => LevelFilter::OFF,
            Verbosity::Error => LevelFilter::ERROR,
            Verbosity::Warn => LevelFilter::WARN,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
            Verbosity::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for Verbosity {
    type Err = UnknownVerbosity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "silent" => Ok(Verbosity::Silent),
            "1" | "error" => Ok(Verbosity::Error),
            "2" | "warn" => Ok(Verbosity::Warn),
            "3" | "info" => Ok(Verbosity::Info),
            "4" | "debug" => Ok(Verbosity::Debug),
            "5" | "trace" => Ok(Verbosity::Trace),
            _ => Err(UnknownVerbosity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Verbosity {
    type Error = UnknownVerbosity;

    fn try_from(value: String) -> Result<Self, <Verbosity as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl From<Verbosity> for String {
    fn from(value: Verbosity) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for `verbosity`, unless `RUST_LOG` is set and valid.
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(spec) = env::var(EnvFilter::DEFAULT_ENV) {
        match EnvFilter::try_new(&spec) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("ignoring invalid {}: {}", EnvFilter::DEFAULT_ENV, e),
        }
    }
    EnvFilter::default().add_directive(verbosity.level_filter().into())
}

/// Installs the global subscriber. Logs go to stderr.
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
