//! Logging setup for the library and the `sieve` binary.
//!
//! Filter decisions are `trace` events from `pathsieve::filter`, so
//! `RUST_LOG=pathsieve::filter=trace` shows every path tested during a pass.
//! Logs always go to stderr; stdout carries the filtered documents.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log targets enabled at the chosen verbosity: the library and the binary.
const TARGETS: [&str; 2] = ["pathsieve", "sieve"];

/// How much the `sieve` binary logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings, such as rejected raw content.
    #[default]
    Normal,
    /// Filter construction and configuration loading.
    Verbose,
    /// Every filter decision.
    Trace,
}

impl Verbosity {
    /// Verbosity chosen by `-q` and the number of `-v` flags; `-q` wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level logged at this verbosity.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Default filter directives, one per crate target.
    fn directives(self) -> String {
        let level = self.level();
        TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG`, when set, replaces the directives derived from `verbosity`.
/// Calling this again after a subscriber is installed has no effect.
///
/// # Examples
///
/// ```no_run
/// use pathsieve::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose),
        )
        .try_init();
}

/// Route logs to the test harness; `RUST_LOG` applies, warnings otherwise.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
