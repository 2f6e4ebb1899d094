//! Structured logging initialization for the `qb` CLI.
//!
//! Logs always go to stderr so stdout stays reserved for command results.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a verbosity level.
#[must_use]
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "qb=error";
    }
    match verbose {
        0 => "qb=info",
        1 => "qb=debug",
        _ => "qb=trace",
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// JSON lines, for robot mode.
    Json,
    /// Colored, for a human at a terminal.
    Pretty,
    /// Compact without ANSI codes, for redirected stderr.
    Plain,
}

impl LogStyle {
    #[must_use]
    pub const fn select(robot_mode: bool, stderr_is_terminal: bool) -> Self {
        match (robot_mode, stderr_is_terminal) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }
}

/// Initialize the global subscriber from CLI flags.
///
/// `RUST_LOG` overrides the directive picked from `verbose` and `quiet`.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let base = fmt::layer().with_writer(io::stderr);
    let layer: Box<dyn Layer<Registry> + Send + Sync> =
        match LogStyle::select(robot_mode, io::stderr().is_terminal()) {
            LogStyle::Json => base.json().boxed(),
            LogStyle::Pretty => base.with_target(false).boxed(),
            LogStyle::Plain => base.with_target(false).with_ansi(false).compact().boxed(),
        };

    tracing_subscriber::registry().with(layer).with(filter).init();
}
