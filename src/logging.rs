//! Diagnostic logging setup for the CLI.
//!
//! The library only emits `tracing` events; the binary decides where they
//! go. Output is written to stderr so it never mixes with command output.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Raises the level to at least `Debug` when verbose output is requested.
    pub fn with_verbose(self, verbose: bool) -> Self {
        if verbose {
            self.max(LogLevel::Debug)
        } else {
            self
        }
    }
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_level() {
        assert_eq!(LogLevel::Warn.with_verbose(true), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.with_verbose(true), LogLevel::Trace);
        assert_eq!(LogLevel::Error.with_verbose(false), LogLevel::Error);
    }

    #[test]
    fn test_filters() {
        assert_eq!(LogLevel::Info.as_filter(), LevelFilter::INFO);
        assert_eq!(LogLevel::Trace.as_filter(), LevelFilter::TRACE);
    }
}
