//! Terminal logger for the `log` facade.
//!
//! Records go to stderr with a short status prefix:
//!
//! | Level | Prefix | Color |
//! |-------|--------|-------|
//! | error | `[!!!]` | red |
//! | warn | `[!]` | yellow |
//! | info | `[+]` | green |
//! | debug/trace | `[*]` | dim |
//!
//! Colors are only emitted when stderr is a terminal.

use std::io::{self, IsTerminal, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const RESET: &str = "\x1b[0m";

/// Logger writing prefixed lines to stderr.
#[derive(Debug)]
pub struct TermLogger {
    level: LevelFilter,
    color: bool,
}

impl TermLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            color: io::stderr().is_terminal(),
        }
    }

    /// Disables ANSI colors regardless of the terminal.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    /// Formats a record as a single line (without the trailing newline).
    pub fn format(&self, record: &Record<'_>) -> String {
        let (prefix, color) = match record.level() {
            Level::Error => ("[!!!]", "\x1b[31m"),
            Level::Warn => ("[!]", "\x1b[33m"),
            Level::Info => ("[+]", "\x1b[32m"),
            Level::Debug | Level::Trace => ("[*]", "\x1b[2m"),
        };

        if self.color {
            format!("{color}{prefix}{RESET} {}", record.args())
        } else {
            format!("{prefix} {}", record.args())
        }
    }
}

impl Log for TermLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Maps the `-v` count to a level filter.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs a [`TermLogger`] as the global logger.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    let level = level_for_verbosity(verbosity);
    log::set_boxed_logger(Box::new(TermLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(logger: &TermLogger, level: Level, msg: &str) -> String {
        logger.format(
            &Record::builder()
                .level(level)
                .args(format_args!("{msg}"))
                .build(),
        )
    }

    #[test]
    fn test_prefixes() {
        let logger = TermLogger::new(LevelFilter::Trace).without_color();
        assert_eq!(line(&logger, Level::Info, "ready"), "[+] ready");
        assert_eq!(line(&logger, Level::Error, "boom"), "[!!!] boom");
        assert_eq!(line(&logger, Level::Warn, "hmm"), "[!] hmm");
        assert_eq!(line(&logger, Level::Debug, "gen 3"), "[*] gen 3");
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = TermLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(5), LevelFilter::Trace);
    }
}
