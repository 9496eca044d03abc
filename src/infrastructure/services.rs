//! Browser-backed implementations of the logging abstractions.

use chrono::DateTime;
use gloo::console;

use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};

/// Writes formatted entries to the browser console
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// Debug builds log everything from `Debug` up
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) { Self::new_development() } else { Self::new_production() }
    }

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if !self.accepts(entry.level) {
            return;
        }

        let formatted = entry.format_line();
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => console::debug!(formatted),
            LogLevel::Info => console::info!(formatted),
            LogLevel::Warn => console::warn!(formatted),
            LogLevel::Error => console::error!(formatted),
        }
    }
}

/// Wall clock from `Date.now()`
#[derive(Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        DateTime::from_timestamp_millis(timestamp as i64)
            .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| timestamp.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_logger_filters_by_level() {
        let logger = ConsoleLogger::new_production();
        assert!(!logger.accepts(LogLevel::Debug));
        assert!(logger.accepts(LogLevel::Warn));
    }

    #[test]
    fn timestamps_format_as_utc_clock() {
        assert_eq!(BrowserTimeProvider::new().format_timestamp(3_723_004), "01:02:03.004");
    }
}
