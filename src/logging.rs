// Logging setup for the bridge binary
//
// Library code logs through the `log` facade; the binary installs an
// env_logger backend filtered by a `LogLevel`.

use std::io::Write;

use env_logger::Builder;
use log::{LevelFilter, SetLoggerError};

/// Log levels matching the C enum
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

/// Install the env_logger backend. Fails if another logger is already set.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    Builder::new()
        .filter_level(level.to_level_filter())
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(1), LogLevel::User);
        assert_eq!(LogLevel::from_i32(2), LogLevel::Error);
        assert_eq!(LogLevel::from_i32(3), LogLevel::Warning);
        assert_eq!(LogLevel::from_i32(4), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(5), LogLevel::Debug);
        assert_eq!(LogLevel::from_i32(6), LogLevel::All);
    }

    #[test]
    fn test_log_level_default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_invalid() {
        // Invalid values should default to Info
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(LogLevel::Nothing.to_level_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::User.to_level_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warning.to_level_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::All.to_level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_init_error_carries_context() {
        use anyhow::Context;

        let _ = init(LogLevel::Info);
        let err = init(LogLevel::Warning)
            .context("Failed to install logger")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to install logger");
    }

    #[test]
    fn test_init_twice_fails() {
        // Whichever test installs first wins; the second attempt must fail.
        let _ = init(LogLevel::Info);
        assert!(init(LogLevel::Debug).is_err());
        log::info!("logger installed");
    }
}
