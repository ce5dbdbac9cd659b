//! Errors raised while locating and binding the native bridge library.
//!
//! Calls through a bound bridge never produce these; whatever the native
//! side returns is handed back unchanged.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("platform \"{os}/{arch}\" not supported by Unity Bridge")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("could not load Unity Bridge library at \"{}\": {source}", .path.display())]
    LibraryLoad {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("could not load symbol \"{symbol}\": {source}")]
    MissingSymbol {
        symbol: &'static str,
        source: libloading::Error,
    },

    #[error("symbol \"{symbol}\" resolved to a null address")]
    NullHandle { symbol: &'static str },
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_message() {
        let err = BridgeError::UnsupportedPlatform {
            os: "plan9".to_string(),
            arch: "mips".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "platform \"plan9/mips\" not supported by Unity Bridge"
        );
    }

    #[test]
    fn test_null_handle_message() {
        let err = BridgeError::NullHandle {
            symbol: "UnitySendEvent",
        };
        assert!(err.to_string().contains("UnitySendEvent"));
    }
}
