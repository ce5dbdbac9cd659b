use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::event::{UnityEvent, UnityEventType};
use crate::logging::LogLevel;

/// Options for creating and driving a bridge instance
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Instance name passed to CreateUnityBridge
    pub name: String,
    pub debuggable: bool,
    /// Directory the native library writes its own logs to
    pub log_path: String,
    /// Explicit library location; the platform default is used otherwise
    pub library_path: Option<PathBuf>,
    pub security_key_indices: Vec<i32>,
    /// Event codes to subscribe to while the bridge is up
    pub listen: Vec<u64>,
    pub log_level: LogLevel,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            name: "Robomaster".to_string(),
            debuggable: true,
            log_path: "./log".to_string(),
            library_path: None,
            security_key_indices: Vec::new(),
            listen: Vec::new(),
            log_level: LogLevel::default(),
        }
    }
}

/// Parse an event code.
///
/// Accepts a decimal number, a `0x` hex number, or `TYPE:SUBTYPE` where
/// `TYPE` is an event type name or number and `SUBTYPE` a decimal or hex
/// number.
pub fn parse_event_code(s: &str) -> Result<u64> {
    let s = s.trim();

    if let Some((type_part, sub_part)) = s.split_once(':') {
        let event_type = match UnityEventType::from_name(type_part.trim()) {
            Some(t) => t,
            None => UnityEventType::from_u32(
                parse_u64(type_part)?
                    .try_into()
                    .context("Event type does not fit in 32 bits")?,
            ),
        };
        let sub_type: u32 = parse_u64(sub_part)?
            .try_into()
            .context("Event sub type does not fit in 32 bits")?;
        return Ok(UnityEvent::new(event_type, sub_type).code());
    }

    parse_u64(s)
}

fn parse_u64(s: &str) -> Result<u64> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).with_context(|| format!("Invalid hex value: {s}")),
        None => s
            .parse()
            .with_context(|| format!("Invalid numeric value: {s}")),
    }
}
