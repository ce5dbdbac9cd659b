use crate::config::{parse_event_code, BridgeOptions};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Drive a native Unity bridge library from the command line
#[derive(Parser, Debug)]
#[command(name = "unitybridge")]
#[command(version = "0.1.0")]
#[command(about = "Load a Unity bridge library, bring it up and tear it down", long_about = None)]
pub struct Cli {
    /// Path to the bridge library (defaults to the platform location)
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Bridge instance name
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Directory for the native library's own logs
    #[arg(long = "log-path", value_name = "PATH")]
    pub log_path: Option<String>,

    /// Create the bridge with debugging disabled
    #[arg(long = "no-debug")]
    pub no_debug: bool,

    /// Print the security key at this keychain index (repeatable)
    #[arg(short = 'k', long = "security-key-index", value_name = "INDEX")]
    pub security_key_index: Vec<i32>,

    /// Subscribe to an event code and log its deliveries (repeatable)
    #[arg(long, value_name = "CODE")]
    pub listen: Vec<String>,

    /// Numeric log level (0 = nothing .. 6 = all)
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<i32>,

    /// Log everything
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: BridgeOptions) -> Result<BridgeOptions> {
        if let Some(ref library) = self.library {
            opts.library_path = Some(library.clone());
        }

        if let Some(ref name) = self.name {
            if name.is_empty() {
                anyhow::bail!("Bridge name must not be empty");
            }
            opts.name = name.clone();
        }

        if let Some(ref log_path) = self.log_path {
            opts.log_path = log_path.clone();
        }

        if self.no_debug {
            opts.debuggable = false;
        }

        if !self.security_key_index.is_empty() {
            opts.security_key_indices = self.security_key_index.clone();
        }

        for code in &self.listen {
            let parsed =
                parse_event_code(code).with_context(|| format!("Invalid event code '{code}'"))?;
            opts.listen.push(parsed);
        }

        if let Some(level) = self.log_level {
            opts.log_level = LogLevel::from_i32(level);
        }

        if self.verbose {
            opts.log_level = LogLevel::All;
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("unitybridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_arguments_keeps_defaults() {
        let opts = parse(&[])
            .merge_into_options(BridgeOptions::default())
            .unwrap();
        assert_eq!(opts.name, "Robomaster");
        assert!(opts.debuggable);
        assert!(opts.security_key_indices.is_empty());
    }

    #[test]
    fn test_merge_overrides() {
        let opts = parse(&[
            "--library",
            "/opt/lib/libunitybridge.so",
            "--name",
            "S1",
            "--log-path",
            "/tmp/ub",
            "--no-debug",
            "-k",
            "3",
            "-k",
            "5",
            "--listen",
            "PrintLog:0",
            "--listen",
            "0x10",
            "--log-level",
            "2",
        ])
        .merge_into_options(BridgeOptions::default())
        .unwrap();

        assert_eq!(
            opts.library_path,
            Some(PathBuf::from("/opt/lib/libunitybridge.so"))
        );
        assert_eq!(opts.name, "S1");
        assert_eq!(opts.log_path, "/tmp/ub");
        assert!(!opts.debuggable);
        assert_eq!(opts.security_key_indices, vec![3, 5]);
        assert_eq!(opts.listen, vec![200u64 << 32, 0x10]);
        assert_eq!(opts.log_level, LogLevel::Error);
    }

    #[test]
    fn test_verbose_wins() {
        let opts = parse(&["--log-level", "1", "-v"])
            .merge_into_options(BridgeOptions::default())
            .unwrap();
        assert_eq!(opts.log_level, LogLevel::All);
    }

    #[test]
    fn test_invalid_listen_code() {
        assert!(parse(&["--listen", "garbage"])
            .merge_into_options(BridgeOptions::default())
            .is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(parse(&["--name", ""])
            .merge_into_options(BridgeOptions::default())
            .is_err());
    }
}
