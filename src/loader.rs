//! Locating and opening the native bridge library.
//!
//! The library is opened once and its nine entry points are resolved into
//! opaque handles. Nothing here knows their signatures; that happens when
//! the handles are bound in [`crate::caller`].

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::error::{BridgeError, Result};
use crate::ffi_types::{FunctionHandle, FunctionHandles};

/// Exported symbol names of the bridge library.
pub mod symbols {
    pub const CREATE: &str = "CreateUnityBridge";
    pub const DESTROY: &str = "DestroyUnityBridge";
    pub const INITIALIZE: &str = "UnityBridgeInitialize";
    /// Misspelled in the library itself.
    pub const UNINITIALIZE: &str = "UnityBridgeUninitialze";
    pub const SEND_EVENT: &str = "UnitySendEvent";
    pub const SEND_EVENT_WITH_STRING: &str = "UnitySendEventWithString";
    pub const SEND_EVENT_WITH_NUMBER: &str = "UnitySendEventWithNumber";
    pub const SET_EVENT_CALLBACK: &str = "UnitySetEventCallback";
    pub const GET_SECURITY_KEY_BY_KEYCHAIN_INDEX: &str = "UnityGetSecurityKeyByKeyChainIndex";
}

/// Where each platform ships the bridge library, relative to the working
/// directory.
const LIBRARY_PATHS: &[(&str, &str, &str)] = &[
    ("android", "arm", "./lib/android/arm/libunitybridge.so"),
    ("android", "aarch64", "./lib/android/arm64/libunitybridge.so"),
    (
        "macos",
        "x86_64",
        "./lib/darwin/amd64/unitybridge.bundle/Contents/MacOS/unitybridge",
    ),
    (
        "ios",
        "aarch64",
        "./lib/ios/arm64/unitybridge.framework/unitybridge",
    ),
    ("windows", "x86_64", "./lib/windows/amd64/unitybridge.dll"),
];

pub fn library_path_for(os: &str, arch: &str) -> Result<PathBuf> {
    LIBRARY_PATHS
        .iter()
        .find(|(o, a, _)| *o == os && *a == arch)
        .map(|(_, _, path)| PathBuf::from(*path))
        .ok_or_else(|| BridgeError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

pub fn default_library_path() -> Result<PathBuf> {
    library_path_for(std::env::consts::OS, std::env::consts::ARCH)
}

/// Open the library at `path` and resolve every entry point.
///
/// The returned handles are only valid while the returned `Library` is
/// alive.
pub fn load(path: &Path) -> Result<(Library, FunctionHandles)> {
    log::info!("Loading Unity Bridge library from \"{}\"", path.display());

    // SAFETY: running the library's initialisers is inherent to using it.
    let library = unsafe { Library::new(path) }.map_err(|source| BridgeError::LibraryLoad {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Unity Bridge library loaded. Resolving symbols.");

    let handles = FunctionHandles {
        create: resolve(&library, symbols::CREATE)?,
        destroy: resolve(&library, symbols::DESTROY)?,
        initialize: resolve(&library, symbols::INITIALIZE)?,
        uninitialize: resolve(&library, symbols::UNINITIALIZE)?,
        send_event: resolve(&library, symbols::SEND_EVENT)?,
        send_event_with_string: resolve(&library, symbols::SEND_EVENT_WITH_STRING)?,
        send_event_with_number: resolve(&library, symbols::SEND_EVENT_WITH_NUMBER)?,
        set_event_callback: resolve(&library, symbols::SET_EVENT_CALLBACK)?,
        get_security_key_by_keychain_index: resolve(
            &library,
            symbols::GET_SECURITY_KEY_BY_KEYCHAIN_INDEX,
        )?,
    };

    log::info!("Unity Bridge library symbols loaded.");

    Ok((library, handles))
}

fn resolve(library: &Library, symbol: &'static str) -> Result<FunctionHandle> {
    // The symbol is taken as a bare address; its type is decided later.
    let address = unsafe { library.get::<*const c_void>(symbol.as_bytes()) }
        .map_err(|source| BridgeError::MissingSymbol { symbol, source })?;

    log::debug!("Resolved {} at {:p}", symbol, *address);

    Ok(FunctionHandle::from_ptr(*address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_path_known_platforms() {
        assert_eq!(
            library_path_for("android", "aarch64").unwrap(),
            PathBuf::from("./lib/android/arm64/libunitybridge.so")
        );
        assert_eq!(
            library_path_for("windows", "x86_64").unwrap(),
            PathBuf::from("./lib/windows/amd64/unitybridge.dll")
        );
        assert_eq!(
            library_path_for("ios", "aarch64").unwrap(),
            PathBuf::from("./lib/ios/arm64/unitybridge.framework/unitybridge")
        );
    }

    #[test]
    fn test_library_path_unsupported() {
        match library_path_for("linux", "riscv64") {
            Err(BridgeError::UnsupportedPlatform { os, arch }) => {
                assert_eq!(os, "linux");
                assert_eq!(arch, "riscv64");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_library() {
        let path = Path::new("./definitely/not/here/libunitybridge.so");
        match load(path) {
            Err(BridgeError::LibraryLoad { path: reported, .. }) => {
                assert_eq!(reported, path);
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("loading a missing library succeeded"),
        }
    }

    #[test]
    fn test_symbol_names() {
        assert_eq!(symbols::UNINITIALIZE, "UnityBridgeUninitialze");
        assert_eq!(
            symbols::GET_SECURITY_KEY_BY_KEYCHAIN_INDEX,
            "UnityGetSecurityKeyByKeyChainIndex"
        );
    }
}
