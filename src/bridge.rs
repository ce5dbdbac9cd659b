//! Host-facing Unity bridge API.
//!
//! [`UnityBridge`] speaks owned Rust types; [`NativeBridge`] implements it
//! on top of the bound entry points, doing only the conversions the C side
//! needs (NUL-terminated text, pointer + length payloads).

use std::ffi::{CStr, CString};
use std::path::Path;
use std::sync::Arc;

use libc::c_int;
use libloading::Library;

use crate::caller::BridgeFunctions;
use crate::error::Result;
use crate::event::UnityEvent;
use crate::handlers::{self, EventCallbackHandler};
use crate::{callback, loader};

pub trait UnityBridge {
    fn create(&self, name: &str, debuggable: bool, log_path: &str);
    fn destroy(&self);
    fn initialize(&self) -> bool;
    fn uninitialize(&self);
    fn send_event(&self, event_code: u64, data: &[u8], tag: u64);
    fn send_event_with_string(&self, event_code: u64, data: &str, tag: u64);
    fn send_event_with_number(&self, event_code: u64, data: u64, tag: u64);
    /// `None` removes the host handler and clears the native registration.
    fn set_event_callback(&self, event_code: u64, handler: Option<Arc<dyn EventCallbackHandler>>);
    fn get_security_key_by_keychain_index(&self, index: i32) -> String;
}

/// Bridge backed by a dynamically loaded library.
///
/// Dropping it unloads the library. The native side may still hold the
/// callback trampoline at that point; if any of its threads deliver an
/// event afterwards the process is in trouble, so call `uninitialize` and
/// `destroy` first.
pub struct NativeBridge {
    functions: BridgeFunctions,
    // Declared last so it is dropped after the function pointers.
    _library: Option<Library>,
}

impl NativeBridge {
    /// Load the library from `path`, or from the platform default location.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => loader::default_library_path()?,
        };

        let (library, handles) = loader::load(&path)?;

        // SAFETY: the handles were resolved from the bridge library by
        // symbol name and each symbol has the prototype it is bound to.
        // The library is kept alive alongside them.
        let functions = unsafe { BridgeFunctions::bind(&handles)? };

        Ok(NativeBridge {
            functions,
            _library: Some(library),
        })
    }

    /// Wrap entry points bound by other means (statically linked, or test
    /// doubles). Their owner keeps them alive.
    pub fn from_functions(functions: BridgeFunctions) -> Self {
        NativeBridge {
            functions,
            _library: None,
        }
    }

    pub fn functions(&self) -> &BridgeFunctions {
        &self.functions
    }
}

/// The native side reads text up to the first NUL, so an interior NUL
/// truncates the value instead of dropping the call.
fn c_string(what: &str, value: &str) -> CString {
    CString::new(value).unwrap_or_else(|err| {
        let nul_pos = err.nul_position();
        log::warn!(
            "{} contains a NUL byte at offset {}; truncated to {:?}",
            what,
            nul_pos,
            &value[..nul_pos]
        );
        CString::new(&value.as_bytes()[..nul_pos]).unwrap_or_default()
    })
}

impl UnityBridge for NativeBridge {
    fn create(&self, name: &str, debuggable: bool, log_path: &str) {
        log::info!("Creating Unity Bridge");
        let c_name = c_string("bridge name", name);
        let c_log_path = c_string("log path", log_path);
        self.functions.create(&c_name, debuggable, &c_log_path);
    }

    fn destroy(&self) {
        log::info!("Destroying Unity Bridge");
        self.functions.destroy();
    }

    fn initialize(&self) -> bool {
        log::info!("Initializing Unity Bridge");
        self.functions.initialize()
    }

    fn uninitialize(&self) {
        log::info!("Uninitializing Unity Bridge");
        self.functions.uninitialize();
    }

    fn send_event(&self, event_code: u64, data: &[u8], tag: u64) {
        let Ok(length) = c_int::try_from(data.len()) else {
            log::error!(
                "payload of {} bytes for {} does not fit the native length type; not sent",
                data.len(),
                UnityEvent::from_code(event_code)
            );
            return;
        };

        let address = if data.is_empty() {
            0
        } else {
            data.as_ptr() as usize
        };

        // SAFETY: `data` outlives the call and holds `length` bytes.
        unsafe { self.functions.send_event(event_code, address, length, tag) };
    }

    fn send_event_with_string(&self, event_code: u64, data: &str, tag: u64) {
        let c_data = c_string("event string", data);
        self.functions.send_event_with_string(event_code, &c_data, tag);
    }

    fn send_event_with_number(&self, event_code: u64, data: u64, tag: u64) {
        self.functions.send_event_with_number(event_code, data, tag);
    }

    fn set_event_callback(&self, event_code: u64, handler: Option<Arc<dyn EventCallbackHandler>>) {
        log::debug!(
            "Setting event callback for {}: {}",
            UnityEvent::from_code(event_code),
            if handler.is_some() { "set" } else { "cleared" }
        );

        let callback = match handler {
            Some(handler) => {
                handlers::register_handler(event_code, handler);
                Some(callback::event_callback())
            }
            None => {
                handlers::unregister_handler(event_code);
                None
            }
        };

        self.functions.set_event_callback(event_code, callback);
    }

    fn get_security_key_by_keychain_index(&self, index: i32) -> String {
        let key = self.functions.get_security_key_by_keychain_index(index);
        if key.is_null() {
            return String::new();
        }
        // SAFETY: non-null keys are NUL-terminated strings owned by the
        // library. They are copied, never freed.
        unsafe { CStr::from_ptr(key) }.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::test_stubs::{self, Recorded};
    use crate::handlers::{clear_handlers, handler_fn, has_handler};
    use serial_test::serial;

    fn bridge() -> NativeBridge {
        test_stubs::take_calls();
        let functions = unsafe { BridgeFunctions::bind(&test_stubs::handles()) }.unwrap();
        NativeBridge::from_functions(functions)
    }

    #[test]
    fn test_lifecycle_calls() {
        let bridge = bridge();
        bridge.create("Robomaster", false, "./log");
        assert!(bridge.initialize());
        bridge.uninitialize();
        bridge.destroy();

        assert_eq!(
            test_stubs::take_calls(),
            vec![
                Recorded::Create {
                    name: "Robomaster".to_string(),
                    debuggable: false,
                    log_path: "./log".to_string(),
                },
                Recorded::Initialize,
                Recorded::Uninitialize,
                Recorded::Destroy,
            ]
        );
    }

    #[test]
    fn test_interior_nul_truncates_text_arguments() {
        let bridge = bridge();
        bridge.create("Robo\0master", true, "./log");
        bridge.send_event_with_string(1, "a\0b", 2);
        assert_eq!(
            test_stubs::take_calls(),
            vec![
                Recorded::Create {
                    name: "Robo".to_string(),
                    debuggable: true,
                    log_path: "./log".to_string(),
                },
                Recorded::SendEventWithString {
                    event_code: 1,
                    data: "a".to_string(),
                    tag: 2,
                },
            ]
        );
    }

    #[test]
    fn test_c_string_leading_nul_is_empty() {
        assert_eq!(c_string("event string", "\0tail").as_bytes(), b"");
        assert_eq!(c_string("event string", "plain").as_bytes(), b"plain");
    }

    #[test]
    fn test_send_event_empty_payload_uses_null() {
        let bridge = bridge();
        bridge.send_event(10, &[], 20);
        assert_eq!(
            test_stubs::take_calls(),
            vec![Recorded::SendEvent {
                event_code: 10,
                data: 0,
                length: 0,
                tag: 20,
                bytes: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_send_event_payload() {
        let bridge = bridge();
        let payload = vec![1u8, 2, 3, 4];
        bridge.send_event(10, &payload, 20);
        assert_eq!(
            test_stubs::take_calls(),
            vec![Recorded::SendEvent {
                event_code: 10,
                data: payload.as_ptr() as usize,
                length: 4,
                tag: 20,
                bytes: payload.clone(),
            }]
        );
    }

    #[test]
    fn test_send_event_with_string_and_number() {
        let bridge = bridge();
        bridge.send_event_with_string(1, "hello", 2);
        bridge.send_event_with_number(3, u64::MAX, 4);
        assert_eq!(
            test_stubs::take_calls(),
            vec![
                Recorded::SendEventWithString {
                    event_code: 1,
                    data: "hello".to_string(),
                    tag: 2,
                },
                Recorded::SendEventWithNumber {
                    event_code: 3,
                    data: u64::MAX,
                    tag: 4,
                },
            ]
        );
    }

    #[test]
    #[serial]
    fn test_set_event_callback_registers_trampoline() {
        clear_handlers();
        let bridge = bridge();

        bridge.set_event_callback(500, Some(handler_fn(|_, _, _| {})));
        assert!(has_handler(500));

        bridge.set_event_callback(500, None);
        assert!(!has_handler(500));

        assert_eq!(
            test_stubs::take_calls(),
            vec![
                Recorded::SetEventCallback {
                    event_code: 500,
                    callback: Some(callback::event_callback() as usize),
                },
                Recorded::SetEventCallback {
                    event_code: 500,
                    callback: None,
                },
            ]
        );
        clear_handlers();
    }

    #[test]
    fn test_security_key_copied() {
        let bridge = bridge();
        assert_eq!(
            bridge.get_security_key_by_keychain_index(3),
            "4d3c2b1a-security-key"
        );
        assert_eq!(bridge.get_security_key_by_keychain_index(1), "");
        assert_eq!(
            test_stubs::take_calls(),
            vec![
                Recorded::GetSecurityKey { index: 3 },
                Recorded::GetSecurityKey { index: 1 },
            ]
        );
    }

    #[test]
    fn test_open_missing_library_fails() {
        let result = NativeBridge::open(Some(Path::new("./no/such/unitybridge.so")));
        assert!(result.is_err());
    }
}
