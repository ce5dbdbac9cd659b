//! Inbound callback trampoline.
//!
//! The native library only knows how to call a plain C function. This is
//! that function: it rebuilds the payload as a bounded view and hands it to
//! the host handler table. It is the only place a raw payload pointer turns
//! into a length-checked object.

use std::panic::{catch_unwind, AssertUnwindSafe};

use libc::c_int;

use crate::event::UnityEvent;
use crate::ffi_types::EventCallback;
use crate::handlers;
use crate::payload::EventPayload;

/// Entry point registered with `UnitySetEventCallback`.
///
/// Runs the handler synchronously and returns when it does. A panicking
/// handler is logged and stopped here instead of unwinding into native
/// frames.
///
/// # Safety
/// Called by the native library with `data` addressing `length` readable
/// bytes (or `length` 0) valid until this function returns.
#[no_mangle]
pub unsafe extern "C" fn unitybridge_event_callback(
    event_code: u64,
    data: usize,
    length: c_int,
    tag: u64,
) {
    let payload = EventPayload::from_raw(data, length);

    let result = catch_unwind(AssertUnwindSafe(|| {
        handlers::dispatch_event(event_code, payload, tag)
    }));

    if result.is_err() {
        log::error!(
            "event callback handler panicked for {} (tag {})",
            UnityEvent::from_code(event_code),
            tag
        );
    }
}

/// The trampoline as the function pointer type the native library expects.
pub fn event_callback() -> EventCallback {
    unitybridge_event_callback
}
