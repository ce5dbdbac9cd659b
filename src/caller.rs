//! Outbound call adapter.
//!
//! Turns the opaque handles resolved from the bridge library into typed
//! function pointers, once, and invokes them with the C calling convention.
//! Arguments go through untouched and results come back untouched; no
//! error codes are synthesized or checked here.

use std::ffi::CStr;

use libc::{c_char, c_int};

use crate::error::{BridgeError, Result};
use crate::ffi_types::{
    CreateFn, DestroyFn, EventCallback, FunctionHandle, FunctionHandles, GetSecurityKeyFn,
    InitializeFn, NativeFn, SendEventFn, SendEventWithNumberFn, SendEventWithStringFn,
    SetEventCallbackFn, UninitializeFn,
};
use crate::loader::symbols;

/// Typed entry points of one bridge library instance.
///
/// Every field was reinterpreted from an opaque handle by [`BridgeFunctions::bind`];
/// calling through them is only sound because the binder promised the
/// signatures match.
#[derive(Debug, Clone, Copy)]
pub struct BridgeFunctions {
    create: CreateFn,
    destroy: DestroyFn,
    initialize: InitializeFn,
    uninitialize: UninitializeFn,
    send_event: SendEventFn,
    send_event_with_string: SendEventWithStringFn,
    send_event_with_number: SendEventWithNumberFn,
    set_event_callback: SetEventCallbackFn,
    get_security_key_by_keychain_index: GetSecurityKeyFn,
}

unsafe fn bind_handle<F: NativeFn>(handle: FunctionHandle, symbol: &'static str) -> Result<F> {
    if handle.is_null() {
        return Err(BridgeError::NullHandle { symbol });
    }
    Ok(handle.cast())
}

impl BridgeFunctions {
    /// Reinterpret every handle as the prototype of its entry point.
    ///
    /// Null handles are rejected; nothing else can be checked.
    ///
    /// # Safety
    /// Each handle must point to a function with exactly the prototype
    /// documented on its alias in [`crate::ffi_types`], and must stay valid
    /// for as long as the returned value (or any copy of it) is used.
    pub unsafe fn bind(handles: &FunctionHandles) -> Result<Self> {
        Ok(BridgeFunctions {
            create: bind_handle(handles.create, symbols::CREATE)?,
            destroy: bind_handle(handles.destroy, symbols::DESTROY)?,
            initialize: bind_handle(handles.initialize, symbols::INITIALIZE)?,
            uninitialize: bind_handle(handles.uninitialize, symbols::UNINITIALIZE)?,
            send_event: bind_handle(handles.send_event, symbols::SEND_EVENT)?,
            send_event_with_string: bind_handle(
                handles.send_event_with_string,
                symbols::SEND_EVENT_WITH_STRING,
            )?,
            send_event_with_number: bind_handle(
                handles.send_event_with_number,
                symbols::SEND_EVENT_WITH_NUMBER,
            )?,
            set_event_callback: bind_handle(
                handles.set_event_callback,
                symbols::SET_EVENT_CALLBACK,
            )?,
            get_security_key_by_keychain_index: bind_handle(
                handles.get_security_key_by_keychain_index,
                symbols::GET_SECURITY_KEY_BY_KEYCHAIN_INDEX,
            )?,
        })
    }

    pub fn create(&self, name: &CStr, debuggable: bool, log_path: &CStr) {
        unsafe { (self.create)(name.as_ptr(), debuggable, log_path.as_ptr()) }
    }

    pub fn destroy(&self) {
        unsafe { (self.destroy)() }
    }

    pub fn initialize(&self) -> bool {
        unsafe { (self.initialize)() }
    }

    pub fn uninitialize(&self) {
        unsafe { (self.uninitialize)() }
    }

    /// Send a raw payload.
    ///
    /// # Safety
    /// `data` must address `length` readable bytes for the duration of the
    /// call (or `length` must be 0).
    pub unsafe fn send_event(&self, event_code: u64, data: usize, length: c_int, tag: u64) {
        (self.send_event)(event_code, data, length, tag)
    }

    pub fn send_event_with_string(&self, event_code: u64, data: &CStr, tag: u64) {
        unsafe { (self.send_event_with_string)(event_code, data.as_ptr(), tag) }
    }

    pub fn send_event_with_number(&self, event_code: u64, data: u64, tag: u64) {
        unsafe { (self.send_event_with_number)(event_code, data, tag) }
    }

    /// `None` crosses as a null callback.
    pub fn set_event_callback(&self, event_code: u64, callback: Option<EventCallback>) {
        unsafe { (self.set_event_callback)(event_code, callback) }
    }

    /// Returns the native-owned key buffer as is. It is not copied, freed
    /// or bounded; it stays valid only as long as the library says so.
    pub fn get_security_key_by_keychain_index(&self, index: c_int) -> *const c_char {
        unsafe { (self.get_security_key_by_keychain_index)(index) as *const c_char }
    }
}
