// FFI-compatible type definitions for the Unity bridge library
//
// These aliases mirror the C prototypes exported by the native bridge
// library, plus the callback prototype the library invokes on the host.
// Aliases that share a C signature are the same Rust type.

use std::ffi::c_void;

use libc::{c_char, c_int};

/// Callback the native library invokes for every subscribed event.
///
/// ```c
/// typedef void (*EventCallback)(uint64_t event_code, uintptr_t data, int length, uint64_t tag);
/// ```
pub type EventCallback = unsafe extern "C" fn(u64, usize, c_int, u64);

/// ```c
/// void CreateUnityBridge(const char *name, bool debuggable, const char *log_path);
/// ```
pub type CreateFn = unsafe extern "C" fn(*const c_char, bool, *const c_char);

/// ```c
/// void DestroyUnityBridge(void);
/// ```
pub type DestroyFn = unsafe extern "C" fn();

/// ```c
/// bool UnityBridgeInitialize(void);
/// ```
pub type InitializeFn = unsafe extern "C" fn() -> bool;

/// ```c
/// void UnityBridgeUninitialze(void);
/// ```
pub type UninitializeFn = unsafe extern "C" fn();

/// ```c
/// void UnitySendEvent(uint64_t event_code, uintptr_t data, int length, uint64_t tag);
/// ```
pub type SendEventFn = unsafe extern "C" fn(u64, usize, c_int, u64);

/// ```c
/// void UnitySendEventWithString(uint64_t event_code, const char *data, uint64_t tag);
/// ```
pub type SendEventWithStringFn = unsafe extern "C" fn(u64, *const c_char, u64);

/// ```c
/// void UnitySendEventWithNumber(uint64_t event_code, uint64_t data, uint64_t tag);
/// ```
pub type SendEventWithNumberFn = unsafe extern "C" fn(u64, u64, u64);

/// A null callback clears the registration on the native side.
///
/// ```c
/// void UnitySetEventCallback(uint64_t event_code, EventCallback event_callback);
/// ```
pub type SetEventCallbackFn = unsafe extern "C" fn(u64, Option<EventCallback>);

/// The native side returns the key as an address; it is read as `char *`.
///
/// ```c
/// uintptr_t UnityGetSecurityKeyByKeyChainIndex(int index);
/// ```
pub type GetSecurityKeyFn = unsafe extern "C" fn(c_int) -> usize;

mod sealed {
    pub trait Sealed {}
}

/// Function pointer types an opaque handle may be reinterpreted as.
pub trait NativeFn: Copy + sealed::Sealed {}

macro_rules! native_fn {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl NativeFn for $ty {}
        )*
    };
}

// DestroyFn covers UninitializeFn and SendEventFn covers EventCallback.
native_fn!(
    CreateFn,
    DestroyFn,
    InitializeFn,
    SendEventFn,
    SendEventWithStringFn,
    SendEventWithNumberFn,
    SetEventCallbackFn,
    GetSecurityKeyFn,
);

/// Untyped address of a native function.
///
/// Carries no signature information. Whoever produced the handle knows,
/// out of band, which prototype it points to.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionHandle(*const c_void);

impl FunctionHandle {
    pub const fn null() -> Self {
        FunctionHandle(std::ptr::null())
    }

    pub fn from_ptr(ptr: *const c_void) -> Self {
        FunctionHandle(ptr)
    }

    pub fn from_addr(addr: usize) -> Self {
        FunctionHandle(addr as *const c_void)
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Reinterpret the address as a function pointer of type `F`.
    ///
    /// # Safety
    /// The handle must be non-null and point to a function whose parameter
    /// and return types match `F` exactly. A mismatch cannot be detected
    /// here and is undefined behaviour once the result is called.
    pub unsafe fn cast<F: NativeFn>(self) -> F {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<*const c_void>()
        );
        std::mem::transmute_copy::<*const c_void, F>(&self.0)
    }
}

impl Default for FunctionHandle {
    fn default() -> Self {
        Self::null()
    }
}

/// The full set of entry points resolved from one bridge library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionHandles {
    pub create: FunctionHandle,
    pub destroy: FunctionHandle,
    pub initialize: FunctionHandle,
    pub uninitialize: FunctionHandle,
    pub send_event: FunctionHandle,
    pub send_event_with_string: FunctionHandle,
    pub send_event_with_number: FunctionHandle,
    pub set_event_callback: FunctionHandle,
    pub get_security_key_by_keychain_index: FunctionHandle,
}
