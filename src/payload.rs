//! Borrowed view over an event payload handed in by the native library.
//!
//! The bytes belong to the native side and are only valid while the
//! callback that produced them is running. A view never copies them and
//! must not be kept past that callback.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use libc::c_int;

/// Pointer, length and capacity of a foreign byte region.
///
/// Capacity always equals length.
#[derive(Clone, Copy)]
pub struct EventPayload<'a> {
    ptr: *const u8,
    len: usize,
    cap: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> EventPayload<'a> {
    /// Build a view from the raw callback arguments.
    ///
    /// A zero or negative `length`, or a null `data`, yields an empty view
    /// that never dereferences the pointer.
    ///
    /// # Safety
    /// When `data` is non-null and `length` is positive, `data` must address
    /// `length` readable bytes that stay valid and unmodified for `'a`.
    pub unsafe fn from_raw(data: usize, length: c_int) -> Self {
        let ptr = data as *const u8;
        let len = if ptr.is_null() {
            0
        } else {
            usize::try_from(length).unwrap_or(0)
        };
        EventPayload {
            ptr,
            len,
            cap: len,
            _marker: PhantomData,
        }
    }

    pub fn from_slice(bytes: &'a [u8]) -> Self {
        EventPayload {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
            cap: bytes.len(),
            _marker: PhantomData,
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        if self.len == 0 {
            return &[];
        }
        // SAFETY: non-empty views come from a non-null pointer the
        // constructor's caller vouched for.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Deref for EventPayload<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for EventPayload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPayload")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("cap", &self.cap)
            .finish()
    }
}
