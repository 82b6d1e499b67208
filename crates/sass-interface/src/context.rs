//! Allocation and release of the three context kinds.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Contexts are heap records owned by the caller between `sass_new_*` and
//! the matching `sass_free_*`. Output and error strings written into a
//! context belong to the library and are released together with it;
//! input strings belong to the caller and are never freed here.

use std::alloc::{Layout, alloc};
use std::ptr;

use crate::lifecycle;
use crate::strings;
use crate::types::{sass_context, sass_file_context, sass_folder_context};

/// Move `record` into a fresh heap allocation, or return null when the
/// allocator refuses. The memory is compatible with `Box::from_raw`.
fn allocate<T>(record: T, kind: &'static str) -> *mut T {
    let layout = Layout::new::<T>();
    // SAFETY: context records are never zero-sized.
    let raw = unsafe { alloc(layout) }.cast::<T>();
    if raw.is_null() {
        tracing::debug!(kind, "context allocation failed");
        return ptr::null_mut();
    }
    // SAFETY: `raw` is non-null, aligned and sized for `T`.
    unsafe { raw.write(record) };
    lifecycle::record_created();
    tracing::debug!(kind, "context created");
    raw
}

/// Allocate a context for compiling an in-memory stylesheet.
///
/// Returns null if the context cannot be allocated.
pub extern "C" fn sass_new_context() -> *mut sass_context {
    allocate(sass_context::empty(), "string")
}

/// Allocate a context for compiling a stylesheet on disk.
///
/// Returns null if the context cannot be allocated.
pub extern "C" fn sass_new_file_context() -> *mut sass_file_context {
    allocate(sass_file_context::empty(), "file")
}

/// Allocate a context for compiling a directory of stylesheets.
///
/// Returns null if the context cannot be allocated.
pub extern "C" fn sass_new_folder_context() -> *mut sass_folder_context {
    allocate(sass_folder_context::empty(), "folder")
}

/// Release a context and the strings the library wrote into it.
///
/// # Safety
///
/// `ctx` must be null or a pointer returned by [`sass_new_context`] that
/// has not been freed yet.
pub unsafe extern "C" fn sass_free_context(ctx: *mut sass_context) {
    if ctx.is_null() {
        return;
    }
    let ctx = unsafe { Box::from_raw(ctx) };
    unsafe {
        strings::release(ctx.output_string);
        strings::release(ctx.error_message);
    }
    lifecycle::record_destroyed();
    tracing::debug!(kind = "string", "context released");
}

/// Release a file context and the strings the library wrote into it.
///
/// # Safety
///
/// `ctx` must be null or a pointer returned by [`sass_new_file_context`]
/// that has not been freed yet.
pub unsafe extern "C" fn sass_free_file_context(ctx: *mut sass_file_context) {
    if ctx.is_null() {
        return;
    }
    let ctx = unsafe { Box::from_raw(ctx) };
    unsafe {
        strings::release(ctx.output_string);
        strings::release(ctx.error_message);
    }
    lifecycle::record_destroyed();
    tracing::debug!(kind = "file", "context released");
}

/// Release a folder context and its error message.
///
/// # Safety
///
/// `ctx` must be null or a pointer returned by [`sass_new_folder_context`]
/// that has not been freed yet.
pub unsafe extern "C" fn sass_free_folder_context(ctx: *mut sass_folder_context) {
    if ctx.is_null() {
        return;
    }
    let ctx = unsafe { Box::from_raw(ctx) };
    unsafe { strings::release(ctx.error_message) };
    lifecycle::record_destroyed();
    tracing::debug!(kind = "folder", "context released");
}
