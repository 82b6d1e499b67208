//! Conversions between library-owned C strings and Rust strings.
//!
//! Copyright (c) 2025 Posit, PBC

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;

use crate::error::Failure;

/// Hand a string to C. The pointer must go back through [`release`].
///
/// Interior NUL bytes cannot be represented and are dropped.
pub(crate) fn into_raw(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(c) => c.into_raw(),
        Err(err) => {
            let mut bytes = err.into_vec();
            bytes.retain(|b| *b != 0);
            // SAFETY: every NUL byte was removed above.
            unsafe { CString::from_vec_unchecked(bytes) }.into_raw()
        }
    }
}

/// Free a string previously produced by [`into_raw`]. Null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or come from [`into_raw`] and not have been
/// released already.
pub(crate) unsafe fn release(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Borrow a required caller-owned string field.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn required<'a>(ptr: *const c_char, field: &str) -> Result<&'a str, Failure> {
    if ptr.is_null() {
        return Err(Failure::InvalidArgument(format!("{field} is null")));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| Failure::InvalidArgument(format!("{field} is not valid UTF-8: {e}")))
}

/// Borrow an optional caller-owned string field; null and empty read as `None`.
///
/// # Safety
///
/// Same contract as [`required`].
pub(crate) unsafe fn optional<'a>(
    ptr: *const c_char,
    field: &str,
) -> Result<Option<&'a str>, Failure> {
    if ptr.is_null() {
        return Ok(None);
    }
    let text = unsafe { required(ptr, field) }?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Split a platform path list into its entries, dropping empty ones.
pub(crate) fn split_path_list(list: &str) -> Vec<PathBuf> {
    std::env::split_paths(list)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}
