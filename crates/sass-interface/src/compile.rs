//! Compile entry points.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Each entry point reads its inputs and options off the context, runs
//! the engine, and writes the outcome back: `output_string` on success,
//! `error_status` plus `error_message` on failure. The status is also
//! returned. Results of an earlier call on the same context are released
//! before new ones are stored.

use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;

use crate::engine::{self, EngineOptions};
use crate::error::Failure;
use crate::folder;
use crate::strings;
use crate::types::{
    SASS_STATUS_INVALID_ARGUMENT, SASS_STATUS_OK, sass_context, sass_file_context,
    sass_folder_context,
};

/// Output and error slots of a context.
struct Slots<'a> {
    output: Option<&'a mut *mut c_char>,
    status: &'a mut c_int,
    message: &'a mut *mut c_char,
}

impl Slots<'_> {
    /// # Safety
    ///
    /// The string slots must hold null or strings produced by this library.
    unsafe fn store(self, result: Result<Option<String>, Failure>) -> c_int {
        unsafe { strings::release(*self.message) };
        *self.message = ptr::null_mut();

        let mut output = self.output;
        if let Some(slot) = output.as_deref_mut() {
            unsafe { strings::release(*slot) };
            *slot = ptr::null_mut();
        }

        match result {
            Ok(css) => {
                if let (Some(slot), Some(css)) = (output, css) {
                    *slot = strings::into_raw(css);
                }
                *self.status = SASS_STATUS_OK;
            }
            Err(failure) => {
                tracing::debug!(status = failure.status(), error = %failure, "compile failed");
                *self.status = failure.status();
                *self.message = strings::into_raw(failure.to_string());
            }
        }
        *self.status
    }
}

/// Compile `source_string` with the context's options.
///
/// # Safety
///
/// `ctx` must be null or a live pointer from
/// [`sass_new_context`](crate::sass_new_context). Its input string fields
/// must be null or NUL-terminated strings that stay valid for the
/// duration of the call.
pub unsafe extern "C" fn sass_compile(ctx: *mut sass_context) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return SASS_STATUS_INVALID_ARGUMENT;
    };
    let _span = tracing::debug_span!("sass_compile").entered();

    let result = unsafe { EngineOptions::read(&ctx.options) }.and_then(|options| {
        let source = unsafe { strings::required(ctx.source_string, "source_string") }?;
        engine::compile_string(source, &options).map(Some)
    });

    let slots = Slots {
        output: Some(&mut ctx.output_string),
        status: &mut ctx.error_status,
        message: &mut ctx.error_message,
    };
    unsafe { slots.store(result) }
}

/// Compile the stylesheet at `input_path` with the context's options.
///
/// # Safety
///
/// Same contract as [`sass_compile`], for a pointer from
/// [`sass_new_file_context`](crate::sass_new_file_context).
pub unsafe extern "C" fn sass_compile_file(ctx: *mut sass_file_context) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return SASS_STATUS_INVALID_ARGUMENT;
    };
    let _span = tracing::debug_span!("sass_compile_file").entered();

    let result = unsafe { EngineOptions::read(&ctx.options) }.and_then(|options| {
        let path = unsafe { strings::required(ctx.input_path, "input_path") }?;
        engine::compile_path(Path::new(path), &options).map(Some)
    });

    let slots = Slots {
        output: Some(&mut ctx.output_string),
        status: &mut ctx.error_status,
        message: &mut ctx.error_message,
    };
    unsafe { slots.store(result) }
}

/// Compile every stylesheet under `search_path` into `output_path`.
///
/// Only the status and error message are written back; the compiled CSS
/// lands on disk.
///
/// # Safety
///
/// Same contract as [`sass_compile`], for a pointer from
/// [`sass_new_folder_context`](crate::sass_new_folder_context).
pub unsafe extern "C" fn sass_compile_folder(ctx: *mut sass_folder_context) -> c_int {
    let Some(ctx) = (unsafe { ctx.as_mut() }) else {
        return SASS_STATUS_INVALID_ARGUMENT;
    };
    let _span = tracing::debug_span!("sass_compile_folder").entered();

    let result = unsafe { EngineOptions::read(&ctx.options) }.and_then(|options| {
        let search = unsafe { strings::required(ctx.search_path, "search_path") }?;
        let output = unsafe { strings::required(ctx.output_path, "output_path") }?;
        let written = folder::compile_folder(Path::new(search), Path::new(output), &options)?;
        tracing::debug!(written, "folder compiled");
        Ok(None)
    });

    let slots = Slots {
        output: None,
        status: &mut ctx.error_status,
        message: &mut ctx.error_message,
    };
    unsafe { slots.store(result) }
}
