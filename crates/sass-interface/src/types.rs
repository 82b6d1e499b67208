//! `#[repr(C)]` records and constants of the context ABI.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The layout mirrors the legacy `sass_interface.h` header: one options
//! record shared by three context kinds. Callers write input fields and
//! options, call the matching compile entry point, then read the output
//! and error fields back before freeing the context.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int};
use std::ptr;

pub const SASS_STYLE_NESTED: c_int = 0;
pub const SASS_STYLE_EXPANDED: c_int = 1;
pub const SASS_STYLE_COMPACT: c_int = 2;
pub const SASS_STYLE_COMPRESSED: c_int = 3;

pub const SASS_SOURCE_COMMENTS_NONE: c_int = 0;
pub const SASS_SOURCE_COMMENTS_DEFAULT: c_int = 1;
pub const SASS_SOURCE_COMMENTS_MAP: c_int = 2;

/// Compilation succeeded.
pub const SASS_STATUS_OK: c_int = 0;
/// The stylesheet itself is invalid (syntax error, undefined variable,
/// unresolved import).
pub const SASS_STATUS_STYLESHEET_ERROR: c_int = 1;
/// An input could not be read or an output could not be written.
pub const SASS_STATUS_IO_ERROR: c_int = 2;
/// A field of the context was unusable: null where a string was
/// required, not UTF-8, or an unknown enum value.
pub const SASS_STATUS_INVALID_ARGUMENT: c_int = 3;

/// Options shared by every context kind.
///
/// `include_paths` is a platform path list (`:`-separated on Unix,
/// `;` on Windows). Both string fields may be null.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sass_options {
    pub output_style: c_int,
    pub source_comments: c_int,
    pub include_paths: *const c_char,
    pub image_path: *const c_char,
}

impl Default for sass_options {
    fn default() -> Self {
        Self {
            output_style: SASS_STYLE_NESTED,
            source_comments: SASS_SOURCE_COMMENTS_NONE,
            include_paths: ptr::null(),
            image_path: ptr::null(),
        }
    }
}

/// Compile job for an in-memory stylesheet.
#[repr(C)]
#[derive(Debug)]
pub struct sass_context {
    pub source_string: *const c_char,
    pub output_string: *mut c_char,
    pub options: sass_options,
    pub error_status: c_int,
    pub error_message: *mut c_char,
}

/// Compile job for a stylesheet on disk.
#[repr(C)]
#[derive(Debug)]
pub struct sass_file_context {
    pub input_path: *const c_char,
    pub output_string: *mut c_char,
    pub options: sass_options,
    pub error_status: c_int,
    pub error_message: *mut c_char,
}

/// Batch job compiling every stylesheet under `search_path` into
/// `output_path`.
#[repr(C)]
#[derive(Debug)]
pub struct sass_folder_context {
    pub search_path: *const c_char,
    pub output_path: *const c_char,
    pub options: sass_options,
    pub error_status: c_int,
    pub error_message: *mut c_char,
}

impl sass_context {
    pub(crate) fn empty() -> Self {
        Self {
            source_string: ptr::null(),
            output_string: ptr::null_mut(),
            options: sass_options::default(),
            error_status: SASS_STATUS_OK,
            error_message: ptr::null_mut(),
        }
    }
}

impl sass_file_context {
    pub(crate) fn empty() -> Self {
        Self {
            input_path: ptr::null(),
            output_string: ptr::null_mut(),
            options: sass_options::default(),
            error_status: SASS_STATUS_OK,
            error_message: ptr::null_mut(),
        }
    }
}

impl sass_folder_context {
    pub(crate) fn empty() -> Self {
        Self {
            search_path: ptr::null(),
            output_path: ptr::null(),
            options: sass_options::default(),
            error_status: SASS_STATUS_OK,
            error_message: ptr::null_mut(),
        }
    }
}
