//! Context-based C ABI for compiling SASS/SCSS to CSS.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate exposes the legacy libsass `sass_interface.h` surface on top
//! of the grass compiler:
//! - `#[repr(C)]` records for options and the three context kinds
//!   (string, file, folder)
//! - `sass_new_*` / `sass_free_*` pairs that own each context's memory
//! - `sass_compile*` entry points that report failure through an integer
//!   status plus a message string on the context
//!
//! Every function works on raw pointers and follows C ownership rules:
//! strings written by the library (`output_string`, `error_message`) are
//! released only by the matching `sass_free_*`; input strings stay owned
//! by the caller. Contexts are independent, so separate threads may
//! compile in parallel as long as no context is shared.

mod compile;
mod context;
mod engine;
mod error;
mod folder;
pub mod lifecycle;
mod strings;
mod types;

pub use compile::{sass_compile, sass_compile_file, sass_compile_folder};
pub use context::{
    sass_free_context, sass_free_file_context, sass_free_folder_context, sass_new_context,
    sass_new_file_context, sass_new_folder_context,
};
pub use types::*;
