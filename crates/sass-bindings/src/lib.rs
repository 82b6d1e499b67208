//! Safe bindings for compiling SASS/SCSS to CSS.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate wraps the context-based C ABI of `sass-interface`:
//! - [`CompileOptions`] with [`OutputStyle`] and [`SourceComments`]
//! - [`compile_source`], [`compile_file`] and [`compile_dir`]
//! - [`Compiler`], the same operations bound to one set of options
//! - [`SassError`], carrying the compiler's status code and message
//!
//! Foreign contexts and the strings passed into them are owned for the
//! duration of one call and released on every exit path, so callers
//! never manage foreign memory.

mod compile;
mod context;
mod error;
mod options;

pub use compile::{Compiler, compile_dir, compile_file, compile_source};
pub use error::SassError;
pub use options::{CompileOptions, DEFAULT_IMAGE_PATH, OutputStyle, SourceComments};
