//! Owned handles for foreign compile contexts.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A [`ContextGuard`] is created right before a compile call and dropped
//! at the end of it. It owns the raw context pointer together with every
//! `CString` whose pointer was installed into the context, so the foreign
//! record never outlives its inputs and both are released on every exit
//! path. The guard holds a raw pointer and is therefore neither `Send`
//! nor `Sync`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr::NonNull;

use sass_interface::{sass_context, sass_file_context, sass_folder_context, sass_options};

use crate::error::SassError;
use crate::options::CompileOptions;

/// One kind of foreign context and the functions that operate on it.
///
/// # Safety
///
/// `release` and `compile` must accept exactly the pointers returned by
/// `allocate`, and the accessors must read the fields of a live record.
pub(crate) unsafe trait RawContext {
    const KIND: &'static str;

    fn allocate() -> *mut Self;

    /// # Safety
    ///
    /// `ptr` must come from `allocate` and not have been released.
    unsafe fn release(ptr: *mut Self);

    /// # Safety
    ///
    /// `ptr` must be live and its installed strings still valid.
    unsafe fn compile(ptr: *mut Self) -> c_int;

    fn options_mut(&mut self) -> &mut sass_options;
    fn error_status(&self) -> c_int;
    fn error_message(&self) -> *const c_char;
}

/// Contexts that carry compiled CSS back in `output_string`.
pub(crate) trait HasOutput: RawContext {
    fn output_string(&self) -> *const c_char;
}

unsafe impl RawContext for sass_context {
    const KIND: &'static str = "string";

    fn allocate() -> *mut Self {
        sass_interface::sass_new_context()
    }

    unsafe fn release(ptr: *mut Self) {
        unsafe { sass_interface::sass_free_context(ptr) }
    }

    unsafe fn compile(ptr: *mut Self) -> c_int {
        unsafe { sass_interface::sass_compile(ptr) }
    }

    fn options_mut(&mut self) -> &mut sass_options {
        &mut self.options
    }

    fn error_status(&self) -> c_int {
        self.error_status
    }

    fn error_message(&self) -> *const c_char {
        self.error_message
    }
}

impl HasOutput for sass_context {
    fn output_string(&self) -> *const c_char {
        self.output_string
    }
}

unsafe impl RawContext for sass_file_context {
    const KIND: &'static str = "file";

    fn allocate() -> *mut Self {
        sass_interface::sass_new_file_context()
    }

    unsafe fn release(ptr: *mut Self) {
        unsafe { sass_interface::sass_free_file_context(ptr) }
    }

    unsafe fn compile(ptr: *mut Self) -> c_int {
        unsafe { sass_interface::sass_compile_file(ptr) }
    }

    fn options_mut(&mut self) -> &mut sass_options {
        &mut self.options
    }

    fn error_status(&self) -> c_int {
        self.error_status
    }

    fn error_message(&self) -> *const c_char {
        self.error_message
    }
}

impl HasOutput for sass_file_context {
    fn output_string(&self) -> *const c_char {
        self.output_string
    }
}

unsafe impl RawContext for sass_folder_context {
    const KIND: &'static str = "folder";

    fn allocate() -> *mut Self {
        sass_interface::sass_new_folder_context()
    }

    unsafe fn release(ptr: *mut Self) {
        unsafe { sass_interface::sass_free_folder_context(ptr) }
    }

    unsafe fn compile(ptr: *mut Self) -> c_int {
        unsafe { sass_interface::sass_compile_folder(ptr) }
    }

    fn options_mut(&mut self) -> &mut sass_options {
        &mut self.options
    }

    fn error_status(&self) -> c_int {
        self.error_status
    }

    fn error_message(&self) -> *const c_char {
        self.error_message
    }
}

/// Options converted to C strings, ready to be installed into a context.
///
/// Built before any context exists so that conversion failures never
/// allocate foreign memory.
#[derive(Debug)]
pub(crate) struct ForeignOptions {
    output_style: c_int,
    source_comments: c_int,
    include_paths: CString,
    image_path: CString,
}

impl ForeignOptions {
    pub(crate) fn marshal(options: &CompileOptions) -> Result<Self, SassError> {
        let joined = std::env::join_paths(&options.include_paths)
            .map_err(|e| SassError::InvalidInput(format!("include paths: {e}")))?
            .into_string()
            .map_err(|_| SassError::InvalidInput("include paths are not valid UTF-8".into()))?;

        Ok(Self {
            output_style: options.output_style.to_raw(),
            source_comments: options.source_comments.to_raw(),
            include_paths: c_string(joined, "include paths")?,
            image_path: path_c_string(&options.image_path, "image path")?,
        })
    }
}

/// Convert host text for the C side, rejecting interior NUL bytes.
pub(crate) fn c_string(text: impl Into<Vec<u8>>, what: &str) -> Result<CString, SassError> {
    CString::new(text).map_err(|e| {
        SassError::InvalidInput(format!("{what} contains a NUL byte at {}", e.nul_position()))
    })
}

/// Convert a path for the C side; the library expects UTF-8.
pub(crate) fn path_c_string(path: &Path, what: &str) -> Result<CString, SassError> {
    let text = path.to_str().ok_or_else(|| {
        SassError::InvalidInput(format!("{what} is not valid UTF-8: {}", path.display()))
    })?;
    c_string(text, what)
}

/// Single-owner handle to one foreign context.
pub(crate) struct ContextGuard<C: RawContext> {
    raw: NonNull<C>,
    // Declared after `raw`; dropped only after the context is released.
    inputs: Vec<CString>,
}

impl<C: RawContext> ContextGuard<C> {
    pub(crate) fn new() -> Result<Self, SassError> {
        let raw = NonNull::new(C::allocate())
            .ok_or(SassError::ContextAllocation { kind: C::KIND })?;
        tracing::debug!(kind = C::KIND, "acquired context");
        Ok(Self {
            raw,
            inputs: Vec::new(),
        })
    }

    fn record(&self) -> &C {
        // SAFETY: `raw` is live until `drop`, and `&self` prevents aliasing `&mut`.
        unsafe { self.raw.as_ref() }
    }

    pub(crate) fn record_mut(&mut self) -> &mut C {
        // SAFETY: as in `record`, with exclusive access through `&mut self`.
        unsafe { self.raw.as_mut() }
    }

    /// Keep `value` alive for the guard's lifetime and return its pointer.
    pub(crate) fn retain(&mut self, value: CString) -> *const c_char {
        let ptr = value.as_ptr();
        self.inputs.push(value);
        ptr
    }

    pub(crate) fn install_options(&mut self, options: ForeignOptions) {
        let include_paths = self.retain(options.include_paths);
        let image_path = self.retain(options.image_path);
        let record = self.record_mut().options_mut();
        record.output_style = options.output_style;
        record.source_comments = options.source_comments;
        record.include_paths = include_paths;
        record.image_path = image_path;
    }

    /// Run the compile entry point and surface a non-zero status as an error.
    pub(crate) fn compile(&mut self) -> Result<(), SassError> {
        // SAFETY: the record is live and every installed string is in `inputs`.
        let returned = unsafe { C::compile(self.raw.as_ptr()) };
        let record = self.record();
        let status = if returned != 0 {
            returned
        } else {
            record.error_status()
        };
        if status == 0 {
            return Ok(());
        }

        let message = copy_string(record.error_message()).unwrap_or_default();
        Err(SassError::Compile {
            status: i32::from(status),
            message,
        })
    }
}

impl<C: HasOutput> ContextGuard<C> {
    /// Copy the compiled CSS out of foreign memory.
    pub(crate) fn output(&self) -> String {
        copy_string(self.record().output_string()).unwrap_or_default()
    }
}

impl<C: RawContext> Drop for ContextGuard<C> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `C::allocate` and is released only here.
        unsafe { C::release(self.raw.as_ptr()) };
        tracing::debug!(kind = C::KIND, "released context");
    }
}

fn copy_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null strings on a live context are NUL-terminated and
    // owned by the library until the context is released.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sass_interface::lifecycle;

    /// A context kind whose allocator always refuses.
    struct RefusedContext {
        options: sass_options,
    }

    unsafe impl RawContext for RefusedContext {
        const KIND: &'static str = "refused";

        fn allocate() -> *mut Self {
            std::ptr::null_mut()
        }

        unsafe fn release(_ptr: *mut Self) {
            panic!("a context that was never allocated must not be released");
        }

        unsafe fn compile(_ptr: *mut Self) -> c_int {
            panic!("a context that was never allocated must not be compiled");
        }

        fn options_mut(&mut self) -> &mut sass_options {
            &mut self.options
        }

        fn error_status(&self) -> c_int {
            0
        }

        fn error_message(&self) -> *const c_char {
            std::ptr::null()
        }
    }

    #[test]
    fn test_null_allocation_is_context_allocation_error() {
        match ContextGuard::<RefusedContext>::new() {
            Err(SassError::ContextAllocation { kind }) => assert_eq!(kind, "refused"),
            Err(other) => panic!("expected allocation error, got {other:?}"),
            Ok(_) => panic!("expected allocation error, got a guard"),
        }
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let before = lifecycle::snapshot();
        {
            let guard = ContextGuard::<sass_context>::new().unwrap();
            assert_eq!(lifecycle::snapshot().since(before).live(), 1);
            drop(guard);
        }
        let delta = lifecycle::snapshot().since(before);
        assert_eq!(delta.created, 1);
        assert_eq!(delta.destroyed, 1);
    }

    #[test]
    fn test_retained_pointer_is_installed_string() {
        let mut guard = ContextGuard::<sass_context>::new().unwrap();
        let ptr = guard.retain(CString::new(".a { color: red; }").unwrap());
        guard.record_mut().source_string = ptr;
        guard.compile().unwrap();
        assert!(guard.output().contains("color: red"));
    }

    #[test]
    fn test_install_options() {
        let options = CompileOptions::new()
            .with_output_style(crate::OutputStyle::Compressed)
            .with_image_path("img");
        let mut guard = ContextGuard::<sass_file_context>::new().unwrap();
        guard.install_options(ForeignOptions::marshal(&options).unwrap());

        let record = guard.record_mut().options;
        assert_eq!(record.output_style, sass_interface::SASS_STYLE_COMPRESSED);
        let image = unsafe { CStr::from_ptr(record.image_path) };
        assert_eq!(image.to_str().unwrap(), "img");
        let includes = unsafe { CStr::from_ptr(record.include_paths) };
        assert!(includes.to_bytes().is_empty());
    }

    #[test]
    fn test_c_string_rejects_nul() {
        let err = c_string("a\0b", "source").unwrap_err();
        assert!(matches!(err, SassError::InvalidInput(_)));
        assert!(err.to_string().contains("source contains a NUL byte at 1"));
    }
}
