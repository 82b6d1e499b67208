//! Compile operations.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Every operation follows the same sequence: marshal inputs and options
//! into C strings, acquire a context, install the strings, call the
//! entry point, copy results out, release. Nothing is shared between
//! calls, so operations may run concurrently on different threads.

use std::path::Path;

use sass_interface::{sass_context, sass_file_context, sass_folder_context};

use crate::context::{ContextGuard, ForeignOptions, c_string, path_c_string};
use crate::error::SassError;
use crate::options::CompileOptions;

/// Compile SCSS source text to CSS.
///
/// # Errors
///
/// Returns [`SassError::Compile`] with the compiler's status and message
/// if the stylesheet is invalid, [`SassError::InvalidInput`] if
/// `source` contains a NUL byte or an option cannot be converted, or
/// [`SassError::ContextAllocation`] if the compiler cannot allocate a
/// string context.
///
/// # Example
///
/// ```rust,ignore
/// use sass_bindings::{CompileOptions, compile_source};
///
/// let css = compile_source(".nav { .item { color: red; } }", &CompileOptions::new())?;
/// assert!(css.contains(".nav .item"));
/// ```
pub fn compile_source(source: &str, options: &CompileOptions) -> Result<String, SassError> {
    let _span = tracing::debug_span!("compile_source", bytes = source.len()).entered();

    let source = c_string(source, "source")?;
    let foreign = ForeignOptions::marshal(options)?;

    let mut ctx = ContextGuard::<sass_context>::new()?;
    let source = ctx.retain(source);
    ctx.record_mut().source_string = source;
    ctx.install_options(foreign);
    ctx.compile()?;
    Ok(ctx.output())
}

/// Compile the stylesheet at `path` to CSS.
///
/// The compiler reads the file itself; a missing or unreadable file is
/// reported as [`SassError::Compile`].
///
/// # Errors
///
/// Returns an error if:
/// - the file is missing, unreadable, or not a valid stylesheet
///   ([`SassError::Compile`], with the compiler's status and message)
/// - `path` is not valid UTF-8 or contains a NUL byte, or an option cannot
///   be converted ([`SassError::InvalidInput`])
/// - the compiler cannot allocate a file context
///   ([`SassError::ContextAllocation`])
pub fn compile_file(path: impl AsRef<Path>, options: &CompileOptions) -> Result<String, SassError> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("compile_file", path = %path.display()).entered();

    let input = path_c_string(path, "input path")?;
    let foreign = ForeignOptions::marshal(options)?;

    let mut ctx = ContextGuard::<sass_file_context>::new()?;
    let input = ctx.retain(input);
    ctx.record_mut().input_path = input;
    ctx.install_options(foreign);
    ctx.compile()?;
    Ok(ctx.output())
}

/// Compile every stylesheet under `search_path` into `output_path`.
///
/// Outputs mirror the input tree with a `.css` extension; partials
/// (`_name.scss`) are skipped. There is no return value on success: the
/// result is the files written.
///
/// # Errors
///
/// Returns an error if:
/// - `search_path` is not a directory, a stylesheet fails to compile, or
///   an output file cannot be written ([`SassError::Compile`]; the message
///   names the failing file). Outputs written before the failure remain.
/// - either path is not valid UTF-8 or contains a NUL byte, or an option
///   cannot be converted ([`SassError::InvalidInput`])
/// - the compiler cannot allocate a folder context
///   ([`SassError::ContextAllocation`])
pub fn compile_dir(
    search_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<(), SassError> {
    let search_path = search_path.as_ref();
    let output_path = output_path.as_ref();
    let _span = tracing::debug_span!(
        "compile_dir",
        search = %search_path.display(),
        output = %output_path.display()
    )
    .entered();

    let search = path_c_string(search_path, "search path")?;
    let output = path_c_string(output_path, "output path")?;
    let foreign = ForeignOptions::marshal(options)?;

    let mut ctx = ContextGuard::<sass_folder_context>::new()?;
    let search = ctx.retain(search);
    let output = ctx.retain(output);
    let record = ctx.record_mut();
    record.search_path = search;
    record.output_path = output;
    ctx.install_options(foreign);
    ctx.compile()
}

/// A set of compile options bound to the three compile operations.
///
/// # Example
///
/// ```rust,ignore
/// use sass_bindings::{Compiler, CompileOptions, OutputStyle};
///
/// let compiler = Compiler::new(CompileOptions::new().with_output_style(OutputStyle::Compressed));
/// let css = compiler.compile_file("styles/site.scss")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Build a compiler from a TOML options file.
    pub fn from_options_file(path: impl AsRef<Path>) -> Result<Self, SassError> {
        Ok(Self::new(CompileOptions::from_toml_file(path)?))
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile_source(&self, source: &str) -> Result<String, SassError> {
        compile_source(source, &self.options)
    }

    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<String, SassError> {
        compile_file(path, &self.options)
    }

    pub fn compile_dir(
        &self,
        search_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<(), SassError> {
        compile_dir(search_path, output_path, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputStyle;

    #[test]
    fn test_compile_source_simple() {
        let css = compile_source("$primary: #007bff; .btn { color: $primary; }", &CompileOptions::new())
            .unwrap();
        assert!(css.contains(".btn"));
        assert!(css.contains("#007bff"));
    }

    #[test]
    fn test_compile_source_with_mixins() {
        let scss = r#"
            @mixin center {
                display: flex;
                justify-content: center;
            }
            .container {
                @include center;
            }
        "#;
        let css = compile_source(scss, &CompileOptions::new()).unwrap();
        assert!(css.contains(".container"));
        assert!(css.contains("display: flex"));
    }

    #[test]
    fn test_compile_source_error() {
        let err = compile_source(".btn { color: $undefined-variable; }", &CompileOptions::new())
            .unwrap_err();
        assert_eq!(err.status(), Some(sass_interface::SASS_STATUS_STYLESHEET_ERROR));
        match err {
            SassError::Compile { message, .. } => assert!(message.contains("Undefined variable")),
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn test_compile_source_nul_byte() {
        let err = compile_source(".a\0 { color: red; }", &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, SassError::InvalidInput(_)));
    }

    #[test]
    fn test_compiler_uses_its_options() {
        let compiler =
            Compiler::new(CompileOptions::new().with_output_style(OutputStyle::Compressed));
        let css = compiler.compile_source(".a {\n  color: red;\n}\n\n.b { color: blue; }").unwrap();
        assert!(css.contains(".a{color:red}"));
        assert!(!css.contains("\n\n"));
    }
}
