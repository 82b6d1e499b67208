//! Translation of `sass_options` onto the grass compiler.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! grass only knows expanded and compressed output. Nested maps to
//! expanded, and compact is produced by collapsing each innermost block
//! of the expanded output onto a single line.

use std::any::Any;
use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};

use crate::error::Failure;
use crate::strings;
use crate::types::{
    SASS_SOURCE_COMMENTS_DEFAULT, SASS_SOURCE_COMMENTS_MAP, SASS_SOURCE_COMMENTS_NONE,
    SASS_STYLE_COMPACT, SASS_STYLE_COMPRESSED, SASS_STYLE_EXPANDED, SASS_STYLE_NESTED,
    sass_options,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Style {
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl TryFrom<c_int> for Style {
    type Error = Failure;

    fn try_from(value: c_int) -> Result<Self, Failure> {
        match value {
            SASS_STYLE_NESTED => Ok(Style::Nested),
            SASS_STYLE_EXPANDED => Ok(Style::Expanded),
            SASS_STYLE_COMPACT => Ok(Style::Compact),
            SASS_STYLE_COMPRESSED => Ok(Style::Compressed),
            other => Err(Failure::InvalidArgument(format!(
                "unknown output style {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceComments {
    None,
    Default,
    Map,
}

impl TryFrom<c_int> for SourceComments {
    type Error = Failure;

    fn try_from(value: c_int) -> Result<Self, Failure> {
        match value {
            SASS_SOURCE_COMMENTS_NONE => Ok(SourceComments::None),
            SASS_SOURCE_COMMENTS_DEFAULT => Ok(SourceComments::Default),
            SASS_SOURCE_COMMENTS_MAP => Ok(SourceComments::Map),
            other => Err(Failure::InvalidArgument(format!(
                "unknown source comments mode {other}"
            ))),
        }
    }
}

/// Owned, validated copy of a `sass_options` record.
#[derive(Debug, Clone)]
pub(crate) struct EngineOptions {
    pub(crate) style: Style,
    pub(crate) source_comments: SourceComments,
    pub(crate) include_paths: Vec<PathBuf>,
    pub(crate) image_path: Option<PathBuf>,
}

impl EngineOptions {
    /// # Safety
    ///
    /// The string fields of `raw` must be null or valid NUL-terminated strings.
    pub(crate) unsafe fn read(raw: &sass_options) -> Result<Self, Failure> {
        let style = Style::try_from(raw.output_style)?;
        let source_comments = SourceComments::try_from(raw.source_comments)?;
        let include_paths = unsafe { strings::optional(raw.include_paths, "include_paths") }?
            .map(strings::split_path_list)
            .unwrap_or_default();
        let image_path = unsafe { strings::optional(raw.image_path, "image_path") }?
            .map(PathBuf::from);

        if source_comments != SourceComments::None {
            tracing::debug!(
                mode = ?source_comments,
                "source comments are not emitted by the grass engine"
            );
        }

        Ok(Self {
            style,
            source_comments,
            include_paths,
            image_path,
        })
    }

    fn grass_options(&self) -> Options<'_> {
        let style = match self.style {
            Style::Compressed => OutputStyle::Compressed,
            Style::Nested | Style::Expanded | Style::Compact => OutputStyle::Expanded,
        };

        tracing::debug!(
            style = ?self.style,
            source_comments = ?self.source_comments,
            image_path = ?self.image_path,
            include_paths = self.include_paths.len(),
            "configuring grass"
        );

        Options::default()
            .load_paths(self.include_paths.as_slice())
            .style(style)
            .quiet(true)
    }

    fn finish(&self, css: String) -> String {
        match self.style {
            Style::Compact => compact(&css),
            _ => css,
        }
    }
}

/// Compile an in-memory stylesheet.
pub(crate) fn compile_string(source: &str, options: &EngineOptions) -> Result<String, Failure> {
    let css = contain_panic(|| Ok(grass::from_string(source, &options.grass_options())?))?;
    Ok(options.finish(css))
}

/// Compile the stylesheet at `path`; imports resolve relative to it first.
pub(crate) fn compile_path(path: &Path, options: &EngineOptions) -> Result<String, Failure> {
    if !path.is_file() {
        return Err(Failure::Io(format!(
            "File to read not found or unreadable: {}",
            path.display()
        )));
    }
    let css = contain_panic(|| Ok(grass::from_path(path, &options.grass_options())?))?;
    Ok(options.finish(css))
}

/// Run an engine call, turning a panic into a stylesheet failure so that
/// it never unwinds across the C boundary.
///
/// Stack overflows abort the process and are not caught here.
fn contain_panic<T>(f: impl FnOnce() -> Result<T, Failure>) -> Result<T, Failure> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::debug!(%message, "engine panicked");
        Err(Failure::Stylesheet(format!("compiler panicked: {message}")))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Collapse every innermost `selector { ... }` block onto one line.
///
/// Outer blocks (`@media`, `@supports`) keep their own lines so that the
/// nesting stays readable.
fn compact(expanded: &str) -> String {
    let mut out = String::with_capacity(expanded.len());
    let mut open: Option<(&str, Vec<&str>)> = None;

    for line in expanded.lines() {
        let trimmed = line.trim();

        if trimmed.ends_with('{') {
            if let Some((header, body)) = open.take() {
                out.push_str(header);
                out.push('\n');
                for decl in body {
                    out.push_str(decl);
                    out.push('\n');
                }
            }
            open = Some((line, Vec::new()));
        } else if trimmed == "}" {
            match open.take() {
                Some((header, body)) => {
                    let selector = header.trim().trim_end_matches('{').trim_end();
                    let indent = &header[..header.len() - header.trim_start().len()];
                    let decls: Vec<&str> = body.iter().map(|d| d.trim()).collect();
                    out.push_str(indent);
                    out.push_str(selector);
                    out.push_str(" { ");
                    if !decls.is_empty() {
                        out.push_str(&decls.join(" "));
                        out.push(' ');
                    }
                    out.push_str("}\n");
                }
                None => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        } else if let Some((_, body)) = open.as_mut() {
            body.push(line);
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}
