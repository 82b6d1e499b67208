//! Compile options and their TOML representation.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Options files use kebab-case keys; every key is optional:
//!
//! ```toml
//! output-style = "compressed"
//! source-comments = "none"
//! include-paths = ["scss/vendor", "scss/shared"]
//! image-path = "assets/img"
//! ```

use std::fmt;
use std::os::raw::c_int;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SassError;

/// Image path used when none is configured.
pub const DEFAULT_IMAGE_PATH: &str = "images";

/// Formatting of the generated CSS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl OutputStyle {
    pub(crate) fn to_raw(self) -> c_int {
        match self {
            OutputStyle::Nested => sass_interface::SASS_STYLE_NESTED,
            OutputStyle::Expanded => sass_interface::SASS_STYLE_EXPANDED,
            OutputStyle::Compact => sass_interface::SASS_STYLE_COMPACT,
            OutputStyle::Compressed => sass_interface::SASS_STYLE_COMPRESSED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }
}

impl FromStr for OutputStyle {
    type Err = SassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nested" => Ok(OutputStyle::Nested),
            "expanded" => Ok(OutputStyle::Expanded),
            "compact" => Ok(OutputStyle::Compact),
            "compressed" => Ok(OutputStyle::Compressed),
            other => Err(SassError::Config(format!("unknown output style '{other}'"))),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the compiler annotates output with source locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceComments {
    #[default]
    None,
    Default,
    Map,
}

impl SourceComments {
    pub(crate) fn to_raw(self) -> c_int {
        match self {
            SourceComments::None => sass_interface::SASS_SOURCE_COMMENTS_NONE,
            SourceComments::Default => sass_interface::SASS_SOURCE_COMMENTS_DEFAULT,
            SourceComments::Map => sass_interface::SASS_SOURCE_COMMENTS_MAP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceComments::None => "none",
            SourceComments::Default => "default",
            SourceComments::Map => "map",
        }
    }
}

impl FromStr for SourceComments {
    type Err = SassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SourceComments::None),
            "default" => Ok(SourceComments::Default),
            "map" => Ok(SourceComments::Map),
            other => Err(SassError::Config(format!(
                "unknown source comments mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SourceComments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options applied to a single compile call.
///
/// The values are copied into a foreign options record for the duration
/// of the call; nothing is retained afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use sass_bindings::{CompileOptions, OutputStyle};
///
/// let options = CompileOptions::new()
///     .with_output_style(OutputStyle::Compressed)
///     .with_include_path("scss/vendor");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompileOptions {
    pub output_style: OutputStyle,
    pub source_comments: SourceComments,
    /// Directories searched, in order, for `@import` targets.
    pub include_paths: Vec<PathBuf>,
    /// Base directory for image assets.
    pub image_path: PathBuf,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_style: OutputStyle::default(),
            source_comments: SourceComments::default(),
            include_paths: Vec::new(),
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
        }
    }
}

impl CompileOptions {
    /// Nested output, no source comments, no include paths, `images` as
    /// the image path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_style(mut self, style: OutputStyle) -> Self {
        self.output_style = style;
        self
    }

    pub fn with_source_comments(mut self, mode: SourceComments) -> Self {
        self.source_comments = mode;
        self
    }

    /// Append a directory to the include search path.
    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = path.into();
        self
    }

    /// Parse options from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SassError> {
        toml::from_str(text).map_err(|e| SassError::Config(e.to_string()))
    }

    /// Read and parse an options file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SassError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded compile options");
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::new();
        assert_eq!(options.output_style, OutputStyle::Nested);
        assert_eq!(options.source_comments, SourceComments::None);
        assert!(options.include_paths.is_empty());
        assert_eq!(options.image_path, PathBuf::from("images"));
    }

    #[test]
    fn test_raw_codes_match_interface() {
        assert_eq!(OutputStyle::Nested.to_raw(), 0);
        assert_eq!(OutputStyle::Expanded.to_raw(), 1);
        assert_eq!(OutputStyle::Compact.to_raw(), 2);
        assert_eq!(OutputStyle::Compressed.to_raw(), 3);
        assert_eq!(SourceComments::None.to_raw(), 0);
        assert_eq!(SourceComments::Default.to_raw(), 1);
        assert_eq!(SourceComments::Map.to_raw(), 2);
    }

    #[test]
    fn test_parse_style_names() {
        for style in [
            OutputStyle::Nested,
            OutputStyle::Expanded,
            OutputStyle::Compact,
            OutputStyle::Compressed,
        ] {
            assert_eq!(style.as_str().parse::<OutputStyle>().unwrap(), style);
        }
        assert!("pretty".parse::<OutputStyle>().is_err());
        assert_eq!("map".parse::<SourceComments>().unwrap(), SourceComments::Map);
    }

    #[test]
    fn test_builder() {
        let options = CompileOptions::new()
            .with_output_style(OutputStyle::Compact)
            .with_source_comments(SourceComments::Default)
            .with_include_path("a")
            .with_include_path("b")
            .with_image_path("img");
        assert_eq!(options.output_style, OutputStyle::Compact);
        assert_eq!(options.source_comments, SourceComments::Default);
        assert_eq!(options.include_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(options.image_path, PathBuf::from("img"));
    }

    #[test]
    fn test_from_toml_partial() {
        let options = CompileOptions::from_toml_str(
            r#"
            output-style = "compressed"
            include-paths = ["vendor", "shared"]
            "#,
        )
        .unwrap();
        assert_eq!(options.output_style, OutputStyle::Compressed);
        assert_eq!(options.source_comments, SourceComments::None);
        assert_eq!(options.include_paths.len(), 2);
        assert_eq!(options.image_path, PathBuf::from(DEFAULT_IMAGE_PATH));
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(CompileOptions::from_toml_str("").unwrap(), CompileOptions::new());
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = CompileOptions::from_toml_str("precision = 5").unwrap_err();
        assert!(matches!(err, SassError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_style() {
        let err = CompileOptions::from_toml_str("output-style = \"pretty\"").unwrap_err();
        assert!(matches!(err, SassError::Config(_)));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sass.toml");
        std::fs::write(&path, "source-comments = \"map\"\nimage-path = \"static\"\n").unwrap();

        let options = CompileOptions::from_toml_file(&path).unwrap();
        assert_eq!(options.source_comments, SourceComments::Map);
        assert_eq!(options.image_path, PathBuf::from("static"));

        let missing = CompileOptions::from_toml_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(SassError::Io(_))));
    }
}
