//! Batch compilation of a directory tree.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::engine::{self, EngineOptions};
use crate::error::Failure;

/// Compile every stylesheet under `search` into `output`, mirroring the
/// directory structure and swapping the extension for `.css`.
///
/// Partials (`_name.scss`) and hidden entries are skipped. The first
/// failure stops the batch; files written before it are left in place.
///
/// Returns the number of stylesheets written.
pub(crate) fn compile_folder(
    search: &Path,
    output: &Path,
    options: &EngineOptions,
) -> Result<usize, Failure> {
    if !search.is_dir() {
        return Err(Failure::Io(format!(
            "search path is not a directory: {}",
            search.display()
        )));
    }

    let mut written = 0;
    for entry in WalkDir::new(search)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry.map_err(|e| Failure::Io(e.to_string()))?;
        if !entry.file_type().is_file() || !is_stylesheet(&entry) || is_partial(&entry) {
            continue;
        }

        let source = entry.path();
        let target = target_path(search, output, source)?;
        let css = engine::compile_path(source, options).map_err(|f| f.in_file(source))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Failure::from(e).in_file(&target))?;
        }
        fs::write(&target, css).map_err(|e| Failure::from(e).in_file(&target))?;

        tracing::debug!(source = %source.display(), target = %target.display(), "wrote stylesheet");
        written += 1;
    }

    Ok(written)
}

fn target_path(search: &Path, output: &Path, source: &Path) -> Result<PathBuf, Failure> {
    let relative = source
        .strip_prefix(search)
        .map_err(|e| Failure::Io(format!("{}: {e}", source.display())))?;
    Ok(output.join(relative).with_extension("css"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn is_partial(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('_'))
}

fn is_stylesheet(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .is_some_and(|ext| ext == "scss" || ext == "sass")
}
