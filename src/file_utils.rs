use crate::error::{ConvertError, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension helpers for paths used in log lines and extension checks.
pub trait PathExt {
    /// File name only, falling back to the full path when there is none.
    fn format_for_log(&self) -> String;

    /// Case-insensitive extension match against a list without dots.
    fn has_extension_in(&self, extensions: &[&str]) -> bool;
}

impl PathExt for Path {
    fn format_for_log(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }

    fn has_extension_in(&self, extensions: &[&str]) -> bool {
        self.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext_str| {
                let ext_lower = ext_str.to_lowercase();
                extensions.contains(&ext_lower.as_str())
            })
            .unwrap_or(false)
    }
}

/// Derives `<output_dir>/<input stem>.<extension>`.
pub fn output_path_for(input: &Path, output_dir: &Path, extension: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ConvertError::InvalidInput(input.to_path_buf()))?;

    let mut file_name = OsString::from(stem);
    file_name.push(".");
    file_name.push(extension);
    Ok(output_dir.join(file_name))
}

/// Returns `true` when `path` is a regular file with at least one byte.
pub fn is_nonempty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
