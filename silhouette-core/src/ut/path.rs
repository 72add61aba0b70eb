// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::error::SilhouetteError;

/// Collect file paths from a directory with an optional substring filter
///
/// Paths are returned sorted so batches are processed in a stable order.
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Lowercase file extensions to include
/// * `substring` - Only include files whose name contains this substring
///
/// # Examples
///
/// ```no_run
/// use silhouette_core::ut::path::collect_file_paths;
/// use silhouette_core::constant::SUPPORTED_MASK_FORMATS;
/// let files = collect_file_paths("directory/", SUPPORTED_MASK_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P: AsRef<Path>>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<String>,
) -> Result<Vec<PathBuf>, SilhouetteError> {
    let directory = directory.as_ref();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| SilhouetteError::DirError(directory.display().to_string()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext.to_lowercase().as_str()))
        })
        .collect();

    if let Some(substring) = substring {
        files.retain(|f| {
            f.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(&substring))
        });
    }

    files.sort();

    Ok(files)
}

/// Return the file stem of a path as an owned string
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}
