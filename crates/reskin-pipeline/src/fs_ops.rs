use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|value| value.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Lists files under `root` matching `extensions`, sorted. A missing root
/// yields an empty list.
pub fn list_files(root: &Path, extensions: &[&str], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.is_dir() {
        return Ok(files);
    }

    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("failed reading directory {}", dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if recursive {
                    queue.push_back(path);
                }
            } else if file_type.is_file() && has_extension(&path, extensions) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Copies matching files from `source_root` into `destination_root`,
/// overwriting existing files. Non-matching files are skipped and directories
/// are only created for files that are copied. Returns the number of files
/// copied.
pub fn copy_filtered(
    source_root: &Path,
    destination_root: &Path,
    recursive: bool,
    extensions: &[&str],
) -> Result<u64> {
    if !source_root.is_dir() {
        anyhow::bail!(
            "source location is not a directory: {}",
            source_root.display()
        );
    }

    fs::create_dir_all(destination_root).with_context(|| {
        format!(
            "failed creating destination directory {}",
            destination_root.display()
        )
    })?;

    let mut copied = 0_u64;
    for from_path in list_files(source_root, extensions, recursive)? {
        let relative = from_path.strip_prefix(source_root).with_context(|| {
            format!(
                "failed deriving relative path {} from {}",
                from_path.display(),
                source_root.display()
            )
        })?;
        let to_path = destination_root.join(relative);
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }
        fs::copy(&from_path, &to_path).with_context(|| {
            format!(
                "failed copying file from {} to {}",
                from_path.display(),
                to_path.display()
            )
        })?;
        copied += 1;
    }

    Ok(copied)
}

/// Removes `path` if present and recreates it empty.
pub fn reset_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed removing directory {}", path.display()))?;
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed creating directory {}", path.display()))
}
