use crate::utils::error::{PrebundleError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Best-effort absolute form of `path`: the longest existing prefix is
/// canonicalized and the missing tail appended as-is.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            resolve_path(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}

/// True when `dst` is `src` or lies somewhere beneath it.
pub fn is_within(src: &Path, dst: &Path) -> bool {
    resolve_path(dst).starts_with(resolve_path(src))
}

/// Mirrors `src` into `dst`, creating directories as needed and overwriting
/// existing files. Symbolic links are recreated pointing at their resolved
/// target. Returns the number of files and links copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    let copy_err = |source: std::io::Error| PrebundleError::CopyError {
        from: src.display().to_string(),
        to: dst.display().to_string(),
        source,
    };

    if !src.is_dir() {
        return Err(copy_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "source is not a directory",
        )));
    }

    if is_within(src, dst) {
        return Err(copy_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot copy a directory into itself",
        )));
    }

    copy_tree(src, dst)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let copy_err = |source: std::io::Error| PrebundleError::CopyError {
        from: src.display().to_string(),
        to: dst.display().to_string(),
        source,
    };

    fs::create_dir_all(dst).map_err(copy_err)?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(copy_err)? {
        let entry = entry.map_err(copy_err)?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let entry_err = |source: std::io::Error| PrebundleError::CopyError {
            from: src_path.display().to_string(),
            to: dst_path.display().to_string(),
            source,
        };

        let file_type = entry.file_type().map_err(copy_err)?;
        if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path).map_err(entry_err)?;
            tracing::debug!("Linked {}", dst_path.display());
            copied += 1;
        } else if file_type.is_dir() {
            copied += copy_tree(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(entry_err)?;
            tracing::debug!("Copied {}", dst_path.display());
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    let mut target = fs::read_link(src)?;
    // 相對連結改指向原始位置，複製後才不會斷掉
    if target.is_relative() {
        if let Some(parent) = src.parent() {
            target = resolve_path(&parent.join(target));
        }
    }

    if let Ok(existing) = fs::symlink_metadata(dst) {
        if existing.is_dir() {
            fs::remove_dir_all(dst)?;
        } else {
            fs::remove_file(dst)?;
        }
    }

    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_dir() {
        copy_tree(src, dst)
            .map(|_| ())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

/// Names of the regular files directly inside `dir` ending in `.<extension>`,
/// sorted. Subdirectories are not searched.
pub fn discover_entries(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let discovery_err = |source: std::io::Error| PrebundleError::DiscoveryError {
        path: dir.display().to_string(),
        source,
    };

    let suffix = format!(".{}", extension);
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir).map_err(discovery_err)? {
        let entry = entry.map_err(discovery_err)?;
        // 跟隨符號連結，目錄一律略過
        if !entry.path().is_file() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) if name.ends_with(&suffix) => entries.push(name),
            Ok(_) => {}
            Err(name) => {
                tracing::warn!("Skipping non UTF-8 file name: {:?}", name);
            }
        }
    }

    entries.sort();
    Ok(entries)
}
