//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file system side of the build and extract actions:
//! packing a project directory into a zip archive and discovering archives
//! produced by earlier builds.
//!
//! 此模块提供构建和解压动作在文件系统方面的功能：
//! 将工程目录打包为 zip 归档，以及查找先前构建生成的归档。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archives every regular file below `root/dir` into `archive`.
/// Entry names are relative to `root` and use `/` separators.
/// On failure the partially written archive is removed.
///
/// # Arguments
/// * `root` - Directory the entry names are relative to
/// * `dir` - Directory to pack, relative to `root`
/// * `archive` - Path of the zip file to create
///
/// # Returns
/// The number of files written into the archive
pub fn archive_directory(root: &Path, dir: &str, archive: &Path) -> Result<usize> {
    let file = File::create(archive)
        .with_context(|| format!("Failed to create archive: {}", archive.display()))?;
    let result = write_archive(file, root, dir, archive);
    if result.is_err() {
        if let Err(e) = fs::remove_file(archive) {
            tracing::warn!("failed to remove incomplete archive {}: {e}", archive.display());
        }
    }
    result
}

fn write_archive(file: File, root: &Path, dir: &str, archive: &Path) -> Result<usize> {
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0;
    for entry in WalkDir::new(root.join(dir)).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk directory: {dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry_name(root, path)?;
        writer
            .start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {name} to archive"))?;
        let mut source =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        io::copy(&mut source, &mut writer)
            .with_context(|| format!("Failed to add {name} to archive"))?;
        count += 1;
    }

    writer
        .finish()
        .with_context(|| format!("Failed to finish archive: {}", archive.display()))?;
    Ok(count)
}

fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Finds the files in `dir` whose names match the glob `pattern`.
///
/// # Arguments
/// * `dir` - Directory to search
/// * `pattern` - File name glob, e.g. `Validation-RTX5-CM3-AC6-*.zip`
pub fn find_archives(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut archives = Vec::new();
    for entry in glob::glob(&full_pattern)
        .with_context(|| format!("Invalid archive pattern: {full_pattern}"))?
    {
        let path = entry.context("Failed to read archive candidate")?;
        if path.is_file() {
            archives.push(path);
        }
    }
    Ok(archives)
}
