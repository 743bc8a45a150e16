//! Zip extraction with path-traversal guards and bounded recursion into
//! nested archives. `.rar`/`.7z` are recognized but unsupported — no pure
//! Rust crate in this stack reads them, so they are logged and skipped
//! rather than silently dropped.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;
use crate::types::LogEntry;

/// Extract `archive_path` into `dest_dir`, recursing into any nested
/// archives found inside (up to `config.max_extraction_depth`). `seen`
/// tracks every absolute archive path already extracted during this run, so
/// the same archive reachable from two students (or nested under itself via
/// a symlink loop) is only ever extracted once. Returns the number of
/// accepted-extension files successfully materialized.
pub fn extract_recursive(
    archive_path: &Path,
    dest_dir: &Path,
    config: &Config,
    depth: u32,
    seen: &Mutex<HashSet<PathBuf>>,
    log: &mut Vec<LogEntry>,
) -> usize {
    if depth >= config.max_extraction_depth {
        log.push(
            LogEntry::warn("maximum extraction depth reached, skipping nested archive")
                .with_file(archive_path),
        );
        return 0;
    }

    let canonical = fs::canonicalize(archive_path).unwrap_or_else(|_| archive_path.to_path_buf());
    {
        let mut seen = seen.lock().unwrap_or_else(|e| e.into_inner());
        if !seen.insert(canonical) {
            log.push(
                LogEntry::info("archive already extracted this run, skipping").with_file(archive_path),
            );
            return 0;
        }
    }

    let ext = archive_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ext != "zip" {
        log.push(
            LogEntry::warn(format!("archive format '{ext}' is not supported, skipping"))
                .with_file(archive_path),
        );
        return 0;
    }

    let file = match File::open(archive_path) {
        Ok(f) => f,
        Err(e) => {
            log.push(LogEntry::error(format!("failed to open archive: {e}")).with_file(archive_path));
            return 0;
        }
    };

    let mut archive = match zip::ZipArchive::new(file) {
        Ok(a) => a,
        Err(e) => {
            log.push(LogEntry::error(format!("failed to read archive: {e}")).with_file(archive_path));
            return 0;
        }
    };

    let mut materialized = 0usize;
    let mut nested_archives: Vec<PathBuf> = Vec::new();

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                log.push(LogEntry::warn(format!("corrupt archive entry: {e}")).with_file(archive_path));
                continue;
            }
        };

        if entry.encrypted() {
            log.push(
                LogEntry::warn("archive entry is password-protected, skipping")
                    .with_file(archive_path),
            );
            continue;
        }

        // `enclosed_name` rejects absolute paths and `..` components, the
        // guard against zip-slip path traversal.
        let Some(relative) = entry.enclosed_name() else {
            log.push(
                LogEntry::warn("archive entry has an unsafe path, skipping")
                    .with_file(archive_path),
            );
            continue;
        };

        if relative
            .components()
            .any(|c| config.matches_ignore_pattern(&c.as_os_str().to_string_lossy()))
        {
            continue;
        }

        let out_path = dest_dir.join(&relative);

        if entry.is_dir() {
            if let Err(e) = fs::create_dir_all(&out_path) {
                log.push(LogEntry::error(format!("failed to create directory: {e}")).with_file(&out_path));
            }
            continue;
        }

        if let Some(parent) = out_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log.push(LogEntry::error(format!("failed to create directory: {e}")).with_file(parent));
                continue;
            }
        }

        let mut out_file = match File::create(&out_path) {
            Ok(f) => f,
            Err(e) => {
                log.push(LogEntry::error(format!("failed to create file: {e}")).with_file(&out_path));
                continue;
            }
        };

        if let Err(e) = std::io::copy(&mut entry, &mut out_file) {
            log.push(LogEntry::error(format!("failed to extract entry: {e}")).with_file(&out_path));
            continue;
        }

        let out_ext = out_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if config.has_archive_extension(out_ext) {
            nested_archives.push(out_path);
        } else if config.has_accepted_extension(out_ext) {
            materialized += 1;
        }
    }

    for nested in nested_archives {
        let nested_dest = nested.with_extension("");
        if fs::create_dir_all(&nested_dest).is_ok() {
            materialized += extract_recursive(&nested, &nested_dest, config, depth + 1, seen, log);
            if let Err(e) = move_dir_contents(&nested_dest, dest_dir) {
                log.push(
                    LogEntry::error(format!("failed to promote nested archive contents: {e}"))
                        .with_file(&nested_dest),
                );
            }
            let _ = fs::remove_dir_all(&nested_dest);
        }
        let _ = fs::remove_file(&nested);
    }

    materialized
}

/// Move every entry under `src` into `dst`, preserving relative structure.
/// Used to promote a nested archive's extracted contents up into the
/// student's shared scratch directory once recursion into it is done.
fn move_dir_contents(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            move_dir_contents(&entry.path(), &target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(entry.path(), &target)?;
        }
    }
    Ok(())
}
