//! Archive Sandbox: turns a student's raw submission directory (which may
//! contain nested zips, loose source files, or both) into a flat scratch
//! directory of accepted-extension files, under one process-wide temporary
//! root that is destroyed when the run ends.

mod archive;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use crate::config::Config;
use crate::error::GradewatchError;
use crate::types::{ExtractionResult, LogEntry, StudentId};

/// Owns the scratch root for a pipeline run. Extraction is idempotent per
/// student: calling [`Sandbox::materialize`] twice for the same student id
/// is a no-op the second time, returning the first result's scratch path.
pub struct Sandbox {
    root: TempDir,
    extracted: Mutex<HashSet<StudentId>>,
    extracted_archives: Mutex<HashSet<PathBuf>>,
}

impl Sandbox {
    pub fn new() -> Result<Self, GradewatchError> {
        let root = TempDir::new()?;
        Ok(Self {
            root,
            extracted: Mutex::new(HashSet::new()),
            extracted_archives: Mutex::new(HashSet::new()),
        })
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Materialize one student's submission directory into the scratch
    /// root, extracting any archives found and copying loose accepted-
    /// extension files through unchanged.
    pub fn materialize(
        &self,
        student_dir: &Path,
        student_id: &StudentId,
        config: &Config,
    ) -> ExtractionResult {
        let mut already = self.extracted.lock().unwrap_or_else(|e| e.into_inner());
        if already.contains(student_id) {
            return ExtractionResult {
                scratch_path: Some(self.root.path().join(student_id)),
                original_path: student_dir.to_path_buf(),
                errors: Vec::new(),
            };
        }
        already.insert(student_id.clone());
        drop(already);

        let mut log = Vec::new();
        let scratch = self.root.path().join(student_id);

        if let Err(e) = std::fs::create_dir_all(&scratch) {
            log.push(
                LogEntry::error(format!("failed to create scratch directory: {e}"))
                    .with_student(student_id.clone()),
            );
            return ExtractionResult {
                scratch_path: None,
                original_path: student_dir.to_path_buf(),
                errors: log,
            };
        }

        let entries = match std::fs::read_dir(student_dir) {
            Ok(e) => e,
            Err(e) => {
                log.push(
                    LogEntry::error(format!("failed to read submission directory: {e}"))
                        .with_student(student_id.clone())
                        .with_file(student_dir),
                );
                return ExtractionResult {
                    scratch_path: None,
                    original_path: student_dir.to_path_buf(),
                    errors: log,
                };
            }
        };

        let mut materialized = 0usize;

        for entry in entries.flatten() {
            let path = entry.path();
            if config
                .matches_ignore_pattern(&path.file_name().unwrap_or_default().to_string_lossy())
            {
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();

            if path.is_file() && config.has_archive_extension(&ext) {
                materialized +=
                    archive::extract_recursive(&path, &scratch, config, 0, &self.extracted_archives, &mut log);
            } else if path.is_file() && config.has_accepted_extension(&ext) {
                if let Some(name) = path.file_name() {
                    if std::fs::copy(&path, scratch.join(name)).is_ok() {
                        materialized += 1;
                    } else {
                        log.push(
                            LogEntry::warn("failed to copy source file into scratch directory")
                                .with_student(student_id.clone())
                                .with_file(&path),
                        );
                    }
                }
            }
        }

        if materialized <= 1 {
            log.push(
                LogEntry::warn(format!(
                    "only {materialized} accepted source file(s) recovered for this student, submission may be incomplete or misnamed"
                ))
                .with_student(student_id.clone()),
            );
        }

        ExtractionResult {
            scratch_path: Some(scratch),
            original_path: student_dir.to_path_buf(),
            errors: log,
        }
    }

    /// Enumerate direct child directories of `root_dir`, one per student —
    /// a student is a top-level directory under the input root.
    pub fn discover_students(root_dir: &Path) -> std::io::Result<Vec<(StudentId, PathBuf)>> {
        let mut students = Vec::new();
        for entry in std::fs::read_dir(root_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    students.push((name.to_string(), path.clone()));
                }
            }
        }
        students.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(students)
    }
}

#[cfg(test)]
#[path = "sandbox_tests.rs"]
mod tests;
