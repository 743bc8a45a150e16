//! Core data types shared across every pipeline stage.
//!
//! These are plain records with fixed fields, chosen over an ad hoc
//! dynamic dictionary built up at each call site.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The basename of a direct child directory under the input root.
///
/// Kept as a plain `String` alias rather than a newtype: student ids flow
/// through path construction, sorting, and hashing so often that a wrapper
/// would add ceremony without catching any real mistake (nothing else in
/// this crate produces a "student-id-shaped" string by accident).
pub type StudentId = String;

/// An ordered sequence of opaque token symbols produced by the tokenizer.
///
/// Symbols are drawn from three alphabets: upper-cased C keywords, literal
/// C operators, and the generic classes `ID`/`NUM`/`STR` (or, when a
/// sensitivity flag leaves a literal or identifier unnormalized, the raw
/// source text of that token). Template subtraction and the liveness gate
/// both operate on the token list directly — never on a joined string, to
/// avoid splicing a match across a token boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenStream(pub Vec<String>);

impl TokenStream {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True once this stream has at least `min_token_count` tokens.
    pub fn is_live(&self, min_token_count: usize) -> bool {
        self.len() >= min_token_count
    }
}

/// Per-student outcome of Archive Sandbox extraction.
#[derive(Debug)]
pub struct ExtractionResult {
    /// Scratch directory owned by the pipeline; `None` if extraction could
    /// not produce anything usable at all.
    pub scratch_path: Option<PathBuf>,
    /// The student's original directory under the read-only input root.
    pub original_path: PathBuf,
    /// Non-fatal issues encountered while extracting this student.
    pub errors: Vec<LogEntry>,
}

/// Per-student mapping from question number to at most one source file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QuestionMapping {
    pub student_id: StudentId,
    /// question number -> absolute path of the file assigned to it
    pub assigned: std::collections::BTreeMap<u32, PathBuf>,
}

impl QuestionMapping {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            assigned: std::collections::BTreeMap::new(),
        }
    }
}

/// One suspected-plagiarism pair within a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismCase {
    pub question: u32,
    /// Lexicographically smaller of the two student ids.
    pub student_a: StudentId,
    /// Lexicographically larger of the two student ids.
    pub student_b: StudentId,
    /// 0..=100
    pub similarity: f64,
    pub file_a: PathBuf,
    pub file_b: PathBuf,
}

/// A connected component of the plagiarism graph with at least 2 students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: u32,
    /// Sorted, size >= 2.
    pub students: Vec<StudentId>,
}

/// The four similarity buckets used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityHistogram {
    /// [85, 90)
    pub bucket_85_90: u32,
    /// [90, 95)
    pub bucket_90_95: u32,
    /// [95, 99)
    pub bucket_95_99: u32,
    /// [99, 100]
    pub bucket_99_100: u32,
}

impl SimilarityHistogram {
    pub fn record(&mut self, similarity: f64) {
        if similarity >= 99.0 {
            self.bucket_99_100 += 1;
        } else if similarity >= 95.0 {
            self.bucket_95_99 += 1;
        } else if similarity >= 90.0 {
            self.bucket_90_95 += 1;
        } else if similarity >= 85.0 {
            self.bucket_85_90 += 1;
        }
    }
}

/// Aggregate statistics over a full run's [`PlagiarismCase`] list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_cases: usize,
    pub by_question: std::collections::BTreeMap<u32, u32>,
    pub by_student: std::collections::BTreeMap<StudentId, u32>,
    pub histogram: SimilarityHistogram,
    pub clusters: Vec<Cluster>,
}

/// Severity attached to a [`LogEntry`]. Mirrors the recoverable error kinds
/// without forcing every recoverable condition through `GradewatchError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One append-only entry in the run's error/event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub student_id: Option<StudentId>,
    pub file_path: Option<PathBuf>,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            student_id: None,
            file_path: None,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            message: message.into(),
            student_id: None,
            file_path: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
            student_id: None,
            file_path: None,
        }
    }

    pub fn with_student(mut self, student_id: impl Into<StudentId>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Emit the matching `tracing` event at this entry's level.
    pub fn trace(&self) {
        match self.level {
            LogLevel::Info => tracing::info!(student = ?self.student_id, file = ?self.file_path, "{}", self.message),
            LogLevel::Warn => tracing::warn!(student = ?self.student_id, file = ?self.file_path, "{}", self.message),
            LogLevel::Error => tracing::error!(student = ?self.student_id, file = ?self.file_path, "{}", self.message),
        }
    }
}
