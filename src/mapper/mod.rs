//! File Mapper: assigns each of a student's source files to at most one
//! question number, by matching filename and path against a set of
//! per-question patterns. Unlike the system this was distilled from, a
//! file that matches more than one question with equal confidence is left
//! unassigned and logged rather than silently taking the first match —
//! grading off a wrong guess is worse than grading off nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::types::{LogEntry, QuestionMapping, StudentId};

const KEYWORD_STEMS: &[&str] = &["q", "question", "soal", "sual", "problem", "ex", "exercise"];

/// One candidate (question, confidence) assignment for a single file,
/// tracked alongside the file path so per-question selection can pick the
/// strongest candidate and break ties by path length.
struct Candidate {
    path: PathBuf,
    confidence: f64,
}

/// The combined pattern for one question number: a single regex matching
/// any of the keyword, filename-anchored, or bracketed/underscored forms,
/// plus the literal keyword forms used for whole-directory-segment
/// equality (checked separately, since it needs a full path component
/// rather than a substring match).
struct QuestionPattern {
    question: u32,
    regex: Regex,
    directory_forms: Vec<String>,
}

/// Builds and applies the per-question pattern set for one run.
pub struct Mapper {
    patterns: Vec<QuestionPattern>,
    num_questions: u32,
}

impl Mapper {
    /// Build patterns for questions `1..=num_questions`.
    pub fn new(num_questions: u32) -> Self {
        let patterns = (1..=num_questions).map(build_pattern_for).collect();
        Self { patterns, num_questions }
    }

    /// Map every accepted-extension file in `files` to a question, logging
    /// and skipping any file whose match is ambiguous. When several of a
    /// student's files match the same question, the one with the highest
    /// confidence wins; ties are broken by shortest path.
    pub fn map_student_files(
        &self,
        student_id: &StudentId,
        files: &[PathBuf],
        log: &mut Vec<LogEntry>,
    ) -> QuestionMapping {
        let mut mapping = QuestionMapping::new(student_id.clone());
        let mut candidates: BTreeMap<u32, Candidate> = BTreeMap::new();

        for file in files {
            match self.match_file(file) {
                MatchOutcome::Matched(question, confidence) => {
                    match candidates.get(&question) {
                        Some(existing) if !beats(confidence, file, existing) => {
                            log.push(
                                LogEntry::warn(format!(
                                    "multiple files map to question {question}, keeping the stronger match {} (skipped {})",
                                    existing.path.display(),
                                    file.display()
                                ))
                                .with_student(student_id.clone())
                                .with_file(file),
                            );
                        }
                        Some(existing) => {
                            log.push(
                                LogEntry::warn(format!(
                                    "multiple files map to question {question}, keeping the stronger match {} (skipped {})",
                                    file.display(),
                                    existing.path.display()
                                ))
                                .with_student(student_id.clone())
                                .with_file(&existing.path),
                            );
                            candidates.insert(
                                question,
                                Candidate {
                                    path: file.clone(),
                                    confidence,
                                },
                            );
                        }
                        None => {
                            candidates.insert(
                                question,
                                Candidate {
                                    path: file.clone(),
                                    confidence,
                                },
                            );
                        }
                    }
                }
                MatchOutcome::Ambiguous(questions) => {
                    log.push(
                        LogEntry::warn(format!(
                            "file matches multiple questions {questions:?} with no clear winner, skipping"
                        ))
                        .with_student(student_id.clone())
                        .with_file(file),
                    );
                }
                MatchOutcome::Unmatched => {
                    log.push(
                        LogEntry::info("file did not match any question pattern")
                            .with_student(student_id.clone())
                            .with_file(file),
                    );
                }
            }
        }

        for (question, candidate) in candidates {
            mapping.assigned.insert(question, candidate.path);
        }

        mapping
    }

    /// Score `file` against every question's pattern. A match against the
    /// filename alone scores 0.9; a match that needs the full path scores
    /// 0.7; an exact directory-segment equality contributes another 0.5 —
    /// the three location tiers from the pattern contract. These are
    /// independent signals, not exclusive tiers: a file that hits both its
    /// question's keyword in the filename AND sits in a matching directory
    /// scores higher than one that only hits one, the combined score capped
    /// at 1.0. If no pattern matches at all, fall back to treating a single
    /// in-range number found anywhere in the path as a weak (0.4) signal.
    fn match_file(&self, file: &Path) -> MatchOutcome {
        let normalized = file.to_string_lossy().to_lowercase().replace('\\', "/");
        let basename = file
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let components: Vec<&str> = normalized.split('/').filter(|c| !c.is_empty()).collect();

        let mut scores: BTreeMap<u32, f64> = BTreeMap::new();

        for pattern in &self.patterns {
            let mut score = 0.0f64;
            if pattern.regex.is_match(&basename) {
                score += 0.9;
            } else if pattern.regex.is_match(&normalized) {
                score += 0.7;
            }
            if components.iter().any(|c| pattern.directory_forms.iter().any(|f| f == c)) {
                score += 0.5;
            }
            if score > 0.0 {
                scores.insert(pattern.question, score.min(1.0));
            }
        }

        if scores.is_empty() {
            return self.match_fallback_number(&normalized);
        }

        pick_winner(scores)
    }

    /// No named pattern matched at all: accept a single in-range number
    /// found anywhere in the path with low confidence, or refuse if more
    /// than one distinct in-range number appears.
    fn match_fallback_number(&self, normalized_path: &str) -> MatchOutcome {
        let mut found: BTreeSet<u32> = BTreeSet::new();
        let mut digits = String::new();
        for c in normalized_path.chars().chain(std::iter::once('\0')) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if !digits.is_empty() {
                if let Ok(n) = digits.parse::<u32>() {
                    if n >= 1 && n <= self.num_questions {
                        found.insert(n);
                    }
                }
                digits.clear();
            }
        }

        match found.len() {
            0 => MatchOutcome::Unmatched,
            1 => MatchOutcome::Matched(*found.iter().next().unwrap(), 0.4),
            _ => MatchOutcome::Ambiguous(found.into_iter().collect()),
        }
    }
}

fn pick_winner(scores: BTreeMap<u32, f64>) -> MatchOutcome {
    let best = scores.values().cloned().fold(f64::MIN, f64::max);
    let winners: Vec<u32> = scores
        .iter()
        .filter(|&(_, &s)| (s - best).abs() < f64::EPSILON)
        .map(|(&q, _)| q)
        .collect();

    if winners.len() == 1 {
        MatchOutcome::Matched(winners[0], best)
    } else {
        MatchOutcome::Ambiguous(winners)
    }
}

/// Materialize the canonical per-question copy the rest of the pipeline
/// reads from: `{output_dir}/Q{q}/{student_id}.{ext}`, overwriting any file
/// already there. The student's original file under scratch is untouched.
pub fn materialize_mapping(output_dir: &Path, mapping: &QuestionMapping, log: &mut Vec<LogEntry>) {
    for (&question, source) in &mapping.assigned {
        let question_dir = output_dir.join(format!("Q{question}"));
        if let Err(e) = std::fs::create_dir_all(&question_dir) {
            log.push(
                LogEntry::error(format!("failed to create output directory: {e}"))
                    .with_student(mapping.student_id.clone())
                    .with_file(&question_dir),
            );
            continue;
        }

        let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("src");
        let dest = question_dir.join(format!("{}.{}", mapping.student_id, ext));
        if let Err(e) = std::fs::copy(source, &dest) {
            log.push(
                LogEntry::error(format!("failed to materialize canonical submission copy: {e}"))
                    .with_student(mapping.student_id.clone())
                    .with_file(source),
            );
        }
    }
}

/// `true` if a candidate at `confidence`/`path` should replace `existing` for
/// the same question slot: higher confidence wins outright; a tie is broken
/// by shortest path, then by lexicographic path for full determinism.
fn beats(confidence: f64, path: &Path, existing: &Candidate) -> bool {
    if (confidence - existing.confidence).abs() > f64::EPSILON {
        return confidence > existing.confidence;
    }
    let path_str = path.to_string_lossy();
    let existing_str = existing.path.to_string_lossy();
    match path_str.len().cmp(&existing_str.len()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => path_str.as_ref() < existing_str.as_ref(),
    }
}

enum MatchOutcome {
    Matched(u32, f64),
    Ambiguous(Vec<u32>),
    Unmatched,
}

/// Build question `q`'s combined regex (keyword, filename-anchored, and
/// bracketed/underscored forms) plus the literal keyword forms used for
/// exact directory-segment equality.
fn build_pattern_for(q: u32) -> QuestionPattern {
    let keyword_alternation = KEYWORD_STEMS
        .iter()
        .map(|stem| format!("{stem}{q}"))
        .collect::<Vec<_>>()
        .join("|");

    // filename-anchored: q (or, for single digits, a zero-padded "0q") must
    // sit right after a path separator or the string start, and right
    // before the extension, another separator, or the string end — the
    // "(^|sep){q}(.ext|sep|$)" shape from the contract. Deliberately
    // stricter than "any non-digit neighbor": a digit embedded in a word
    // (e.g. "attempt_log_3") is not a filename-anchored hit, it falls
    // through to the path-number fallback instead.
    let number_alternation = if q < 10 {
        format!("0?{q}")
    } else {
        q.to_string()
    };

    let combined = format!(
        r"\b({keyword_alternation})\b|[\(\[]{q}[\)\]]|_{q}_|(^|/){number_alternation}(\.[a-z0-9]+$|/|$)"
    );

    let directory_forms = KEYWORD_STEMS.iter().map(|stem| format!("{stem}{q}")).collect();

    QuestionPattern {
        question: q,
        regex: Regex::new(&combined).unwrap(),
        directory_forms,
    }
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;
