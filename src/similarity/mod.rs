//! Similarity Engine: pairwise token-stream comparison within a question,
//! thresholded and deduplicated into [`PlagiarismCase`]s, then clustered.

mod cluster;
mod matcher;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::types::{PlagiarismCase, Statistics, StudentId, TokenStream};

pub use cluster::find_clusters;
pub use matcher::ratio;

/// One student's tokenized file for a single question, ready to compare.
pub struct Submission {
    pub student_id: StudentId,
    pub file_path: PathBuf,
    pub tokens: TokenStream,
}

/// Pair-keyed similarity cache, shared across every question compared by
/// one pipeline run. Keys are the sorted pair of the two submissions'
/// canonical file paths, so the key is order-independent regardless of
/// which side of a pair a caller passes first.
#[derive(Default)]
pub struct SimilarityEngine {
    cache: Mutex<HashMap<(PathBuf, PathBuf), f64>>,
}

impl SimilarityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare every pair of submissions for one question and return the
    /// cases at or above `threshold`, ordered by descending similarity.
    /// Comparisons are split across worker threads the way the rest of this
    /// crate chunks parallel work — no external thread-pool crate. A pair
    /// already scored (by file path, regardless of order) is not recomputed.
    pub fn detect_question(
        &self,
        question: u32,
        submissions: &[Submission],
        threshold: f64,
    ) -> Vec<PlagiarismCase> {
        let pairs: Vec<(usize, usize)> = (0..submissions.len())
            .flat_map(|i| ((i + 1)..submissions.len()).map(move |j| (i, j)))
            .collect();

        if pairs.is_empty() {
            return Vec::new();
        }

        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        let chunk_size = pairs.len().div_ceil(num_threads).max(1);

        let mut cases: Vec<PlagiarismCase> = std::thread::scope(|s| {
            let handles: Vec<_> = pairs
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        let mut found = Vec::new();
                        for &(i, j) in chunk {
                            let a = &submissions[i];
                            let b = &submissions[j];
                            let similarity = self.similarity_for(a, b);
                            if similarity >= threshold {
                                let (student_a, student_b, file_a, file_b) =
                                    if a.student_id <= b.student_id {
                                        (a.student_id.clone(), b.student_id.clone(), a.file_path.clone(), b.file_path.clone())
                                    } else {
                                        (b.student_id.clone(), a.student_id.clone(), b.file_path.clone(), a.file_path.clone())
                                    };
                                found.push(PlagiarismCase {
                                    question,
                                    student_a,
                                    student_b,
                                    similarity,
                                    file_a,
                                    file_b,
                                });
                            }
                        }
                        found
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| {
                    h.join().unwrap_or_else(|_| {
                        eprintln!("[WARN] worker thread panicked during similarity comparison");
                        Vec::new()
                    })
                })
                .collect()
        });

        cases.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        cases
    }

    fn similarity_for(&self, a: &Submission, b: &Submission) -> f64 {
        let key = if a.file_path <= b.file_path {
            (a.file_path.clone(), b.file_path.clone())
        } else {
            (b.file_path.clone(), a.file_path.clone())
        };

        if let Some(&cached) = self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
            return cached;
        }

        let similarity = ratio(&a.tokens, &b.tokens);
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, similarity);
        similarity
    }
}

/// Roll a full run's cases into aggregate statistics. Clustering is global:
/// the plagiarism graph spans every question, so a student connected to
/// another through two different questions' cases lands in one cluster, not
/// two (`cross-question contamination` refers to *comparison*, not to the
/// student-level clustering graph, which is explicitly question-agnostic).
pub fn build_statistics(all_cases: &[PlagiarismCase]) -> Statistics {
    let mut stats = Statistics::default();
    stats.total_cases = all_cases.len();

    for case in all_cases {
        *stats.by_question.entry(case.question).or_insert(0) += 1;
        *stats.by_student.entry(case.student_a.clone()).or_insert(0) += 1;
        *stats.by_student.entry(case.student_b.clone()).or_insert(0) += 1;
        stats.histogram.record(case.similarity);
    }

    stats.clusters = find_clusters(all_cases);

    stats
}

#[cfg(test)]
#[path = "similarity_tests.rs"]
mod tests;
