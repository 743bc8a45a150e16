//! Pipeline Driver: sequences sandbox extraction, file mapping, tokenization,
//! and similarity detection over one run, owning the scratch directory for
//! its full lifetime and checking a cancellation flag between stages.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::{validate_config, PipelineConfig};
use crate::error::GradewatchError;
use crate::mapper::{self, Mapper};
use crate::sandbox::Sandbox;
use crate::similarity::{self, SimilarityEngine, Submission};
use crate::tokenizer;
use crate::types::{LogEntry, PlagiarismCase, QuestionMapping, Statistics, StudentId, TokenStream};

/// Everything a completed run produces.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub cases: Vec<PlagiarismCase>,
    pub statistics: Statistics,
    pub mapping_summary: Vec<QuestionMapping>,
    pub log: Vec<LogEntry>,
}

/// Run the full pipeline against `config`, returning as soon as a
/// cancellation request is observed between stages.
pub fn run(config: &PipelineConfig, cancel: &Arc<AtomicBool>) -> Result<PipelineOutput, GradewatchError> {
    validate_config(config).map_err(GradewatchError::Config)?;

    let mut log = Vec::new();
    let sandbox = Sandbox::new()?;

    let students = Sandbox::discover_students(&config.root_dir)?;
    if students.is_empty() {
        log.push(LogEntry::warn("no student submission directories found under the input root"));
    }

    check_cancel(cancel)?;

    // Stage 1: extraction, chunked across worker threads.
    let num_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let chunk_size = students.len().div_ceil(num_threads).max(1);

    let extraction_results: Vec<(StudentId, Option<std::path::PathBuf>, Vec<LogEntry>)> =
        std::thread::scope(|s| {
            let handles: Vec<_> = students
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(|| {
                        chunk
                            .iter()
                            .map(|(id, dir)| {
                                let result = sandbox.materialize(dir, id, &config.config);
                                (id.clone(), result.scratch_path, result.errors)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| {
                    h.join().unwrap_or_else(|_| {
                        eprintln!("[WARN] worker thread panicked during extraction");
                        Vec::new()
                    })
                })
                .collect()
        });

    for (_, _, errors) in &extraction_results {
        for entry in errors {
            entry.trace();
        }
    }
    log.extend(extraction_results.iter().flat_map(|(_, _, e)| e.clone()));

    check_cancel(cancel)?;

    // Stage 2: map each student's extracted files to questions, materialize
    // the canonical per-question copy in `output_dir`, and tokenize it.
    let mapper = Mapper::new(config.config.num_questions);
    let template_tokens = load_template(config, &mut log);

    let mut mappings: Vec<QuestionMapping> = Vec::new();
    let mut tokenized: BTreeMap<(u32, StudentId), (TokenStream, std::path::PathBuf)> = BTreeMap::new();

    for (student_id, scratch_path, _) in &extraction_results {
        let Some(scratch_path) = scratch_path else {
            continue;
        };

        let files = collect_source_files(scratch_path, &config.config);
        let mapping = mapper.map_student_files(student_id, &files, &mut log);
        mapper::materialize_mapping(&config.output_dir, &mapping, &mut log);

        for (&question, source_path) in &mapping.assigned {
            let ext = source_path.extension().and_then(|e| e.to_str()).unwrap_or("src");
            let canonical_path = config
                .output_dir
                .join(format!("Q{question}"))
                .join(format!("{student_id}.{ext}"));

            match std::fs::read_to_string(&canonical_path) {
                Ok(source) => {
                    let mut tokens = tokenizer::tokenize(&source, &config.config.sensitivity);
                    if let Some(template) = template_tokens.get(&question) {
                        tokens = tokenizer::subtract_template(&tokens, template);
                    }
                    if tokens.is_live(config.config.min_token_count) {
                        tokenized.insert((question, student_id.clone()), (tokens, canonical_path));
                    } else {
                        log.push(
                            LogEntry::info("file has too few tokens after normalization, excluded from comparison")
                                .with_student(student_id.clone())
                                .with_file(&canonical_path),
                        );
                    }
                }
                Err(e) => {
                    log.push(
                        LogEntry::error(format!("failed to read canonical submission copy: {e}"))
                            .with_student(student_id.clone())
                            .with_file(&canonical_path),
                    );
                }
            }
        }

        mappings.push(mapping);
    }

    check_cancel(cancel)?;

    // Stage 3: pairwise comparison, one question at a time. The engine's
    // similarity cache spans every question compared in this call.
    let engine = SimilarityEngine::new();
    let mut all_cases = Vec::new();
    for question in 1..=config.config.num_questions {
        check_cancel(cancel)?;

        let submissions: Vec<Submission> = tokenized
            .iter()
            .filter(|((q, _), _)| *q == question)
            .map(|((_, student_id), (tokens, path))| Submission {
                student_id: student_id.clone(),
                file_path: path.clone(),
                tokens: tokens.clone(),
            })
            .collect();

        let cases = engine.detect_question(question, &submissions, config.config.similarity_threshold);
        all_cases.extend(cases);
    }

    let statistics = similarity::build_statistics(&all_cases);
    log.push(LogEntry::info(format!(
        "run complete: {} case(s), {} cluster(s)",
        statistics.total_cases,
        statistics.clusters.len()
    )));

    for entry in &log {
        entry.trace();
    }

    Ok(PipelineOutput {
        cases: all_cases,
        statistics,
        mapping_summary: mappings,
        log,
    })
}

fn check_cancel(cancel: &Arc<AtomicBool>) -> Result<(), GradewatchError> {
    if cancel.load(Ordering::SeqCst) {
        Err(GradewatchError::Cancelled)
    } else {
        Ok(())
    }
}

fn collect_source_files(dir: &std::path::Path, config: &crate::config::Config) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut walker = ignore::WalkBuilder::new(dir);
    walker.hidden(false).git_ignore(false);

    for entry in walker.build().flatten() {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if config.has_accepted_extension(ext) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

fn load_template(
    config: &PipelineConfig,
    log: &mut Vec<LogEntry>,
) -> BTreeMap<u32, TokenStream> {
    let mut templates = BTreeMap::new();
    let Some(template_path) = &config.template_path else {
        return templates;
    };

    match std::fs::read_to_string(template_path) {
        Ok(source) => {
            let tokens = tokenizer::tokenize(&source, &config.config.sensitivity);
            // A single template file applies to every question; callers
            // that need per-question templates pass a directory instead.
            for question in 1..=config.config.num_questions {
                templates.insert(question, tokens.clone());
            }
        }
        Err(e) => {
            log.push(LogEntry::warn(format!("failed to read template file: {e}")).with_file(template_path));
        }
    }

    templates
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
