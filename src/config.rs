//! Immutable per-run configuration.
//!
//! Configuration is an immutable value threaded through every call rather
//! than process-wide mutable state, so the same run can't observe two
//! different configs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Flags controlling what the tokenizer normalizes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityProfile {
    pub ignore_variable_names: bool,
    pub ignore_function_names: bool,
    pub ignore_type_names: bool,
    pub ignore_string_literals: bool,
    pub ignore_numeric_literals: bool,
    pub remove_comments: bool,
    pub remove_preprocessor: bool,
    pub normalize_whitespace: bool,
}

impl SensitivityProfile {
    /// Normalize variable and function names; catches the common case of
    /// plagiarism-by-renaming without touching literals or types.
    pub fn smart() -> Self {
        Self {
            ignore_variable_names: true,
            ignore_function_names: true,
            ignore_type_names: false,
            ignore_string_literals: false,
            ignore_numeric_literals: false,
            remove_comments: true,
            remove_preprocessor: true,
            normalize_whitespace: true,
        }
    }

    /// Normalize variable names only.
    pub fn balanced() -> Self {
        Self {
            ignore_variable_names: true,
            ..Self::smart_base()
        }
    }

    /// Preserve every identifier; only exact (modulo whitespace/comments)
    /// matches are caught.
    pub fn strict() -> Self {
        Self::smart_base()
    }

    fn smart_base() -> Self {
        Self {
            ignore_variable_names: false,
            ignore_function_names: false,
            ignore_type_names: false,
            ignore_string_literals: false,
            ignore_numeric_literals: false,
            remove_comments: true,
            remove_preprocessor: true,
            normalize_whitespace: true,
        }
    }

    /// Build a custom profile, starting from `smart()` and overriding only
    /// the fields given.
    #[allow(clippy::too_many_arguments)]
    pub fn custom(
        ignore_variable_names: Option<bool>,
        ignore_function_names: Option<bool>,
        ignore_type_names: Option<bool>,
        ignore_string_literals: Option<bool>,
        ignore_numeric_literals: Option<bool>,
        remove_comments: Option<bool>,
        remove_preprocessor: Option<bool>,
        normalize_whitespace: Option<bool>,
    ) -> Self {
        let mut base = Self::smart();
        if let Some(v) = ignore_variable_names {
            base.ignore_variable_names = v;
        }
        if let Some(v) = ignore_function_names {
            base.ignore_function_names = v;
        }
        if let Some(v) = ignore_type_names {
            base.ignore_type_names = v;
        }
        if let Some(v) = ignore_string_literals {
            base.ignore_string_literals = v;
        }
        if let Some(v) = ignore_numeric_literals {
            base.ignore_numeric_literals = v;
        }
        if let Some(v) = remove_comments {
            base.remove_comments = v;
        }
        if let Some(v) = remove_preprocessor {
            base.remove_preprocessor = v;
        }
        if let Some(v) = normalize_whitespace {
            base.normalize_whitespace = v;
        }
        base
    }
}

impl Default for SensitivityProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Immutable configuration for the detector components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub num_questions: u32,
    /// 0.0..=100.0
    pub similarity_threshold: f64,
    pub min_token_count: usize,
    pub max_extraction_depth: u32,
    pub accepted_extensions: Vec<String>,
    pub archive_extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub sensitivity: SensitivityProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_questions: 1,
            similarity_threshold: 95.0,
            min_token_count: 50,
            max_extraction_depth: 10,
            accepted_extensions: vec!["c".into(), "cpp".into(), "h".into()],
            archive_extensions: vec!["zip".into(), "rar".into(), "7z".into()],
            ignore_patterns: vec![
                "__MACOSX".into(),
                ".DS_Store".into(),
                "Thumbs.db".into(),
                ".git".into(),
            ],
            sensitivity: SensitivityProfile::default(),
        }
    }
}

impl Config {
    pub fn matches_ignore_pattern(&self, path_component: &str) -> bool {
        let lower = path_component.to_lowercase();
        self.ignore_patterns
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
    }

    pub fn has_accepted_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.accepted_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }

    pub fn has_archive_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.archive_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

/// Everything a driver invocation needs beyond the detector parameters
/// themselves: where submissions live, where mapped copies get written,
/// and an optional boilerplate template to subtract from every submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub template_path: Option<PathBuf>,
    pub config: Config,
}

/// Validate a [`PipelineConfig`], returning every violation found (not just
/// the first) so the caller can report all of them at once.
pub fn validate_config(cfg: &PipelineConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !cfg.root_dir.exists() {
        errors.push(format!(
            "root directory does not exist: {}",
            cfg.root_dir.display()
        ));
    }
    if cfg.config.num_questions < 1 {
        errors.push("num_questions must be at least 1".to_string());
    }
    if !(0.0..=100.0).contains(&cfg.config.similarity_threshold) {
        errors.push("similarity_threshold must be between 0 and 100".to_string());
    }
    if cfg.config.min_token_count < 1 {
        errors.push("min_token_count must be at least 1".to_string());
    }
    if cfg.config.max_extraction_depth < 1 {
        errors.push("max_extraction_depth must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
