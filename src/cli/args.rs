//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Batch plagiarism detection for C programming assignments.
#[derive(Parser, Debug)]
#[command(name = "gradewatch", version, about, after_help = "\
Run 'gradewatch --help' for detailed options.\n\
Submissions are read from --root, one subdirectory per student; a report is printed to stdout as JSON.")]
pub struct RunArgs {
    /// Directory containing one subdirectory per student submission.
    #[arg(short, long)]
    pub root: PathBuf,

    /// Directory written to for organized, mapped submission copies.
    #[arg(short, long, default_value = "./gradewatch-output")]
    pub output: PathBuf,

    /// Number of questions in the assignment.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub questions: u32,

    /// Similarity percentage (0-100) at or above which a pair is reported.
    #[arg(short = 't', long, default_value_t = 95.0)]
    pub threshold: f64,

    /// Minimum token count a file must have, after normalization, to be compared.
    #[arg(long, default_value_t = 50)]
    pub min_tokens: usize,

    /// Maximum recursion depth when extracting nested archives.
    #[arg(long, default_value_t = 10)]
    pub max_depth: u32,

    /// Identifier/literal normalization profile.
    #[arg(long, value_enum, default_value_t = ProfileArg::Balanced)]
    pub profile: ProfileArg,

    /// Optional boilerplate/skeleton source file to subtract from every submission.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ProfileArg {
    Smart,
    Balanced,
    Strict,
}
