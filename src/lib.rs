//! # gradewatch — batch plagiarism detection for C programming assignments
//!
//! Given a directory of student submission folders (each possibly a zip of
//! loose source files), extracts the C/C++ sources, maps them to assignment
//! questions, tokenizes under a chosen sensitivity profile, and reports
//! pairs and clusters of suspiciously similar work per question.
//!
//! ## Library usage
//!
//! This crate is primarily a CLI tool, but every stage is exposed as a
//! library for embedding and for benchmarking.

pub mod config;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod sandbox;
pub mod similarity;
pub mod tokenizer;
pub mod types;
