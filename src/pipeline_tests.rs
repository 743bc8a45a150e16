use super::*;
use crate::config::Config;
use std::fs;
use std::sync::atomic::AtomicBool;

fn write_student(root: &std::path::Path, id: &str, files: &[(&str, &str)]) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn base_config(root: std::path::PathBuf, output: std::path::PathBuf) -> PipelineConfig {
    PipelineConfig {
        root_dir: root,
        output_dir: output,
        template_path: None,
        config: Config {
            num_questions: 1,
            similarity_threshold: 90.0,
            min_token_count: 1,
            ..Config::default()
        },
    }
}

#[test]
fn test_run_detects_identical_submissions() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_student(root.path(), "alice", &[("q1.c", "int main() { return 1; }")]);
    write_student(root.path(), "bob", &[("q1.c", "int main() { return 1; }")]);

    let config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    let cancel = Arc::new(AtomicBool::new(false));
    let output = run(&config, &cancel).unwrap();

    assert_eq!(output.cases.len(), 1);
    assert_eq!(output.cases[0].student_a, "alice");
    assert_eq!(output.cases[0].student_b, "bob");
    assert!(output.cases[0].file_a.starts_with(out.path()));
    assert!(output.cases[0].file_b.starts_with(out.path()));
}

#[test]
fn test_run_with_no_students_produces_empty_output() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    let cancel = Arc::new(AtomicBool::new(false));
    let output = run(&config, &cancel).unwrap();

    assert!(output.cases.is_empty());
    assert!(output.log.iter().any(|e| e.message.contains("no student submission")));
}

#[test]
fn test_run_rejects_invalid_config() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    config.config.num_questions = 0;
    let cancel = Arc::new(AtomicBool::new(false));
    let err = run(&config, &cancel).unwrap_err();
    assert!(matches!(err, GradewatchError::Config(_)));
}

#[test]
fn test_run_honors_cancellation() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_student(root.path(), "alice", &[("q1.c", "int main() {}")]);
    let config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    let cancel = Arc::new(AtomicBool::new(true));
    let err = run(&config, &cancel).unwrap_err();
    assert!(matches!(err, GradewatchError::Cancelled));
}

#[test]
fn test_run_excludes_short_files_from_comparison() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_student(root.path(), "alice", &[("q1.c", "int x;")]);
    write_student(root.path(), "bob", &[("q1.c", "int x;")]);

    let mut config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    config.config.min_token_count = 50;
    let cancel = Arc::new(AtomicBool::new(false));
    let output = run(&config, &cancel).unwrap();

    assert!(output.cases.is_empty());
    assert!(output.log.iter().any(|e| e.message.contains("too few tokens")));
}

#[test]
fn test_run_materializes_canonical_copies_under_output_dir() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_student(root.path(), "alice", &[("q1.c", "int main() { return 1; }")]);

    let config = base_config(root.path().to_path_buf(), out.path().to_path_buf());
    let cancel = Arc::new(AtomicBool::new(false));
    run(&config, &cancel).unwrap();

    assert!(out.path().join("Q1").join("alice.c").exists());
}
