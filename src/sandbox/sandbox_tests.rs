use super::*;
use std::fs;

#[test]
fn test_materialize_copies_loose_source_file() {
    let input = tempfile::tempdir().unwrap();
    let student_dir = input.path().join("alice");
    fs::create_dir_all(&student_dir).unwrap();
    fs::write(student_dir.join("main.c"), b"int main() {}").unwrap();

    let sandbox = Sandbox::new().unwrap();
    let config = Config::default();
    let result = sandbox.materialize(&student_dir, &"alice".to_string(), &config);

    let scratch = result.scratch_path.expect("scratch path");
    assert!(scratch.join("main.c").exists());
}

#[test]
fn test_materialize_ignores_ignore_pattern_entries() {
    let input = tempfile::tempdir().unwrap();
    let student_dir = input.path().join("bob");
    fs::create_dir_all(student_dir.join("__MACOSX")).unwrap();
    fs::write(student_dir.join("main.c"), b"int main() {}").unwrap();

    let sandbox = Sandbox::new().unwrap();
    let config = Config::default();
    let result = sandbox.materialize(&student_dir, &"bob".to_string(), &config);

    let scratch = result.scratch_path.unwrap();
    assert!(!scratch.join("__MACOSX").exists());
}

#[test]
fn test_materialize_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let student_dir = input.path().join("carol");
    fs::create_dir_all(&student_dir).unwrap();
    fs::write(student_dir.join("main.c"), b"int main() {}").unwrap();

    let sandbox = Sandbox::new().unwrap();
    let config = Config::default();
    let id = "carol".to_string();
    let first = sandbox.materialize(&student_dir, &id, &config);
    let second = sandbox.materialize(&student_dir, &id, &config);

    assert_eq!(first.scratch_path, second.scratch_path);
    assert!(second.errors.is_empty());
}

#[test]
fn test_materialize_logs_when_too_few_files_recovered() {
    let input = tempfile::tempdir().unwrap();
    let student_dir = input.path().join("dave");
    fs::create_dir_all(&student_dir).unwrap();

    let sandbox = Sandbox::new().unwrap();
    let config = Config::default();
    let result = sandbox.materialize(&student_dir, &"dave".to_string(), &config);

    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("may be incomplete")));
}

#[test]
fn test_discover_students_sorted() {
    let input = tempfile::tempdir().unwrap();
    fs::create_dir_all(input.path().join("zed")).unwrap();
    fs::create_dir_all(input.path().join("amy")).unwrap();
    fs::write(input.path().join("readme.txt"), b"not a student").unwrap();

    let students = Sandbox::discover_students(input.path()).unwrap();
    let ids: Vec<&str> = students.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["amy", "zed"]);
}
