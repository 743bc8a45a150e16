use super::*;

fn submission(id: &str, tokens: &[&str]) -> Submission {
    Submission {
        student_id: id.to_string(),
        file_path: PathBuf::from(format!("{id}.c")),
        tokens: TokenStream::new(tokens.iter().map(|s| s.to_string()).collect()),
    }
}

#[test]
fn test_detect_question_finds_pair_above_threshold() {
    let engine = SimilarityEngine::new();
    let subs = vec![
        submission("alice", &["INT", "ID", ";", "RETURN", "0", ";"]),
        submission("bob", &["INT", "ID", ";", "RETURN", "0", ";"]),
        submission("carol", &["FLOAT", "ID", "=", "1", ";"]),
    ];
    let cases = engine.detect_question(1, &subs, 95.0);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].student_a, "alice");
    assert_eq!(cases[0].student_b, "bob");
}

#[test]
fn test_detect_question_orders_student_pair_lexicographically() {
    let engine = SimilarityEngine::new();
    let subs = vec![
        submission("zed", &["A", "B"]),
        submission("amy", &["A", "B"]),
    ];
    let cases = engine.detect_question(1, &subs, 50.0);
    assert_eq!(cases[0].student_a, "amy");
    assert_eq!(cases[0].student_b, "zed");
}

#[test]
fn test_detect_question_sorted_by_descending_similarity() {
    let engine = SimilarityEngine::new();
    let subs = vec![
        submission("a", &["X", "Y", "Z"]),
        submission("b", &["X", "Y", "W"]),
        submission("c", &["X", "Y", "Z"]),
    ];
    let cases = engine.detect_question(1, &subs, 0.0);
    for pair in cases.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_detect_question_empty_submissions() {
    let engine = SimilarityEngine::new();
    let cases = engine.detect_question(1, &[], 95.0);
    assert!(cases.is_empty());
}

#[test]
fn test_detect_question_caches_pair_by_file_path() {
    let engine = SimilarityEngine::new();
    let subs = vec![
        submission("alice", &["A", "B", "C"]),
        submission("bob", &["A", "B", "C"]),
    ];
    let first = engine.detect_question(1, &subs, 50.0);
    let second = engine.detect_question(1, &subs, 50.0);
    assert_eq!(first[0].similarity, second[0].similarity);
    assert_eq!(engine.cache.lock().unwrap().len(), 1);
}

#[test]
fn test_build_statistics_buckets_and_clusters() {
    let cases = vec![
        PlagiarismCase {
            question: 1,
            student_a: "alice".into(),
            student_b: "bob".into(),
            similarity: 96.0,
            file_a: PathBuf::from("a.c"),
            file_b: PathBuf::from("b.c"),
        },
        PlagiarismCase {
            question: 2,
            student_a: "carol".into(),
            student_b: "dave".into(),
            similarity: 88.0,
            file_a: PathBuf::from("c.c"),
            file_b: PathBuf::from("d.c"),
        },
    ];
    let stats = build_statistics(&cases);
    assert_eq!(stats.total_cases, 2);
    assert_eq!(stats.by_question.get(&1), Some(&1));
    assert_eq!(stats.histogram.bucket_95_99, 1);
    assert_eq!(stats.histogram.bucket_85_90, 1);
    assert_eq!(stats.clusters.len(), 2);
}

#[test]
fn test_build_statistics_cluster_ids_unique_across_questions() {
    let cases = vec![
        PlagiarismCase {
            question: 1,
            student_a: "a".into(),
            student_b: "b".into(),
            similarity: 96.0,
            file_a: PathBuf::from("a.c"),
            file_b: PathBuf::from("b.c"),
        },
        PlagiarismCase {
            question: 2,
            student_a: "c".into(),
            student_b: "d".into(),
            similarity: 96.0,
            file_a: PathBuf::from("c.c"),
            file_b: PathBuf::from("d.c"),
        },
    ];
    let stats = build_statistics(&cases);
    let ids: Vec<u32> = stats.clusters.iter().map(|c| c.cluster_id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_build_statistics_merges_clusters_across_questions() {
    // bob is implicated in both Q1 (with alice) and Q2 (with carol); the
    // clustering graph spans every question, so all three land in one
    // cluster even though no single question's cases connect alice-carol.
    let cases = vec![
        PlagiarismCase {
            question: 1,
            student_a: "alice".into(),
            student_b: "bob".into(),
            similarity: 96.0,
            file_a: PathBuf::from("a.c"),
            file_b: PathBuf::from("b1.c"),
        },
        PlagiarismCase {
            question: 2,
            student_a: "bob".into(),
            student_b: "carol".into(),
            similarity: 97.0,
            file_a: PathBuf::from("b2.c"),
            file_b: PathBuf::from("c.c"),
        },
    ];
    let stats = build_statistics(&cases);
    assert_eq!(stats.clusters.len(), 1);
    assert_eq!(
        stats.clusters[0].students,
        vec!["alice".to_string(), "bob".to_string(), "carol".to_string()]
    );
}
