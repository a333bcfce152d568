use std::{fs, sync::Arc};

use faculty_recommender::{
    load, persist, rank, source, FacultyRecord, Index, IndexBuilder, LoadError, Recommender,
    Settings, StopWords, Tokenizer,
};
use tempfile::TempDir;

const STOPWORDS: &str = "the\nand\nof\nin\nwith\n";

fn tokenizer() -> Tokenizer {
    Tokenizer::new(Arc::new(StopWords::parse(STOPWORDS)))
}

fn build(records: Vec<FacultyRecord>) -> Index {
    let builder: IndexBuilder = IndexBuilder::new(tokenizer());
    builder.build(records)
}

fn profile(id: &str, research: &str) -> FacultyRecord {
    FacultyRecord {
        faculty_id: id.to_string(),
        research: research.to_string(),
        ..Default::default()
    }
}

#[test]
fn two_document_scenario() {
    let index = build(vec![
        profile("A", "machine learning robotics"),
        profile("B", "ancient history art"),
    ]);
    let t = tokenizer();

    let top = rank(&index, &t, "top 1 machine learning");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].metadata.faculty_id, "A");
    assert!(top[0].score > 0.0);

    let all = rank(&index, &t, "machine learning");
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].metadata.faculty_id, "B");
    assert_eq!(all[1].score, 0.0);
    assert!(all[1].score.is_sign_positive());
}

#[test]
fn round_trip_keeps_vectors_order_and_idf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index").join("vectors.cbor");
    let index = build(vec![
        profile("1", "computer vision and deep learning"),
        profile("2", "vlsi design with fpga"),
        profile("3", "computer vision for robotics"),
    ]);

    persist(&index, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded, index);
    let ids: Vec<&str> = loaded.entries.iter().map(|e| e.metadata.faculty_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(loaded.idf, index.idf);
}

#[test]
fn round_trip_of_empty_corpus() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.cbor");
    let index = build(Vec::new());
    persist(&index, &path).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, index);
    assert!(loaded.is_empty());
    assert!(loaded.idf.is_empty());
}

#[test]
fn failed_persist_keeps_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.cbor");
    let original = build(vec![profile("1", "robotics")]);
    persist(&original, &path).unwrap();

    // a directory in the way of the target makes the final rename fail
    let blocked = dir.path().join("blocked");
    fs::create_dir(&blocked).unwrap();
    fs::write(blocked.join("keep"), "x").unwrap();
    assert!(persist(&build(Vec::new()), &blocked).is_err());

    assert_eq!(load(&path).unwrap(), original);
    assert!(blocked.join("keep").exists());
}

#[test]
fn garbage_artifact_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.cbor");
    fs::write(&path, b"definitely not cbor").unwrap();
    assert!(matches!(load(&path), Err(LoadError::Corrupt { .. })));
}

#[test]
fn recommender_opens_from_settings() {
    let dir = TempDir::new().unwrap();
    let stopwords_path = dir.path().join("stopwords.txt");
    fs::write(&stopwords_path, STOPWORDS).unwrap();

    let corpus_path = dir.path().join("faculty.json");
    fs::write(
        &corpus_path,
        r#"{"results": [
            {"faculty_id": 1, "name": "Ada Lovelace", "research": "analytical engines", "mail": "ada@example.edu"},
            {"faculty_id": 2, "name": "Alan Turing", "research": "computability and machine learning", "profile_url": "https://example.edu/turing"},
            {"faculty_id": 3, "name": "Grace Hopper", "research": null, "specialization": "compilers"}
        ]}"#,
    )
    .unwrap();

    let settings = Settings {
        index_path: dir.path().join("vectors.cbor"),
        stopwords_path,
        profile_base_url: "https://example.edu/faculty".to_string(),
        ..Settings::default()
    };

    let records = source::read_json_file(&corpus_path).unwrap();
    assert_eq!(records.len(), 3);
    let builder: IndexBuilder =
        IndexBuilder::new(Tokenizer::new(Arc::new(StopWords::load(&settings.stopwords_path).unwrap())));
    persist(&builder.build(records), &settings.index_path).unwrap();

    let recommender = Recommender::open(&settings).unwrap();
    let results = recommender.recommend("show me 2 machine learning experts");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Alan Turing");
    assert_eq!(results[0].faculty_id, "2");
    assert_eq!(results[0].profile_url, "https://example.edu/turing");
    assert!(results[0].score > 0.0 && results[0].score <= 1.0);
    assert_eq!(results[1].profile_url, "https://example.edu/faculty/ada-lovelace");
}

#[test]
fn recommender_refuses_to_start_without_index() {
    let dir = TempDir::new().unwrap();
    let stopwords_path = dir.path().join("stopwords.txt");
    fs::write(&stopwords_path, STOPWORDS).unwrap();
    let settings = Settings {
        index_path: dir.path().join("absent.cbor"),
        stopwords_path,
        ..Settings::default()
    };
    assert!(matches!(Recommender::open(&settings), Err(LoadError::Missing { .. })));
}
