use std::fs;
use std::path::Path;

use span_extract::config::ExtractConfig;
use span_extract::pipeline::{self, RunContext, run_document};
use span_types::{ArtifactBundle, Confidence, RunSummary};

const BULLETS_DOC: &str = r#"{
    "url": "https://example.org/timeline-of-rome",
    "title": "Timeline of Rome",
    "kind": "bullets",
    "sections": [
        {"heading": "753–509 BC", "bullets": [
            "753 BC – Rome is founded. Romulus becomes king.",
            "(Between 753 and 716 BC) Reign of Romulus",
            "Sabine women are abducted"
        ]},
        {"heading": "Undated", "bullets": ["Something happened"]}
    ]
}"#;

const TABLE_DOC: &str = r#"{
    "url": "https://example.org/late-republic",
    "title": "Late Republic",
    "kind": "table",
    "category": "politics",
    "tables": [{"rows": [
        {"year": "44 BC", "date": "15 March", "text": "Caesar is assassinated", "rowspan": 3},
        {"year": "", "date": "20 March", "text": "Caesar's funeral"},
        {"year": "", "date": "", "text": "Octavian arrives in Rome"},
        {"year": "27 BC", "date": "16 January", "text": "Octavian becomes Augustus"}
    ]}]
}"#;

fn read_bundle(path: &Path) -> ArtifactBundle {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_directory_run_writes_bundles_and_summary() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("rome.json"), BULLETS_DOC).unwrap();
    fs::create_dir(input.path().join("tables")).unwrap();
    fs::write(input.path().join("tables/republic.json"), TABLE_DOC).unwrap();
    fs::write(input.path().join("broken.json"), "{ not json").unwrap();

    let report =
        pipeline::run_directory(input.path(), output.path(), &ExtractConfig::default(), "it-run")
            .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("broken.json"));

    let rome = read_bundle(&output.path().join("rome.events.json"));
    assert_eq!(rome.run_id, "it-run");
    assert_eq!(rome.source_url, "https://example.org/timeline-of-rome");
    assert_eq!(rome.events.len(), 3);
    assert_eq!(rome.skipped.len(), 1);
    assert_eq!(rome.events[2].span_match_notes, "bullet/fallback from heading 0");

    let republic = read_bundle(&output.path().join("tables/republic.events.json"));
    assert_eq!(republic.events.len(), 4);
    assert!(republic.events.iter().all(|e| e.category == "politics"));

    let summary: RunSummary =
        serde_json::from_str(&fs::read_to_string(output.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary.events_extracted, 7);
    assert_eq!(summary.skipped_rows, 1);
    assert_eq!(summary.confidence_distribution.get(&Confidence::Inferred), Some(&2));
    assert_eq!(summary.confidence_distribution.get(&Confidence::Fallback), Some(&1));
}

#[test]
fn test_same_stem_in_different_folders_keeps_both_bundles() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for dir in ["a", "b"] {
        fs::create_dir(input.path().join(dir)).unwrap();
    }
    fs::write(input.path().join("a/rome.json"), BULLETS_DOC).unwrap();
    fs::write(input.path().join("b/rome.json"), TABLE_DOC).unwrap();

    let report =
        pipeline::run_directory(input.path(), output.path(), &ExtractConfig::default(), "dup")
            .unwrap();
    assert_eq!(report.written.len(), 2);
    assert_ne!(report.written[0], report.written[1]);
    assert!(report.written.iter().all(|p| p.exists()));

    let a = read_bundle(&output.path().join("a/rome.events.json"));
    let b = read_bundle(&output.path().join("b/rome.events.json"));
    assert_eq!(a.source_url, "https://example.org/timeline-of-rome");
    assert_eq!(b.source_url, "https://example.org/late-republic");
    assert_eq!(
        report.summary.events_extracted,
        a.events.len() + b.events.len()
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("rome.json"), BULLETS_DOC).unwrap();
    let config = ExtractConfig::default();

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    pipeline::run_directory(input.path(), first.path(), &config, "a").unwrap();
    pipeline::run_directory(input.path(), second.path(), &config, "b").unwrap();

    let a = read_bundle(&first.path().join("rome.events.json"));
    let b = read_bundle(&second.path().join("rome.events.json"));
    assert_eq!(a.events, b.events);
}

#[test]
fn test_output_inside_input_is_not_rescanned() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("rome.json"), BULLETS_DOC).unwrap();
    let output = input.path().join("out");
    let config = ExtractConfig::default();

    pipeline::run_directory(input.path(), &output, &config, "a").unwrap();
    let report = pipeline::run_directory(input.path(), &output, &config, "b").unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(report.failed.is_empty());
}

#[test]
fn test_event_keys_are_unique_per_event() {
    let doc = serde_json::from_str(TABLE_DOC).unwrap();
    let mut run = RunContext::new("keys", ExtractConfig::default()).unwrap();
    let bundle = run_document(doc, &mut run).unwrap();
    let mut keys: Vec<_> = bundle.events.iter().map(|e| e.event_key.as_str()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), bundle.events.len());
}
