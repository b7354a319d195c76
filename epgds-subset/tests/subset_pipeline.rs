//! End-to-end subset builder tests over a real JSONL file
//!
//! Exercises the load -> filter -> sample -> emit pipeline the binary runs,
//! including the properties the output must always satisfy: valid genres,
//! non-empty titles, no raw payload, id order, seeded reproducibility.

use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use epgds_common::dataset::SubsetRecord;
use epgds_common::genres::{is_known_major_genre, GENRE_UNSET};
use epgds_common::jsonl::{read_jsonl, write_jsonl};
use epgds_subset::filter::{filter_candidates, FilterOptions};
use epgds_subset::sampler::sample_subset;

/// One full-dataset line (with a raw payload, as the Extractor writes it)
fn dataset_line(id: &str, network_id: u16, service_id: u16, major: i16, title: &str) -> String {
    format!(
        r#"{{"id":"{id}","network_id":{network_id},"service_id":{service_id},"transport_stream_id":{network_id},"event_id":1,"start_time":"2023-06-01T21:00:00+09:00","duration":1800,"title":"{title}","title_without_symbols":"{title}","description":"概要 {id}","description_without_symbols":"概要 {id}","major_genre_id":{major},"middle_genre_id":0,"raw":{{"onid":{network_id}}}}}"#
    )
}

fn write_dataset(path: &Path, lines: &[String]) {
    std::fs::write(path, lines.join("\n") + "\n").unwrap();
}

fn sample_from_file(path: &Path, subset_size: usize, seed: u64) -> Vec<SubsetRecord> {
    let records: Vec<SubsetRecord> = read_jsonl(path).unwrap();
    let candidates = filter_candidates(records, &FilterOptions::default());
    let mut rng = StdRng::seed_from_u64(seed);
    sample_subset(candidates, subset_size, &mut rng).unwrap()
}

fn mixed_dataset() -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..60 {
        lines.push(dataset_line(
            &format!("202306012100-NID32736-SID01024-EID{i:05}"),
            32736,
            1024,
            0x3,
            &format!("地上波番組{i}"),
        ));
    }
    for i in 0..30 {
        lines.push(dataset_line(
            &format!("202306012100-NID00004-SID00101-EID{i:05}"),
            0x0004,
            101,
            0x6,
            &format!("BS番組{i}"),
        ));
    }
    for i in 0..20 {
        lines.push(dataset_line(
            &format!("202306012100-NID00006-SID00100-EID{i:05}"),
            0x0006,
            100,
            0x7,
            &format!("CS番組{i}"),
        ));
    }
    // Records every subset must exclude
    lines.push(dataset_line(
        "202306012100-NID32736-SID01024-EID90001",
        32736,
        1024,
        0xC,
        "ジャンル不明番組",
    ));
    lines.push(dataset_line(
        "202306012100-NID32736-SID01024-EID90002",
        32736,
        1024,
        GENRE_UNSET,
        "ジャンルなし番組",
    ));
    lines.push(dataset_line(
        "202306012100-NID32736-SID01024-EID90003",
        32736,
        1024,
        0x3,
        "",
    ));
    lines
}

#[test]
fn subset_records_satisfy_the_output_invariants() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("epg_dataset.jsonl");
    write_dataset(&dataset_path, &mixed_dataset());

    let subset = sample_from_file(&dataset_path, 40, 1);
    assert!(!subset.is_empty());

    let mut signatures = HashSet::new();
    let mut previous_id: Option<String> = None;
    for record in &subset {
        assert!(!record.title.trim().is_empty());
        assert!(is_known_major_genre(record.major_genre_id));
        assert!(signatures.insert((
            record.title.clone(),
            record.start_time.timestamp(),
            record.network_id
        )));
        if let Some(prev) = &previous_id {
            assert!(prev < &record.id, "subset must be sorted by id");
        }
        previous_id = Some(record.id.clone());
    }
}

#[test]
fn emitted_subset_has_no_raw_payload_and_annotation_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("epg_dataset.jsonl");
    let subset_path = dir.path().join("epg_dataset_subset.jsonl");
    write_dataset(&dataset_path, &mixed_dataset());

    let subset = sample_from_file(&dataset_path, 40, 1);
    write_jsonl(&subset_path, &subset).unwrap();

    let contents = std::fs::read_to_string(&subset_path).unwrap();
    assert!(!contents.contains("\"raw\""));
    assert!(contents.contains("\"series_title\":\"\""));
    assert!(contents.contains("\"episode_number\":null"));
    assert!(contents.contains("\"subtitle\":null"));
}

#[test]
fn fixed_seed_gives_byte_identical_output_files() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("epg_dataset.jsonl");
    write_dataset(&dataset_path, &mixed_dataset());

    let path_a = dir.path().join("subset_a.jsonl");
    let path_b = dir.path().join("subset_b.jsonl");
    write_jsonl(&path_a, &sample_from_file(&dataset_path, 40, 99)).unwrap();
    write_jsonl(&path_b, &sample_from_file(&dataset_path, 40, 99)).unwrap();

    assert_eq!(
        std::fs::read(&path_a).unwrap(),
        std::fs::read(&path_b).unwrap()
    );
}

#[test]
fn all_ineligible_dataset_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("epg_dataset.jsonl");
    write_dataset(
        &dataset_path,
        &[
            dataset_line("a", 32736, 1024, GENRE_UNSET, "ジャンルなし"),
            dataset_line("b", 32736, 1024, 0xE, "不明ジャンル"),
        ],
    );

    let records: Vec<SubsetRecord> = read_jsonl(&dataset_path).unwrap();
    let candidates = filter_candidates(records, &FilterOptions::default());
    let mut rng = StdRng::seed_from_u64(1);
    assert!(sample_subset(candidates, 10, &mut rng).is_err());
}
