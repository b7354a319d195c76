//! Annotation session over one subset file
//!
//! The whole subset lives in memory for the duration of the session. Each
//! confirmed edit rewrites the file; the cursor only advances after the
//! write succeeded, so a failed write surfaces immediately and the edit is
//! retained in memory for a retry.

use std::path::PathBuf;

use epgds_common::dataset::SubsetRecord;
use epgds_common::jsonl::{read_jsonl, write_jsonl};
use epgds_common::Result;

/// Operator input for one record; empty strings mean "no such information"
#[derive(Debug, Clone)]
pub struct AnnotationInput {
    pub series_title: String,
    pub episode_number: String,
    pub subtitle: String,
}

/// Sequential review state over a loaded subset file
pub struct AnnotationSession {
    subset_path: PathBuf,
    records: Vec<SubsetRecord>,
    cursor: usize,
}

impl AnnotationSession {
    /// Load the subset and position the cursor. A `start_index` at or past
    /// the end makes the session immediately complete (useful after a
    /// finished run; not an error).
    pub fn load(subset_path: PathBuf, start_index: usize) -> Result<Self> {
        let records: Vec<SubsetRecord> = read_jsonl(&subset_path)?;
        Ok(Self {
            subset_path,
            records,
            cursor: start_index,
        })
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Records left to review, the current one included
    pub fn remaining(&self) -> usize {
        self.records.len().saturating_sub(self.cursor)
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.records.len()
    }

    /// The record under the cursor, `None` once the session is complete
    pub fn current(&self) -> Option<&SubsetRecord> {
        self.records.get(self.cursor)
    }

    /// Apply the operator's input to the current record, persist the whole
    /// subset, and advance.
    ///
    /// Only the three annotation fields change; everything else round-trips
    /// untouched. On a write failure the error is returned, the cursor does
    /// not move, and the edited values stay in memory so the operator can
    /// retry.
    pub fn annotate_current(&mut self, input: AnnotationInput) -> Result<()> {
        let Some(record) = self.records.get_mut(self.cursor) else {
            return Err(epgds_common::Error::Config(
                "annotation session is already complete".into(),
            ));
        };

        record.series_title = input.series_title.trim().to_string();
        record.episode_number = normalize_optional(input.episode_number);
        record.subtitle = normalize_optional(input.subtitle);

        write_jsonl(&self.subset_path, &self.records)?;
        self.cursor += 1;
        Ok(())
    }
}

/// Trim the input; an empty field means the information does not exist
fn normalize_optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subset_lines() -> String {
        let mut lines = String::new();
        for i in 0..3 {
            lines.push_str(&format!(
                r#"{{"id":"20230601210{i}-NID32736-SID01024-EID0000{i}","network_id":32736,"service_id":1024,"transport_stream_id":32736,"event_id":{i},"start_time":"2023-06-01T21:0{i}:00+09:00","duration":1800,"title":"番組{i}","title_without_symbols":"番組{i}","description":"概要{i}","description_without_symbols":"概要{i}","major_genre_id":3,"middle_genre_id":0,"series_title":"","episode_number":null,"subtitle":null}}"#
            ));
            lines.push('\n');
        }
        lines
    }

    fn load_session(dir: &tempfile::TempDir, start_index: usize) -> AnnotationSession {
        let path = dir.path().join("subset.jsonl");
        std::fs::write(&path, subset_lines()).unwrap();
        AnnotationSession::load(path, start_index).unwrap()
    }

    #[test]
    fn cursor_starts_at_the_requested_index() {
        let dir = tempfile::tempdir().unwrap();
        let session = load_session(&dir, 1);
        assert_eq!(session.current().unwrap().event_id, 1);
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn start_index_past_the_end_is_immediately_done() {
        let dir = tempfile::tempdir().unwrap();
        let session = load_session(&dir, 10);
        assert!(session.is_done());
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn annotate_persists_and_advances() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = load_session(&dir, 0);

        session
            .annotate_current(AnnotationInput {
                series_title: " シリーズ名 ".into(),
                episode_number: "第1話".into(),
                subtitle: "".into(),
            })
            .unwrap();
        assert_eq!(session.cursor(), 1);

        let path = dir.path().join("subset.jsonl");
        let back: Vec<SubsetRecord> = read_jsonl(&path).unwrap();
        assert_eq!(back[0].series_title, "シリーズ名");
        assert_eq!(back[0].episode_number.as_deref(), Some("第1話"));
        assert_eq!(back[0].subtitle, None);
        // Untouched records persist verbatim
        assert_eq!(back[1].series_title, "");
    }

    #[test]
    fn annotation_round_trip_keeps_other_fields_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subset.jsonl");
        std::fs::write(&path, subset_lines()).unwrap();
        let before: Vec<SubsetRecord> = read_jsonl(&path).unwrap();

        let mut session = AnnotationSession::load(path.clone(), 0).unwrap();
        session
            .annotate_current(AnnotationInput {
                series_title: "シリーズ".into(),
                episode_number: "#1・#2".into(),
                subtitle: "前編／後編".into(),
            })
            .unwrap();

        let after: Vec<SubsetRecord> = read_jsonl(&path).unwrap();
        let mut reverted = after[0].clone();
        reverted.series_title = before[0].series_title.clone();
        reverted.episode_number = before[0].episode_number.clone();
        reverted.subtitle = before[0].subtitle.clone();
        assert_eq!(reverted, before[0]);
    }

    #[test]
    fn failed_write_reports_and_does_not_advance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subset.jsonl");
        std::fs::write(&path, subset_lines()).unwrap();
        let mut session = AnnotationSession::load(path.clone(), 0).unwrap();

        // Make the destination unwritable by replacing it with a directory
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = session.annotate_current(AnnotationInput {
            series_title: "x".into(),
            episode_number: String::new(),
            subtitle: String::new(),
        });
        assert!(result.is_err());
        assert_eq!(session.cursor(), 0);
        // The edit stays in memory for retry
        assert_eq!(session.current().unwrap().series_title, "x");
    }

    #[test]
    fn annotating_past_the_end_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = load_session(&dir, 3);
        assert!(session
            .annotate_current(AnnotationInput {
                series_title: String::new(),
                episode_number: String::new(),
                subtitle: String::new(),
            })
            .is_err());
    }
}
