//! JSON Lines file I/O
//!
//! All three tools exchange data through JSONL files: one JSON object per
//! line. Datasets are assumed to fit in memory; a malformed line fails the
//! whole run with its line number.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Read every record of a JSONL file into memory.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = serde_json::from_str(&line).map_err(|source| Error::MalformedLine {
            path: path.display().to_string(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a JSONL file, truncating any previous contents.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Incremental JSONL writer used by the Extractor.
///
/// The full dataset is append-only output: the file is created exclusively
/// (an existing dataset is never clobbered) and records are streamed out as
/// they arrive.
pub struct JsonlWriter {
    writer: BufWriter<File>,
}

impl JsonlWriter {
    /// Create the destination file. Fails if it already exists.
    pub fn create_new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one record as a JSON line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        n: u32,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "a".into(),
                n: 1,
            },
            Row {
                id: "b".into(),
                n: 2,
            },
        ]
    }

    #[test]
    fn write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");

        write_jsonl(&path, &rows()).unwrap();
        let back: Vec<Row> = read_jsonl(&path).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn write_jsonl_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");

        write_jsonl(&path, &rows()).unwrap();
        write_jsonl(&path, &rows()[..1]).unwrap();
        let back: Vec<Row> = read_jsonl(&path).unwrap();
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(&path, "{\"id\":\"a\",\"n\":1}\nnot json\n").unwrap();

        let err = read_jsonl::<Row>(&path).unwrap_err();
        match err {
            Error::MalformedLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn incremental_writer_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");

        let mut writer = JsonlWriter::create_new(&path).unwrap();
        for row in rows() {
            writer.write(&row).unwrap();
        }
        writer.flush().unwrap();

        assert!(JsonlWriter::create_new(&path).is_err());
        let back: Vec<Row> = read_jsonl(&path).unwrap();
        assert_eq!(back, rows());
    }
}
