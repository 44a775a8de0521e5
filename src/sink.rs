use crate::error::Result;
use crate::results::CrawlBatch;
use crate::utils;
use std::fs;
use std::path::PathBuf;

/// Destination for checkpoint flushes
pub trait CheckpointSink {
    /// Write the batch to its own artifact
    ///
    /// An empty batch writes nothing and returns `Ok(None)`.
    fn flush(&mut self, batch: &CrawlBatch) -> Result<Option<PathBuf>>;
}

/// Column headers; the leading blank column is the row index, the rest
/// must match the serialized field names of `PublicationRecord`
const HEADER: [&str; 6] = ["", "number", "title", "authors", "info", "url"];

/// Writes each flush as `data{first}-{last}.csv` under one directory
#[derive(Debug, Clone)]
pub struct CsvCheckpointSink {
    output_dir: PathBuf,
}

impl CsvCheckpointSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl CheckpointSink for CsvCheckpointSink {
    fn flush(&mut self, batch: &CrawlBatch) -> Result<Option<PathBuf>> {
        let Some((first, last)) = batch.bounds() else {
            ::log::debug!("Nothing to flush");
            return Ok(None);
        };

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(utils::artifact_name(first, last));

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(HEADER)?;
        for (index, record) in batch.records().iter().enumerate() {
            writer.serialize((index, record))?;
        }
        writer.flush()?;

        ::log::info!(
            "Flushed {} records to {}",
            batch.len(),
            path.display()
        );
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::PublicationRecord;

    fn record(n: u64) -> PublicationRecord {
        PublicationRecord::new(
            n,
            format!("Title {}", n),
            "Author, A.".to_string(),
            String::new(),
            Some(format!("https://example.org/item.asp?id={}", n)),
        )
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("collected");
        let mut sink = CsvCheckpointSink::new(&out);

        assert!(sink.flush(&CrawlBatch::new()).unwrap().is_none());
        assert!(!out.exists());
    }

    #[test]
    fn test_artifact_named_by_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvCheckpointSink::new(dir.path());

        let batch = CrawlBatch::from(vec![record(101), record(150), record(205)]);
        let path = sink.flush(&batch).unwrap().unwrap();

        assert_eq!(path, dir.path().join("data101-205.csv"));
        assert!(path.exists());
    }

    #[test]
    fn test_artifact_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvCheckpointSink::new(dir.path());

        let mut second = record(2);
        second.detail_url = None;
        second.title = "Commas, \"quotes\"".to_string();
        let path = sink
            .flush(&CrawlBatch::from(vec![record(1), second]))
            .unwrap()
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER.to_vec());

        let rows = reader
            .records()
            .map(|r| r.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][5], "https://example.org/item.asp?id=1");
        assert_eq!(&rows[1][0], "1");
        assert_eq!(&rows[1][2], "Commas, \"quotes\"");
        assert_eq!(&rows[1][3], "Author, A.");
        assert_eq!(&rows[1][5], "");
    }

    #[test]
    fn test_header_matches_record_fields() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(record(1)).unwrap();
        let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let serde_header = written.lines().next().unwrap();

        assert_eq!(serde_header, HEADER[1..].join(","));
    }

    #[test]
    fn test_later_flushes_keep_earlier_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvCheckpointSink::new(dir.path());

        let first = sink
            .flush(&CrawlBatch::from(vec![record(1), record(10)]))
            .unwrap()
            .unwrap();
        let second = sink
            .flush(&CrawlBatch::from(vec![record(11), record(20)]))
            .unwrap()
            .unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
