//! CSV result sink
//!
//! One append-only output file per session. The header is written once; each
//! measurement becomes one CRLF-terminated row. Durations are written with
//! the full precision the timing wrapper produced, no rounding.

use crate::defaults;
use crate::error::{AppError, Result};
use crate::timing::Measurement;
use chrono::SecondsFormat;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct ResultSink {
    file: File,
    path: PathBuf,
}

impl ResultSink {
    /// Open (or create) the output file in append mode. A reused file name
    /// appends, never truncates.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io(format!("Failed to open {}: {}", path.display(), e)))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the CSV header row. Called once per session.
    pub fn write_header(&mut self) -> Result<()> {
        self.file
            .write_all(format!("{}\r\n", defaults::CSV_HEADER).as_bytes())?;
        Ok(())
    }

    /// Append one measurement as a CSV row and flush it to disk.
    pub fn append(&mut self, measurement: &Measurement) -> Result<()> {
        self.file.write_all(format_row(measurement).as_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    /// Flush and close the output file.
    pub fn finish(mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

/// Format one CSV row: `<rfc3339-utc>,<KIND>,<duration_ms>\r\n`.
pub fn format_row(measurement: &Measurement) -> String {
    format!(
        "{},{},{}\r\n",
        measurement
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        measurement.kind,
        measurement.duration_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeKind;
    use chrono::{TimeZone, Utc};

    fn sample(duration_ms: f64) -> Measurement {
        Measurement {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 15).unwrap(),
            kind: ProbeKind::Mssql,
            duration_ms,
        }
    }

    #[test]
    fn test_format_row_shape() {
        let row = format_row(&sample(12.5));
        assert_eq!(row, "2024-03-07T09:30:15.000Z,MSSQL,12.5\r\n");
        assert_eq!(row.split(',').count(), 3);
        assert!(row.ends_with("\r\n"));
    }

    #[test]
    fn test_format_row_full_precision() {
        let row = format_row(&sample(15.123456789012));
        assert!(row.contains("15.123456789012"));
    }

    #[test]
    fn test_header_and_rows_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results-test.csv");

        let mut sink = ResultSink::open(&path).unwrap();
        sink.write_header().unwrap();
        sink.append(&sample(1.25)).unwrap();
        sink.append(&sample(2.5)).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,test_type,duration");
        assert!(lines[1].ends_with(",MSSQL,1.25"));
        assert!(lines[2].ends_with(",MSSQL,2.5"));
    }

    #[test]
    fn test_reopened_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results-reuse.csv");

        let mut sink = ResultSink::open(&path).unwrap();
        sink.write_header().unwrap();
        sink.append(&sample(1.0)).unwrap();
        sink.finish().unwrap();

        let mut sink = ResultSink::open(&path).unwrap();
        sink.write_header().unwrap();
        sink.append(&sample(2.0)).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        // Two sessions against the same name: both headers and both rows survive.
        assert_eq!(content.matches("date,test_type,duration").count(), 2);
        assert_eq!(content.matches("MSSQL").count(), 2);
    }
}
