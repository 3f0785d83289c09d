//! Persistence for raw downloads and the attendance report.
//!
//! Every file is overwritten on each run; nothing is appended.

use csv::{ReaderBuilder, Trim, Writer};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::attendance::types::{AttendanceReport, AttendanceRow};
use crate::attendance::{ATTENDED_SUFFIX, HANDLE_COLUMN};
use crate::error::{AttendanceError, Result};

/// Overwrites `path` with the raw bytes of a downloaded export.
pub fn save_raw(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Saved raw export");
    Ok(())
}

/// Writes the report as CSV, replacing any previous file.
pub fn write_report(path: &Path, report: &AttendanceReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(path)?;
    writer.write_record(report.headers())?;

    for row in &report.rows {
        let record = std::iter::once(row.handle.clone())
            .chain(row.counts.iter().map(u64::to_string));
        writer.write_record(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = report.rows.len(), "Attendance report written");
    Ok(())
}

/// Reads a report previously produced by [`write_report`].
///
/// Category labels are recovered from the column headers.
pub fn read_report(path: &Path) -> Result<AttendanceReport> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut columns = headers.iter();
    if columns.next() != Some(HANDLE_COLUMN) {
        return Err(AttendanceError::MalformedReport(format!(
            "first column must be \"{HANDLE_COLUMN}\""
        )));
    }

    let categories = columns
        .map(|h| {
            h.strip_suffix(ATTENDED_SUFFIX)
                .map(str::to_string)
                .ok_or_else(|| AttendanceError::MalformedReport(format!("unexpected column \"{h}\"")))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let handle = fields.next().unwrap_or_default().to_string();
        let counts = fields
            .map(|f| {
                f.parse::<u64>().map_err(|_| {
                    AttendanceError::MalformedReport(format!("bad count \"{f}\" for \"{handle}\""))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(AttendanceRow { handle, counts });
    }

    Ok(AttendanceReport { categories, rows })
}

/// True if `path` exists and was modified less than `max_age` ago.
pub fn is_fresh(path: &Path, max_age: Duration) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age < max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_report() -> AttendanceReport {
        AttendanceReport {
            categories: vec!["HM".into(), "Cookie Run".into(), "GM".into()],
            rows: vec![
                AttendanceRow {
                    handle: "amy".into(),
                    counts: vec![1, 0, 2],
                },
                AttendanceRow {
                    handle: "zed".into(),
                    counts: vec![0, 3, 0],
                },
            ],
        }
    }

    #[test]
    fn test_write_report_layout() {
        let path = temp_path("hkn_attendance_test_layout.csv");
        let _ = fs::remove_file(&path);

        write_report(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "HKN Handle,HMs Attended,Cookie Runs Attended,GMs Attended",
                "amy,1,0,2",
                "zed,0,3,0",
            ]
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_overwrites() {
        let path = temp_path("hkn_attendance_test_overwrite.csv");
        fs::write(&path, "stale contents\nmore\nand more\nand more\n").unwrap();

        let empty = AttendanceReport {
            categories: vec!["GM".into()],
            rows: vec![],
        };
        write_report(&path, &empty).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["HKN Handle,GMs Attended"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_report_recovers_written_report() {
        let path = temp_path("hkn_attendance_test_read.csv");
        let report = sample_report();

        write_report(&path, &report).unwrap();
        let read = read_report(&path).unwrap();
        assert_eq!(read, report);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_report_rejects_bad_count() {
        let path = temp_path("hkn_attendance_test_bad_count.csv");
        fs::write(&path, "HKN Handle,GMs Attended\namy,lots\n").unwrap();

        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, AttendanceError::MalformedReport(_)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_report_rejects_foreign_header() {
        let path = temp_path("hkn_attendance_test_bad_header.csv");
        fs::write(&path, "Name,GMs Attended\namy,1\n").unwrap();

        assert!(matches!(
            read_report(&path).unwrap_err(),
            AttendanceError::MalformedReport(_)
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_raw_creates_parent_dirs() {
        let dir = temp_path("hkn_attendance_test_raw");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("events.csv");

        save_raw(&path, b"Week,Secret Word,Activity Type\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"Week,Secret Word,Activity Type\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_is_fresh() {
        let path = temp_path("hkn_attendance_test_fresh.csv");
        fs::write(&path, "x").unwrap();

        assert!(is_fresh(&path, Duration::from_secs(3600)));
        assert!(!is_fresh(&path, Duration::ZERO));

        fs::remove_file(&path).unwrap();
        assert!(!is_fresh(&path, Duration::from_secs(3600)));
    }
}
