// 💾 Ledger File Format - CSV persistence
//
// name,category,rate,date,hours
// A,Cat,10.0,21/10/2025,2
//
// The header must match exactly. Every row goes through the same
// validation as Job::new, and the first bad row fails the whole read.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::{JobError, Result};
use crate::job::{format_rate, Job};

/// Column names, in file order.
pub const HEADER: [&str; 5] = ["name", "category", "rate", "date", "hours"];

// ============================================================================
// WRITE
// ============================================================================

/// Write `jobs` to `path`, replacing any existing file.
///
/// The whole file is encoded in memory first so a failure while encoding
/// never leaves a half-written ledger behind.
pub fn write_jobs(path: &Path, jobs: &[Job]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(HEADER)
        .map_err(|e| from_csv(path, e))?;

    for job in jobs {
        let rate = format_rate(job.rate());
        let hours = job.hours().to_string();
        writer
            .write_record([job.name(), job.category(), rate.as_str(), job.date(), hours.as_str()])
            .map_err(|e| from_csv(path, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| JobError::Io(e.into_error()))?;
    fs::write(path, bytes)?;

    Ok(())
}

// ============================================================================
// READ
// ============================================================================

/// Read every job in `path`, in file order.
pub fn read_jobs(path: &Path) -> Result<Vec<Job>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => JobError::FileNotFound(path.to_path_buf()),
        _ => JobError::Io(e),
    })?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers().map_err(|e| from_csv(path, e))?.clone();
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(JobError::BadHeader {
            path: path.to_path_buf(),
            expected: HEADER.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut jobs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| from_csv(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let job = parse_row(&record).map_err(|message| JobError::BadRow {
            path: path.to_path_buf(),
            line,
            message,
        })?;
        jobs.push(job);
    }

    Ok(jobs)
}

fn parse_row(record: &StringRecord) -> std::result::Result<Job, String> {
    // field count is already checked by the reader against the header
    let field = |i: usize| record.get(i).unwrap_or("");

    let rate: f64 = field(2)
        .trim()
        .parse()
        .map_err(|_| format!("rate `{}` is not a number", field(2)))?;
    let hours: i64 = field(4)
        .trim()
        .parse()
        .map_err(|_| format!("hours `{}` is not an integer", field(4)))?;

    Job::new(field(0), field(1), rate, field(3), hours).map_err(|e| e.to_string())
}

fn from_csv(path: &Path, err: csv::Error) -> JobError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => JobError::Io(e),
        _ => JobError::BadRow {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    fn sample() -> Vec<Job> {
        vec![
            Job::new("A", "Cat", 10.0, "21/10/2025", 2).unwrap(),
            Job::new("B", "Marking, exams", 13.45, "22/10/2025", 6).unwrap(),
        ]
    }

    #[test]
    fn test_write_produces_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        write_jobs(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,category,rate,date,hours");
        assert_eq!(lines[1], "A,Cat,10.0,21/10/2025,2");
        assert_eq!(lines[2], "B,\"Marking, exams\",13.45,22/10/2025,6");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_read_back_what_was_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        write_jobs(&path, &sample()).unwrap();
        assert_eq!(read_jobs(&path).unwrap(), sample());
    }

    #[test]
    fn test_tiny_and_huge_rates_written_as_plain_decimals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let jobs = vec![
            Job::new("A", "C", 1e-7, "d", 1).unwrap(),
            Job::new("B", "C", 1e20, "d", 1).unwrap(),
        ];

        write_jobs(&path, &jobs).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains('e'), "{}", content);
        assert!(content.contains("A,C,0.0000001,d,1"));
        assert_eq!(read_jobs(&path).unwrap(), jobs);
    }

    #[test]
    fn test_empty_ledger_is_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        write_jobs(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "name,category,rate,date,hours");
        assert!(read_jobs(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_jobs(&dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_wrong_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "name,rate,category,date,hours\nA,10.0,Cat,d,2\n").unwrap();

        let err = read_jobs(&path).unwrap_err();
        assert!(matches!(err, JobError::BadHeader { .. }));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_empty_file_has_wrong_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "").unwrap();

        assert_eq!(read_jobs(&path).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_bad_rows_report_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");

        for body in [
            "A,Cat,ten,d,2",
            "A,Cat,10.0,d,2.5",
            "A,Cat,10.0,d,7",
            "A,,10.0,d,2",
        ] {
            fs::write(&path, format!("name,category,rate,date,hours\nB,Cat,1.0,d,1\n{}\n", body))
                .unwrap();
            match read_jobs(&path) {
                Err(JobError::BadRow { line, .. }) => assert_eq!(line, 3, "row `{}`", body),
                other => panic!("expected BadRow for `{}`, got {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_short_row_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "name,category,rate,date,hours\nA,Cat,10.0,d\n").unwrap();

        assert_eq!(read_jobs(&path).unwrap_err().kind(), ErrorKind::Format);
    }
}
