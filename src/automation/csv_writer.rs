//! CSV writer for attempt records.
//!
//! Appends one row per finished attempt, opening the file for every write so
//! rows from earlier attempts survive a crash.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// CSV header row.
const CSV_HEADER: &str = "attempt,timestamp,outcome,loss_reason,moves,guesses,duration_ms";

/// Summary of one finished attempt.
#[derive(Clone, Debug)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    pub finished_at: DateTime<Local>,
    /// "won" or "lost"
    pub outcome: &'static str,
    /// Empty for won attempts
    pub loss_reason: &'static str,
    /// Clicks issued by the solver, victory sweep included
    pub moves: u32,
    /// Moves chosen by the random fallback
    pub guesses: u32,
    pub duration_ms: u128,
}

/// Initializes the CSV file with a header if it doesn't exist or is empty.
///
/// If the file exists and has content, this does nothing (preserves existing data).
pub fn init_csv(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing CSV")?;
        let reader = BufReader::new(file);
        if reader.lines().next().is_some() {
            return Ok(());
        }
    }

    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one attempt row.
pub fn append_attempt(path: &Path, record: &AttemptRecord) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let line = format!(
        "{},{},{},{},{},{},{}",
        record.attempt,
        record.finished_at.format("%Y-%m-%dT%H:%M:%S"),
        record.outcome,
        record.loss_reason,
        record.moves,
        record.guesses,
        record.duration_ms,
    );

    writeln!(file, "{}", line).context("Failed to write CSV row")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(attempt: u32, outcome: &'static str, loss_reason: &'static str) -> AttemptRecord {
        AttemptRecord {
            attempt,
            finished_at: Local::now(),
            outcome,
            loss_reason,
            moves: 12,
            guesses: 2,
            duration_ms: 3400,
        }
    }

    #[test]
    fn test_init_csv_creates_header() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("attempts.csv");

        init_csv(&csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_init_csv_preserves_existing() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("attempts.csv");

        std::fs::write(&csv_path, "existing,data\n1,2,3\n").unwrap();

        init_csv(&csv_path).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("existing,data"));
    }

    #[test]
    fn test_append_attempt() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("attempts.csv");

        init_csv(&csv_path).unwrap();
        append_attempt(&csv_path, &record(1, "lost", "detonated")).unwrap();
        append_attempt(&csv_path, &record(2, "won", "")).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("1,"));
        assert!(lines[1].ends_with(",lost,detonated,12,2,3400"));
        assert!(lines[2].ends_with(",won,,12,2,3400"));
    }
}
