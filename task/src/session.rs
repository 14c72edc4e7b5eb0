//! Run-level record keeping and the CSV sink.
//!
//! Records accumulate in memory for the whole run and are written once, in
//! full, when the run ends.

use std::fs;
use std::io;
use std::path::Path;

use crate::trial::TrialRecord;

pub const CSV_HEADER: &str = "Trial,Time,CircleTraveledDist,SquareTraveledDist,\
CircleNeededDist,SquareNeededDist,RedCircleRadius,GreenCircleRadius,\
MinAllowedSize,MaxAllowedSize,RadiusDiff,Score";

#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<TrialRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Mean score over the most recent `n` completed trials.
    pub fn average_recent_score(&self, n: usize) -> Option<f32> {
        if self.records.is_empty() || n == 0 {
            return None;
        }
        let tail = &self.records[self.records.len().saturating_sub(n)..];
        let sum: f32 = tail.iter().map(|r| r.score).sum();
        Some(sum / tail.len() as f32)
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format_row(record));
            out.push('\n');
        }
        out
    }

    /// Write the full table atomically. A run with no completed trials
    /// leaves no file behind.
    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        if self.records.is_empty() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        atomic_write(path, self.to_csv().as_bytes())
    }
}

fn format_row(r: &TrialRecord) -> String {
    format!(
        "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
        r.trial,
        r.time_secs,
        r.circle_traveled,
        r.square_traveled,
        r.circle_needed,
        r.square_needed,
        r.red_circle_radius,
        r.green_circle_radius,
        r.min_allowed_size,
        r.max_allowed_size,
        r.radius_diff,
        r.score,
    )
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(trial: u32, score: f32) -> TrialRecord {
        TrialRecord {
            trial,
            time_secs: 2.5,
            circle_traveled: 310.57,
            square_traveled: 204.0,
            circle_needed: 300.0,
            square_needed: 200.0,
            red_circle_radius: 100.0,
            green_circle_radius: 95.0,
            min_allowed_size: 90.0,
            max_allowed_size: 110.0,
            radius_diff: 5.0,
            score,
        }
    }

    #[test]
    fn csv_has_the_exact_column_header() {
        assert_eq!(
            CSV_HEADER,
            "Trial,Time,CircleTraveledDist,SquareTraveledDist,\
             CircleNeededDist,SquareNeededDist,RedCircleRadius,GreenCircleRadius,\
             MinAllowedSize,MaxAllowedSize,RadiusDiff,Score"
        );
    }

    #[test]
    fn csv_rows_keep_two_decimal_digits_and_order() {
        let mut log = SessionLog::new();
        log.push(record(1, 207.5));
        log.push(record(2, 150.0));

        let csv = log.to_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("1,2.50,310.57,204.00,300.00,200.00,100.00,95.00,90.00,110.00,5.00,207.50")
        );
        assert_eq!(lines.next().map(|l| &l[..2]), Some("2,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn average_recent_score_uses_the_tail_only() {
        let mut log = SessionLog::new();
        for (i, s) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
            log.push(record(i as u32 + 1, s));
        }
        assert_eq!(log.average_recent_score(2), Some(35.0));
        // Shorter history than requested: average what exists.
        assert_eq!(log.average_recent_score(100), Some(25.0));
        assert_eq!(log.average_recent_score(0), None);
    }

    #[test]
    fn empty_session_writes_no_file() {
        let dir = std::env::temp_dir().join("reachtask-empty-session-test");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("values.csv");

        SessionLog::new().write_csv(&path).expect("write succeeds");
        assert!(!path.exists());
    }

    #[test]
    fn write_csv_round_trips_through_the_filesystem() {
        let dir = std::env::temp_dir().join("reachtask-session-write-test");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("values.csv");

        let mut log = SessionLog::new();
        log.push(record(1, 207.5));
        log.write_csv(&path).expect("write succeeds");

        let on_disk = fs::read_to_string(&path).expect("file exists");
        assert_eq!(on_disk, log.to_csv());
        let _ = fs::remove_dir_all(&dir);
    }
}
