//! # Report - Report Card Generation
//!
//! Renders one student's record to a text file under the reports directory.
//! The file name is derived from the roll number
//! (`report_roll_<roll>.txt`), so regenerating a report replaces the old one.
//!
//! ## Layout
//!
//! ```text
//! ----- Report Card -----
//! Roll Number: 10
//! Name: Ann Lee
//! Math         : 90.00
//! Physics      : 80.00
//! Chemistry    : 70.00
//! Total       : 240.00
//! Percentage  : 80.00
//! Grade       : B
//! Generated on: Fri Oct 16 09:30:00 2026
//! ```

use chrono::{DateTime, Local, TimeZone};
use config::SubjectConfig;
use log::info;
use record::Student;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use store::{RecordStore, StoreError};

/// Writes report cards into a fixed directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    reports_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new<P: AsRef<Path>>(reports_dir: P) -> Self {
        Self {
            reports_dir: reports_dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Path of the report for `roll`.
    #[must_use]
    pub fn report_path(&self, roll: i32) -> PathBuf {
        self.reports_dir.join(format!("report_roll_{}.txt", roll))
    }

    /// Looks up `roll` in `store` and writes its report card, stamped with
    /// the current local time. Returns the report's path.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the roll is not stored; I/O failures while
    /// reading the store or writing the report.
    pub fn generate(&self, store: &RecordStore, roll: i32) -> Result<PathBuf, StoreError> {
        self.generate_at(store, roll, Local::now())
    }

    /// [`generate`](Self::generate) with an explicit timestamp.
    pub fn generate_at<Tz: TimeZone>(
        &self,
        store: &RecordStore,
        roll: i32,
        generated_at: DateTime<Tz>,
    ) -> Result<PathBuf, StoreError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let student = store.find(roll)?.ok_or(StoreError::NotFound(roll))?;

        fs::create_dir_all(&self.reports_dir)?;
        let path = self.report_path(roll);

        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(render(&student, store.subjects(), &generated_at).as_bytes())?;
        out.flush()?;

        info!("report for roll {} written to {}", roll, path.display());
        Ok(path)
    }
}

/// Renders the report card text for `s`.
///
/// Mark slots are labelled from `subjects`; slots beyond the configured
/// count fall back to `Subject<N>`.
#[must_use]
pub fn render<Tz: TimeZone>(
    s: &Student,
    subjects: &SubjectConfig,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "----- Report Card -----");
    let _ = writeln!(out, "Roll Number: {}", s.roll);
    let _ = writeln!(out, "Name: {}", s.name);
    for (i, mark) in s.marks.iter().enumerate() {
        let _ = writeln!(out, "{:<12} : {:.2}", subjects.label(i), mark);
    }
    let _ = writeln!(out, "Total       : {:.2}", s.total);
    let _ = writeln!(out, "Percentage  : {:.2}", s.percentage);
    let _ = writeln!(out, "Grade       : {}", s.grade);
    let _ = writeln!(
        out,
        "Generated on: {}",
        generated_at.format("%a %b %e %H:%M:%S %Y")
    );
    out
}

#[cfg(test)]
mod tests;
