//! # Store - Student Record Store
//!
//! Owns the primary record file and every mutation of it.
//!
//! ## File Format
//!
//! The store file is a plain concatenation of fixed-width records (see the
//! [`record`] crate). There is no header, footer or checksum. A trailing
//! partial record is ignored on read.
//!
//! ## Operations
//!
//! | Operation   | Strategy                                                |
//! |-------------|---------------------------------------------------------|
//! | `exists`    | linear scan, stops at the first match                   |
//! | `append`    | duplicate check, then one block appended to the file    |
//! | `load_all`  | full scan into a caller-owned snapshot                  |
//! | `update`    | stream every record into a temp file, rename over store |
//! | `delete`    | same as `update`, matching record omitted               |
//! | `backup`    | raw byte copy store -> backup file                      |
//! | `restore`   | raw byte copy backup file -> store                      |
//!
//! ## Crash Safety
//!
//! `update` and `delete` never modify the store in place. The replacement is
//! fully written and fsynced to `<store>.tmp` before it is renamed over the
//! store, so a half-written record never becomes live. A crash between the
//! fsync and the rename leaves the old store live and a complete temp file
//! behind; nothing is recovered automatically.

mod backup;
mod patch;
mod rewrite;

pub use patch::StudentPatch;

use config::{Settings, SubjectConfig};
use log::{debug, info, warn};
use record::{encode, normalize_name, CodecError, RecordReader, Student};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert of a roll number that is already stored.
    #[error("roll number {0} already exists")]
    DuplicateKey(i32),

    /// Update, delete or lookup of a roll number that is not stored.
    #[error("roll number {0} not found")]
    NotFound(i32),

    /// An underlying I/O error (open, read, write, rename).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A caller-supplied value does not fit the store's configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A complete block in the store could not be decoded.
    #[error("corrupt record at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// The source file of a copy does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<CodecError> for StoreError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Io(e) => StoreError::Io(e),
            CodecError::Corrupt { offset, reason } => StoreError::Corrupt { offset, reason },
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The record store: one data file, one backup file, and the subject
/// configuration used when records are written.
///
/// No file handle outlives a single method call.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    backup_path: PathBuf,
    subjects: SubjectConfig,
}

impl RecordStore {
    /// Creates a store over `path`. The file is not touched until the first
    /// operation; an absent file behaves as an empty store.
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(
        path: P1,
        backup_path: P2,
        subjects: SubjectConfig,
    ) -> Self {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            backup_path: backup_path.as_ref().to_path_buf(),
            subjects,
        };

        let tmp = store.tmp_path();
        if tmp.exists() {
            warn!(
                "stale rewrite file {} found; an earlier update/delete was interrupted",
                tmp.display()
            );
        }
        store
    }

    /// Creates a store using the paths from `settings`.
    pub fn from_settings(settings: &Settings, subjects: SubjectConfig) -> Self {
        Self::new(&settings.data_path, &settings.backup_path, subjects)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    #[must_use]
    pub fn subjects(&self) -> &SubjectConfig {
        &self.subjects
    }

    /// Replaces the subject configuration used for subsequent writes.
    /// Records already on disk keep the subject count they were written with.
    pub fn set_subjects(&mut self, subjects: SubjectConfig) {
        info!(
            "subject configuration changed: {} -> {} subjects",
            self.subjects.count(),
            subjects.count()
        );
        self.subjects = subjects;
    }

    /// Path of the transient file used by `update` and `delete`.
    pub(crate) fn tmp_path(&self) -> PathBuf {
        tmp_path_for(&self.path)
    }

    /// Opens the store for reading, or `None` if it does not exist yet.
    fn open_reader(&self) -> Result<Option<RecordReader<File>>> {
        match RecordReader::open(&self.path) {
            Ok(r) => Ok(Some(r)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the first record with the given roll number.
    pub fn find(&self, roll: i32) -> Result<Option<Student>> {
        let Some(mut reader) = self.open_reader()? else {
            return Ok(None);
        };
        while let Some(s) = reader.next_record()? {
            if s.roll == roll {
                return Ok(Some(s));
            }
        }
        Ok(None)
    }

    /// Returns `true` if any stored record has this roll number.
    pub fn exists(&self, roll: i32) -> Result<bool> {
        Ok(self.find(roll)?.is_some())
    }

    /// Reads every record in on-disk order. An absent or empty store yields
    /// an empty snapshot.
    pub fn load_all(&self) -> Result<Vec<Student>> {
        let Some(reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };
        let records = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Builds a record from raw input and appends it.
    ///
    /// `marks` must hold exactly one mark per configured subject.
    pub fn insert(&self, roll: i32, name: &str, marks: Vec<f32>) -> Result<Student> {
        self.check_marks(&marks)?;
        let student = Student::new(roll, name, marks);
        self.append(&student)?;
        Ok(student)
    }

    /// Appends `student` after checking that its roll number is free.
    ///
    /// The name is normalized and the derived fields recomputed before
    /// encoding, so whatever the caller put in them is ignored.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidInput`] if the mark count differs from the
    ///   configured subject count or a mark is NaN or infinite.
    /// - [`StoreError::DuplicateKey`] if the roll number is already stored;
    ///   the file is left untouched.
    pub fn append(&self, student: &Student) -> Result<()> {
        self.check_marks(&student.marks)?;
        if self.exists(student.roll)? {
            return Err(StoreError::DuplicateKey(student.roll));
        }

        let mut s = student.clone();
        s.name = normalize_name(&s.name);
        s.recalculate();

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        f.write_all(&encode(&s))?;
        f.flush()?;
        f.sync_all()?;

        info!("appended roll {} to {}", s.roll, self.path.display());
        Ok(())
    }

    /// Marks must match the configured subject count and be finite.
    pub(crate) fn check_marks(&self, marks: &[f32]) -> Result<()> {
        if marks.len() != self.subjects.count() {
            return Err(StoreError::InvalidInput(format!(
                "expected {} marks, got {}",
                self.subjects.count(),
                marks.len()
            )));
        }
        check_finite(marks)
    }

    /// Number of complete records in the store, from the file length.
    pub fn len(&self) -> Result<u64> {
        match std::fs::metadata(&self.path) {
            Ok(m) => Ok(m.len() / record::RECORD_SIZE as u64),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Rejects NaN and infinite marks.
pub(crate) fn check_finite(marks: &[f32]) -> Result<()> {
    match marks.iter().find(|m| !m.is_finite()) {
        Some(m) => Err(StoreError::InvalidInput(format!(
            "mark {} is not a finite number",
            m
        ))),
        None => Ok(()),
    }
}

/// `<path>.tmp`, next to `path`.
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Fsyncs the parent directory of `path` so a rename into it is durable.
pub(crate) fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
mod tests;
