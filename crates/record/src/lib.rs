//! # Record - Student Result Records
//!
//! The leaf crate of the workspace. It defines the [`Student`] record, the
//! fixed-width binary layout every record occupies on disk, and the pure
//! calculator that keeps the derived fields (`total`, `percentage`, `grade`)
//! consistent with the raw marks.
//!
//! ## Binary Record Format
//!
//! Every record is exactly [`RECORD_SIZE`] bytes, regardless of how many
//! subjects it carries. All integers and floats are little-endian.
//!
//! ```text
//! [roll: i32][name: 100 bytes, NUL padded][subject_count: u8]
//! [marks: 10 x f32, unused slots zero][total: f32][percentage: f32][grade: u8]
//! ```
//!
//! Each record stores the number of mark slots that were meaningful when it
//! was last written, so a later change of the configured subject count never
//! reinterprets older records.
//!
//! ## Example
//!
//! ```rust
//! use record::{Grade, Student};
//!
//! let s = Student::new(10, "ann lee", vec![90.0, 80.0, 70.0]);
//! assert_eq!(s.name, "Ann Lee");
//! assert_eq!(s.total, 240.0);
//! assert_eq!(s.grade, Grade::B);
//! ```

mod codec;
mod derived;

pub use codec::{decode, encode, RecordReader, RECORD_SIZE};
pub use derived::{recalculate, Derived};

use std::fmt;
use std::io;

use thiserror::Error;

/// Number of bytes reserved for the name field (including the NUL terminator).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum number of subjects (mark slots) a record can carry.
pub const MAX_SUBJECTS: usize = 10;

/// Name stored when the caller supplies an empty one.
pub const DEFAULT_NAME: &str = "Unnamed Student";

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Maps a percentage onto the fixed thresholds
    /// (>=90 A, >=75 B, >=60 C, >=40 D, else F).
    #[must_use]
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage >= 90.0 {
            Grade::A
        } else if percentage >= 75.0 {
            Grade::B
        } else if percentage >= 60.0 {
            Grade::C
        } else if percentage >= 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Parses a grade letter, ignoring case.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Grade::A),
            'B' => Some(Grade::B),
            'C' => Some(Grade::C),
            'D' => Some(Grade::D),
            'F' => Some(Grade::F),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::F => 'F',
        }
    }

    /// Position of this grade in [`Grade::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One student's academic record.
///
/// `total`, `percentage` and `grade` are derived from `marks`. Construct via
/// [`Student::new`] or call [`Student::recalculate`] after editing `marks`;
/// never assign the derived fields directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// Unique key across the store.
    pub roll: i32,
    /// Title-cased display name, at most `MAX_NAME_LEN - 1` bytes.
    pub name: String,
    /// One mark per subject, aligned with the subject names in force when the
    /// record was last written.
    pub marks: Vec<f32>,
    pub total: f32,
    pub percentage: f32,
    pub grade: Grade,
}

impl Student {
    /// Builds a record with a normalized name and freshly derived fields.
    pub fn new(roll: i32, name: &str, marks: Vec<f32>) -> Self {
        let mut s = Student {
            roll,
            name: normalize_name(name),
            marks,
            total: 0.0,
            percentage: 0.0,
            grade: Grade::F,
        };
        s.recalculate();
        s
    }

    /// Number of subjects this record carries marks for.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.marks.len()
    }

    /// Recomputes `total`, `percentage` and `grade` from `marks`. A record
    /// with no marks gets zeroes and grade F.
    pub fn recalculate(&mut self) {
        let d = recalculate(&self.marks, self.marks.len().max(1));
        self.total = d.total;
        self.percentage = d.percentage;
        self.grade = d.grade;
    }
}

/// Errors raised while decoding records from a byte stream.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A complete block whose contents cannot be a valid record.
    #[error("corrupt record at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },
}

/// Title-cases `s`: the first character of every whitespace-separated word is
/// upper-cased, the rest lower-cased. Whitespace is preserved.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut cap_next = true;
    for c in s.chars() {
        if c.is_whitespace() {
            cap_next = true;
            out.push(c);
        } else if cap_next {
            out.extend(c.to_uppercase());
            cap_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Applies the write-time name rules: blank names become [`DEFAULT_NAME`],
/// names are title-cased and truncated to fit the on-disk field.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    if name.trim().is_empty() {
        return DEFAULT_NAME.to_string();
    }
    let titled = title_case(name);
    truncate_utf8(&titled, MAX_NAME_LEN - 1).to_string()
}

/// Longest prefix of `s` no longer than `max` bytes that ends on a char boundary.
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
