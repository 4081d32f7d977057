use record::Student;
use std::cmp::Ordering;
use std::str::FromStr;

use thiserror::Error;

/// Ordering applied to a snapshot before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Roll number, ascending.
    Roll,
    /// Name, case-insensitive ascending.
    Name,
    /// Percentage, descending.
    PercentageDesc,
    /// On-disk order.
    #[default]
    Unsorted,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key '{0}' (expected roll, name, percentage or none)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "roll" | "1" => Ok(SortKey::Roll),
            "name" | "2" => Ok(SortKey::Name),
            "percentage" | "pct" | "3" => Ok(SortKey::PercentageDesc),
            "none" | "unsorted" | "4" => Ok(SortKey::Unsorted),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl SortKey {
    fn compare(self, a: &Student, b: &Student) -> Ordering {
        match self {
            SortKey::Roll => a.roll.cmp(&b.roll),
            SortKey::Name => a
                .name
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.name.chars().flat_map(char::to_lowercase)),
            SortKey::PercentageDesc => b
                .percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(Ordering::Equal),
            SortKey::Unsorted => Ordering::Equal,
        }
    }
}

/// Orders `records` by `key`. The sort is stable: records that compare equal
/// keep their relative order from the input.
#[must_use]
pub fn sort(mut records: Vec<Student>, key: SortKey) -> Vec<Student> {
    if key != SortKey::Unsorted {
        records.sort_by(|a, b| key.compare(a, b));
    }
    records
}

/// A snapshot ordered by percentage, best first.
#[derive(Debug, Clone)]
pub struct Ranking {
    entries: Vec<Student>,
}

/// Ranks `records` by percentage. Ties keep their input order and receive
/// consecutive ranks.
#[must_use]
pub fn rank(records: Vec<Student>) -> Ranking {
    Ranking {
        entries: sort(records, SortKey::PercentageDesc),
    }
}

impl Ranking {
    /// The highest-ranked record, if any.
    #[must_use]
    pub fn topper(&self) -> Option<&Student> {
        self.entries.first()
    }

    /// `(rank, record)` pairs with 1-based ranks.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Student)> {
        self.entries.iter().enumerate().map(|(i, s)| (i + 1, s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Student] {
        &self.entries
    }
}
