//! # Analytics - Snapshot Queries
//!
//! Everything in this crate works on a caller-owned snapshot (`&[Student]`
//! or `Vec<Student>`, typically from `RecordStore::load_all`). Nothing here
//! touches the filesystem and nothing is ever written back to the store.
//!
//! | Module   | Purpose                                                 |
//! |----------|---------------------------------------------------------|
//! | `sort`   | stable ordering by roll, name, or percentage; ranking   |
//! | `page`   | fixed-size pages and a clamped next/prev cursor         |
//! | `search` | roll lookup, name substring, grade filter               |
//! | `stats`  | class-wide and per-subject statistics in one pass       |
//!
//! All statistics trust the derived fields already stored on each record;
//! nothing is recomputed from marks.

mod page;
mod search;
mod sort;
mod stats;

pub use page::{paginate, Pager};
pub use search::{filter_grade, find_roll, search_name};
pub use sort::{rank, sort, ParseSortKeyError, Ranking, SortKey};
pub use stats::{ClassStats, GradeCounts, SubjectTopper};
