use record::{Grade, Student};

/// First record with this roll number.
#[must_use]
pub fn find_roll(records: &[Student], roll: i32) -> Option<&Student> {
    records.iter().find(|s| s.roll == roll)
}

/// Records whose name contains `query`, ignoring case. An empty query
/// matches everything.
#[must_use]
pub fn search_name<'a>(records: &'a [Student], query: &str) -> Vec<&'a Student> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Records holding `grade`.
#[must_use]
pub fn filter_grade(records: &[Student], grade: Grade) -> Vec<&Student> {
    records.iter().filter(|s| s.grade == grade).collect()
}
