use crate::Grade;

/// Fields derived from a record's raw marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub total: f32,
    pub percentage: f32,
    pub grade: Grade,
}

/// Recomputes `(total, percentage, grade)` from the first `subject_count`
/// entries of `marks`.
///
/// Pure and idempotent: feeding the same marks back in always yields the same
/// result. `subject_count` must be at least 1; the subject configuration
/// guarantees this, and a zero count yields a zero percentage rather than NaN.
#[must_use]
pub fn recalculate(marks: &[f32], subject_count: usize) -> Derived {
    debug_assert!(subject_count >= 1, "subject count must be at least 1");

    let total: f32 = marks.iter().take(subject_count).sum();
    let percentage = if subject_count == 0 {
        0.0
    } else {
        total / subject_count as f32
    };

    Derived {
        total,
        percentage,
        grade: Grade::from_percentage(percentage),
    }
}
