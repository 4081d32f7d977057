use config::SubjectConfig;
use record::{Grade, Student};

/// Number of records per grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeCounts([usize; 5]);

impl GradeCounts {
    #[must_use]
    pub fn get(&self, grade: Grade) -> usize {
        self.0[grade.index()]
    }

    fn add(&mut self, grade: Grade) {
        self.0[grade.index()] += 1;
    }

    /// `(grade, count)` pairs from A to F.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        Grade::ALL.iter().map(move |&g| (g, self.get(g)))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Highest mark in one subject and who holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectTopper<'a> {
    pub subject: String,
    pub student: &'a Student,
    pub mark: f32,
}

/// Class-wide statistics over a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStats<'a> {
    pub class_size: usize,
    pub average_percentage: f64,
    /// Highest percentage; the first such record in scan order on ties.
    pub highest: &'a Student,
    /// Lowest percentage; the first such record in scan order on ties.
    pub lowest: &'a Student,
    /// One entry per configured subject that at least one record has a mark
    /// for, in subject order.
    pub subject_toppers: Vec<SubjectTopper<'a>>,
    pub grades: GradeCounts,
}

impl<'a> ClassStats<'a> {
    /// Computes every statistic in a single pass over `records`.
    ///
    /// Returns `None` for an empty snapshot, where an average is undefined.
    /// Subject toppers cover the subjects in `subjects`; a record written
    /// under a smaller subject count simply does not compete for the
    /// subjects it has no mark for.
    #[must_use]
    pub fn compute(records: &'a [Student], subjects: &SubjectConfig) -> Option<Self> {
        let first = records.first()?;

        let mut percentage_sum = 0.0f64;
        let mut highest = first;
        let mut lowest = first;
        let mut toppers: Vec<Option<(&'a Student, f32)>> = vec![None; subjects.count()];
        let mut grades = GradeCounts::default();

        for s in records {
            percentage_sum += f64::from(s.percentage);
            if s.percentage > highest.percentage {
                highest = s;
            }
            if s.percentage < lowest.percentage {
                lowest = s;
            }
            for (slot, &mark) in toppers.iter_mut().zip(s.marks.iter()) {
                let better = match *slot {
                    Some((_, best)) => mark > best,
                    None => true,
                };
                if better {
                    *slot = Some((s, mark));
                }
            }
            grades.add(s.grade);
        }

        let subject_toppers = toppers
            .into_iter()
            .enumerate()
            .filter_map(|(i, t)| {
                t.map(|(student, mark)| SubjectTopper {
                    subject: subjects.label(i),
                    student,
                    mark,
                })
            })
            .collect();

        Some(Self {
            class_size: records.len(),
            average_percentage: percentage_sum / records.len() as f64,
            highest,
            lowest,
            subject_toppers,
            grades,
        })
    }
}
