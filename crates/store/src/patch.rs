use record::Student;

/// A partial edit of a record, in the form the interactive layer collects it:
/// a blank name keeps the current name and a negative mark keeps the current
/// mark.
///
/// ```rust
/// use record::Student;
/// use store::StudentPatch;
///
/// let mut s = Student::new(1, "ann lee", vec![50.0, 60.0]);
/// StudentPatch::from_input("", &[-1.0, 95.0]).apply(&mut s);
/// assert_eq!(s.name, "Ann Lee");
/// assert_eq!(s.marks, vec![50.0, 95.0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    /// Replacement name, if any.
    pub name: Option<String>,
    /// Replacement mark per subject slot; `None` keeps the current mark.
    pub marks: Vec<Option<f32>>,
}

impl StudentPatch {
    /// Interprets raw input: blank `name` and negative marks mean "keep".
    pub fn from_input(name: &str, marks: &[f32]) -> Self {
        let name = if name.trim().is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        let marks = marks
            .iter()
            .map(|&m| if m >= 0.0 { Some(m) } else { None })
            .collect();
        Self { name, marks }
    }

    /// Writes the patch into `s`. Mark slots beyond the record's current
    /// length are created as needed. Derived fields are left to the store.
    pub fn apply(&self, s: &mut Student) {
        if let Some(name) = &self.name {
            s.name = name.clone();
        }
        for (i, m) in self.marks.iter().enumerate() {
            if let Some(m) = m {
                if i >= s.marks.len() {
                    s.marks.resize(i + 1, 0.0);
                }
                s.marks[i] = *m;
            }
        }
    }
}
