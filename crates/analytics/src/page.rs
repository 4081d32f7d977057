use record::Student;

/// Splits `records` into consecutive pages of up to `page_size` entries.
///
/// The last page may be partial; an empty input yields no pages. A
/// `page_size` of zero is treated as one.
#[must_use]
pub fn paginate(records: &[Student], page_size: usize) -> Vec<&[Student]> {
    records.chunks(page_size.max(1)).collect()
}

/// Page-by-page navigation over an ordered snapshot it owns.
///
/// Moving past either end is a no-op, matching the interactive `n`/`p`
/// navigation.
#[derive(Debug, Clone)]
pub struct Pager {
    records: Vec<Student>,
    page_size: usize,
    current: usize,
}

impl Pager {
    pub fn new(records: Vec<Student>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            current: 0,
        }
    }

    /// `true` when there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of pages.
    #[must_use]
    pub fn total(&self) -> usize {
        (self.records.len() + self.page_size - 1) / self.page_size
    }

    /// 1-based number of the current page (0 when empty).
    #[must_use]
    pub fn number(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.current + 1
        }
    }

    /// Records on the current page.
    #[must_use]
    pub fn page(&self) -> Option<&[Student]> {
        self.records.chunks(self.page_size).nth(self.current)
    }

    /// Advances one page; returns `false` if already on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current + 1 < self.total() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page; returns `false` if already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}
