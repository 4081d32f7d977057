//! Command interpreter behind the interactive shell.
//!
//! [`Shell::execute`] takes one input line, runs it against the store and
//! writes the response to any `Write` sink, so the REPL in `main` and the
//! tests below drive exactly the same code.

use analytics::{filter_grade, find_roll, rank, search_name, sort, ClassStats, Pager, SortKey};
use anyhow::{anyhow, bail, Context, Result};
use config::{Settings, SubjectConfig};
use log::debug;
use record::{Grade, Student, RECORD_SIZE};
use report::ReportGenerator;
use std::io::{self, Write};
use std::path::PathBuf;
use store::{RecordStore, StudentPatch};

pub const HELP: &str = "\
Commands: ADD roll m1,m2,.. name | LIST [roll|name|percentage|none] | NEXT | PREV
          SEARCH roll|name|grade query | UPDATE roll m1,m2,..|- [name]
          DEL roll | BACKUP | RESTORE | REPORT roll | STATS | RANK
          SUBJECTS [name1,name2,..] | HELP | EXIT";

/// Whether the REPL should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    store: RecordStore,
    reports: ReportGenerator,
    subjects_path: PathBuf,
    page_size: usize,
    /// Listing opened by the last `LIST`; dropped whenever the store changes.
    pager: Option<Pager>,
}

impl Shell {
    pub fn new(
        store: RecordStore,
        reports: ReportGenerator,
        subjects_path: PathBuf,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            reports,
            subjects_path,
            page_size,
            pager: None,
        }
    }

    /// Loads the subject list and wires up the store and report directory.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let subjects = SubjectConfig::load_or_default(&settings.subjects_path)
            .with_context(|| format!("loading {}", settings.subjects_path.display()))?;
        Ok(Self::new(
            RecordStore::from_settings(settings, subjects),
            ReportGenerator::new(&settings.reports_dir),
            settings.subjects_path.clone(),
            settings.page_size,
        ))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs one command line. Command failures are reported to `out` as
    /// `ERR ...`; only errors writing to `out` itself are returned.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let mut parts = line.split_whitespace();
        let cmd = match parts.next() {
            Some(c) => c.to_uppercase(),
            None => return Ok(Flow::Continue),
        };
        let args: Vec<&str> = parts.collect();

        let result = match cmd.as_str() {
            "ADD" => self.add(&args, out),
            "LIST" => self.list(&args, out),
            "NEXT" => self.turn_page(true, out),
            "PREV" => self.turn_page(false, out),
            "SEARCH" => self.search(&args, out),
            "UPDATE" => self.update(&args, out),
            "DEL" => self.delete(&args, out),
            "BACKUP" => self.backup(out),
            "RESTORE" => self.restore(out),
            "REPORT" => self.report(&args, out),
            "STATS" => self.stats(out),
            "RANK" => self.rank(out),
            "SUBJECTS" => self.subjects(&args, out),
            "HELP" => writeln!(out, "{}", HELP).map_err(Into::into),
            "EXIT" | "QUIT" => {
                writeln!(out, "bye")?;
                return Ok(Flow::Exit);
            }
            other => {
                writeln!(out, "unknown command: {}", other)?;
                return Ok(Flow::Continue);
            }
        };

        if let Err(e) = result {
            debug!("{} failed: {:#}", cmd, e);
            writeln!(out, "ERR {:#}", e)?;
        }
        Ok(Flow::Continue)
    }

    fn add<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [roll, marks, name @ ..] = args else {
            bail!("usage: ADD roll m1,m2,.. name");
        };
        let roll = parse_roll(roll)?;
        let marks = parse_marks(marks)?;

        let s = self.store.insert(roll, &name.join(" "), marks)?;
        self.pager = None;
        writeln!(
            out,
            "OK added {} ({}) {:.2}% grade {}",
            s.roll, s.name, s.percentage, s.grade
        )?;
        Ok(())
    }

    fn list<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let key = match args.first() {
            Some(k) => k.parse::<SortKey>()?,
            None => SortKey::Unsorted,
        };
        let records = sort(self.store.load_all()?, key);
        self.pager = Some(Pager::new(records, self.page_size));
        self.show_page(out)
    }

    fn turn_page<W: Write>(&mut self, forward: bool, out: &mut W) -> Result<()> {
        let pager = self
            .pager
            .as_mut()
            .ok_or_else(|| anyhow!("no listing open, run LIST first"))?;
        let moved = if forward {
            pager.next_page()
        } else {
            pager.prev_page()
        };
        if !moved {
            writeln!(out, "(no more pages)")?;
        }
        self.show_page(out)
    }

    fn show_page<W: Write>(&self, out: &mut W) -> Result<()> {
        let pager = self
            .pager
            .as_ref()
            .ok_or_else(|| anyhow!("no listing open, run LIST first"))?;
        match pager.page() {
            None => writeln!(out, "(empty)")?,
            Some(page) => {
                write_header(out, self.store.subjects())?;
                for s in page {
                    write_row(out, s, self.store.subjects())?;
                }
                writeln!(out, "page {}/{}", pager.number(), pager.total())?;
            }
        }
        Ok(())
    }

    fn search<W: Write>(&self, args: &[&str], out: &mut W) -> Result<()> {
        let [field, query @ ..] = args else {
            bail!("usage: SEARCH roll|name|grade query");
        };
        let query = query.join(" ");
        if query.is_empty() {
            bail!("usage: SEARCH roll|name|grade query");
        }

        let records = self.store.load_all()?;
        let hits: Vec<&Student> = match field.to_lowercase().as_str() {
            "roll" => find_roll(&records, parse_roll(&query)?).into_iter().collect(),
            "name" => search_name(&records, &query),
            "grade" => filter_grade(&records, parse_grade(&query)?),
            other => bail!("unknown search field '{}'", other),
        };

        if hits.is_empty() {
            writeln!(out, "(no matches)")?;
            return Ok(());
        }
        write_header(out, self.store.subjects())?;
        for s in &hits {
            write_row(out, s, self.store.subjects())?;
        }
        writeln!(out, "({} matches)", hits.len())?;
        Ok(())
    }

    fn update<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [roll, marks, name @ ..] = args else {
            bail!("usage: UPDATE roll m1,m2,..|- [name]  (-1 keeps a mark)");
        };
        let roll = parse_roll(roll)?;
        let marks = if *marks == "-" {
            Vec::new()
        } else {
            parse_marks(marks)?
        };
        let patch = StudentPatch::from_input(&name.join(" "), &marks);

        let s = self.store.update(roll, |s| patch.apply(s))?;
        self.pager = None;
        writeln!(
            out,
            "OK updated {} ({}) {:.2}% grade {}",
            s.roll, s.name, s.percentage, s.grade
        )?;
        Ok(())
    }

    fn delete<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let [roll] = args else {
            bail!("usage: DEL roll");
        };
        let s = self.store.delete(parse_roll(roll)?)?;
        self.pager = None;
        writeln!(out, "OK deleted {} ({})", s.roll, s.name)?;
        Ok(())
    }

    fn backup<W: Write>(&self, out: &mut W) -> Result<()> {
        let bytes = self.store.backup()?;
        writeln!(
            out,
            "OK backed up {} records to {}",
            bytes / RECORD_SIZE as u64,
            self.store.backup_path().display()
        )?;
        Ok(())
    }

    fn restore<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let bytes = self.store.restore()?;
        self.pager = None;
        writeln!(
            out,
            "OK restored {} records from {}",
            bytes / RECORD_SIZE as u64,
            self.store.backup_path().display()
        )?;
        Ok(())
    }

    fn report<W: Write>(&self, args: &[&str], out: &mut W) -> Result<()> {
        let [roll] = args else {
            bail!("usage: REPORT roll");
        };
        let path = self.reports.generate(&self.store, parse_roll(roll)?)?;
        writeln!(out, "OK report written to {}", path.display())?;
        Ok(())
    }

    fn stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let records = self.store.load_all()?;
        let Some(stats) = ClassStats::compute(&records, self.store.subjects()) else {
            writeln!(out, "No records found.")?;
            return Ok(());
        };

        writeln!(out, "Class size: {}", stats.class_size)?;
        writeln!(
            out,
            "Class average percentage: {:.2}",
            stats.average_percentage
        )?;
        for (label, s) in [("Topper", stats.highest), ("Lowest", stats.lowest)] {
            writeln!(
                out,
                "{} (overall): {} (Roll {}) - {:.2}%",
                label, s.name, s.roll, s.percentage
            )?;
        }

        writeln!(out, "Subject-wise toppers:")?;
        for t in &stats.subject_toppers {
            writeln!(
                out,
                " {} : {} (Roll {}) - {:.2}",
                t.subject, t.student.name, t.student.roll, t.mark
            )?;
        }

        writeln!(out, "Grade distribution:")?;
        for (grade, n) in stats.grades.iter() {
            writeln!(out, " {}: {}", grade, n)?;
        }
        Ok(())
    }

    fn rank<W: Write>(&self, out: &mut W) -> Result<()> {
        let ranking = rank(self.store.load_all()?);
        let Some(topper) = ranking.topper() else {
            writeln!(out, "No records found.")?;
            return Ok(());
        };

        write_header(out, self.store.subjects())?;
        for (i, s) in ranking.iter() {
            write!(out, "{:2}) ", i)?;
            write_row(out, s, self.store.subjects())?;
        }
        writeln!(
            out,
            "Topper: {} (Roll {}) - {:.2}%",
            topper.name, topper.roll, topper.percentage
        )?;
        Ok(())
    }

    fn subjects<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        if !args.is_empty() {
            let joined = args.join(" ");
            let names: Vec<&str> = joined.split(',').map(str::trim).collect();
            let config = SubjectConfig::reconfigure(&self.subjects_path, &names)?;
            self.store.set_subjects(config);
            self.pager = None;
            write!(out, "OK ")?;
        }

        let subjects = self.store.subjects();
        writeln!(
            out,
            "{} subjects: {}",
            subjects.count(),
            subjects.names().join(", ")
        )?;
        Ok(())
    }
}

fn parse_roll(s: &str) -> Result<i32> {
    s.parse()
        .with_context(|| format!("invalid roll number '{}'", s))
}

/// Comma-separated marks, e.g. `90,85.5,70`.
fn parse_marks(s: &str) -> Result<Vec<f32>> {
    s.split(',')
        .map(|m| {
            let mark = m
                .trim()
                .parse::<f32>()
                .with_context(|| format!("invalid mark '{}'", m))?;
            if !mark.is_finite() {
                bail!("invalid mark '{}'", m);
            }
            Ok(mark)
        })
        .collect()
}

fn parse_grade(s: &str) -> Result<Grade> {
    let mut chars = s.chars();
    match (chars.next().and_then(Grade::from_char), chars.next()) {
        (Some(g), None) => Ok(g),
        _ => bail!("invalid grade '{}' (expected A, B, C, D or F)", s),
    }
}

/// Mark columns are at least six wide and never narrower than their title.
fn column_width(name: &str) -> usize {
    name.chars().count().max(6)
}

fn write_header<W: Write>(out: &mut W, subjects: &SubjectConfig) -> io::Result<()> {
    write!(out, "{:<8} | {:<25} |", "Roll", "Name")?;
    for name in subjects.names() {
        write!(out, " {:<w$} |", name, w = column_width(name))?;
    }
    writeln!(out, "  Total  |   Perc | Grade")?;
    writeln!(out, "{}", "-".repeat(80))
}

/// One row per record, with exactly one mark column per configured subject
/// so rows line up with [`write_header`]. Slots a record has no mark for are
/// shown as `-`.
fn write_row<W: Write>(out: &mut W, s: &Student, subjects: &SubjectConfig) -> io::Result<()> {
    write!(out, "{:<8} | {:<25} |", s.roll, s.name)?;
    for (i, name) in subjects.names().iter().enumerate() {
        let w = column_width(name);
        match s.marks.get(i) {
            Some(m) => write!(out, " {:>w$.2} |", m, w = w)?,
            None => write!(out, " {:>w$} |", "-", w = w)?,
        }
    }
    writeln!(
        out,
        " {:7.2} | {:6.2} |   {}",
        s.total, s.percentage, s.grade
    )
}
