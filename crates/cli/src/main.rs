//! # CLI - Student Records Interactive Shell
//!
//! A REPL over the student record store. Reads commands from stdin, runs
//! them through [`shell::Shell`], and prints results to stdout. Works
//! interactively or scripted (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! ADD roll m1,m2,.. name           Add a record (one mark per subject)
//! LIST [roll|name|percentage|none] List records a page at a time
//! NEXT / PREV                      Move through the open listing
//! SEARCH roll|name|grade query     Find records
//! UPDATE roll m1,m2,..|- [name]    Edit a record (-1 keeps a mark)
//! DEL roll                         Delete a record
//! BACKUP / RESTORE                 Copy the store to / from the backup file
//! REPORT roll                      Write a report card
//! STATS                            Class statistics
//! RANK                             Class ranking by percentage
//! SUBJECTS [name1,name2,..]        Show or replace the subject list
//! EXIT / QUIT                      Leave the shell
//! ```
//!
//! ## Configuration
//!
//! ```text
//! SRMS_DATA_PATH      store file           (default: "student.dat")
//! SRMS_BACKUP_PATH    backup file          (default: "student_backup.dat")
//! SRMS_SUBJECTS_PATH  subjects file        (default: "subjects.cfg")
//! SRMS_REPORTS_DIR    report directory     (default: "reports")
//! SRMS_PAGE_SIZE      records per page     (default: 5)
//! RUST_LOG            log filter           (default: "warn")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! Student records ready (data=student.dat, backup=student_backup.dat, subjects=Math, Physics, Chemistry, page_size=5)
//! > ADD 7 90,80,70 ann lee
//! OK added 7 (Ann Lee) 80.00% grade B
//! > EXIT
//! bye
//! ```

mod shell;

use anyhow::Result;
use config::Settings;
use shell::{Flow, Shell, HELP};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::from_env();
    let mut shell = Shell::from_settings(&settings)?;

    println!(
        "Student records ready (data={}, backup={}, subjects={}, page_size={})",
        settings.data_path.display(),
        settings.backup_path.display(),
        shell.store().subjects().names().join(", "),
        settings.page_size
    );
    println!("{}", HELP);
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut out = stdout.lock();
        if shell.execute(&line, &mut out)? == Flow::Exit {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
