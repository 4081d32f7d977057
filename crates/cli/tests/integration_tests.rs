/// End-to-end tests for the student records shell.
/// Each test drives the real binary over stdin against files in a temp dir,
/// often across several sessions to check what survives a restart.
use record::{encode, Student, RECORD_SIZE};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Runs one shell session over `commands` and returns its stdout.
fn run_session(dir: &Path, commands: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env("SRMS_DATA_PATH", dir.join("student.dat"))
        .env("SRMS_BACKUP_PATH", dir.join("student_backup.dat"))
        .env("SRMS_SUBJECTS_PATH", dir.join("subjects.cfg"))
        .env("SRMS_REPORTS_DIR", dir.join("reports"))
        .env("SRMS_PAGE_SIZE", "3")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(commands.as_bytes())
            .expect("Failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("Failed to write EXIT");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_startup_banner_and_exit() {
    let dir = tempdir().unwrap();
    let output = run_session(dir.path(), "");

    assert!(output.contains("subjects=Math, Physics, Chemistry, page_size=3"));
    assert!(output.trim_end().ends_with("bye"));
    assert!(!dir.path().join("student.dat").exists());
}

#[test]
fn test_records_survive_restart() {
    let dir = tempdir().unwrap();
    run_session(
        dir.path(),
        "ADD 3 90,90,90 zoe\nADD 1 60,70,80 adam smith\nADD 2 30,30,30 bo\n",
    );

    let output = run_session(dir.path(), "LIST roll\n");
    let adam = output.find("Adam Smith").unwrap();
    let bo = output.find("Bo ").unwrap();
    let zoe = output.find("Zoe").unwrap();
    assert!(adam < bo && bo < zoe);
    assert!(output.contains("page 1/1"));

    let len = fs::metadata(dir.path().join("student.dat")).unwrap().len();
    assert_eq!(len, 3 * RECORD_SIZE as u64);
}

#[test]
fn test_duplicate_roll_across_sessions() {
    let dir = tempdir().unwrap();
    run_session(dir.path(), "ADD 5 50,50,50 first\n");
    let output = run_session(dir.path(), "ADD 5 99,99,99 second\nSEARCH roll 5\n");

    assert!(output.contains("ERR roll number 5 already exists"));
    assert!(output.contains("First"));
    assert!(!output.contains("Second"));
}

#[test]
fn test_paging_in_one_session() {
    let dir = tempdir().unwrap();
    let mut commands = String::new();
    for r in 1..=7 {
        commands.push_str(&format!("ADD {} {},{},{} s{}\n", r, r, r, r, r));
    }
    commands.push_str("LIST roll\nNEXT\nNEXT\nNEXT\nPREV\n");
    let output = run_session(dir.path(), &commands);

    assert!(output.contains("page 1/3"));
    assert!(output.contains("page 2/3"));
    assert!(output.contains("page 3/3"));
    assert!(output.contains("(no more pages)"));
}

#[test]
fn test_update_and_delete_persist() {
    let dir = tempdir().unwrap();
    run_session(
        dir.path(),
        "ADD 1 40,40,40 a\nADD 2 50,50,50 b\nADD 3 60,60,60 c\n",
    );
    run_session(dir.path(), "UPDATE 2 -1,-1,95 bea\nDEL 1\n");

    let output = run_session(dir.path(), "LIST\nDEL 1\n");
    assert!(output.contains("Bea"));
    assert!(output.contains("195.00"));
    assert!(output.contains("ERR roll number 1 not found"));

    let len = fs::metadata(dir.path().join("student.dat")).unwrap().len();
    assert_eq!(len, 2 * RECORD_SIZE as u64);
    assert!(!dir.path().join("student.dat.tmp").exists());
}

#[test]
fn test_backup_and_restore_across_sessions() {
    let dir = tempdir().unwrap();
    run_session(dir.path(), "ADD 1 70,70,70 keep\nBACKUP\n");
    run_session(dir.path(), "DEL 1\nADD 2 10,10,10 later\n");

    let output = run_session(dir.path(), "RESTORE\nLIST\n");
    assert!(output.contains("OK restored 1 records"));
    assert!(output.contains("Keep"));
    assert!(!output.contains("Later"));
    assert_eq!(
        fs::read(dir.path().join("student.dat")).unwrap(),
        fs::read(dir.path().join("student_backup.dat")).unwrap()
    );
}

#[test]
fn test_report_card_file() {
    let dir = tempdir().unwrap();
    let output = run_session(dir.path(), "ADD 42 88,77,66 lee\nREPORT 42\n");
    assert!(output.contains("OK report written to"));

    let text = fs::read_to_string(dir.path().join("reports/report_roll_42.txt")).unwrap();
    assert!(text.starts_with("----- Report Card -----\nRoll Number: 42\nName: Lee\n"));
    assert!(text.contains("Percentage  : 77.00\n"));
    assert!(text.contains("Generated on: "));
}

#[test]
fn test_subject_config_persists() {
    let dir = tempdir().unwrap();
    run_session(dir.path(), "SUBJECTS biology, art\n");

    let output = run_session(dir.path(), "ADD 1 80,60 pat\nLIST\n");
    assert!(output.contains("subjects=Biology, Art"));
    assert!(output.contains("OK added 1 (Pat) 70.00% grade C"));
    assert!(output.contains("| Biology | Art    |"));
}

#[test]
fn test_trailing_partial_record_is_ignored() {
    let dir = tempdir().unwrap();
    run_session(dir.path(), "ADD 1 50,50,50 whole\n");

    let path = dir.path().join("student.dat");
    OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap()
        .write_all(&[0xAB; 20])
        .unwrap();

    let output = run_session(dir.path(), "LIST\nSTATS\n");
    assert!(output.contains("Whole"));
    assert!(output.contains("Class size: 1"));
}

#[test]
fn test_corrupt_record_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("student.dat");

    let mut block = encode(&Student::new(9, "bad", vec![1.0, 2.0, 3.0]));
    block[104] = 0; // subject count
    fs::write(&path, block).unwrap();

    let output = run_session(dir.path(), "LIST\nDEL 9\n");
    assert!(output.contains("ERR corrupt record at offset 0"));
    assert_eq!(fs::read(&path).unwrap(), block.to_vec());
}

#[test]
fn test_unknown_command_and_usage() {
    let dir = tempdir().unwrap();
    let output = run_session(dir.path(), "FOO\nDEL\nSEARCH name\n");

    assert!(output.contains("unknown command: FOO"));
    assert!(output.contains("ERR usage: DEL roll"));
    assert!(output.contains("ERR usage: SEARCH"));
}
