use super::*;
use anyhow::Result;
use chrono::Utc;
use tempfile::tempdir;

fn open_store(dir: &Path) -> RecordStore {
    RecordStore::new(
        dir.join("student.dat"),
        dir.join("student_backup.dat"),
        SubjectConfig::default(),
    )
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

#[test]
fn render_layout() {
    let s = Student::new(10, "ann lee", vec![90.0, 80.0, 70.0]);
    let text = render(&s, &SubjectConfig::default(), &fixed_time());

    let expected = "\
----- Report Card -----
Roll Number: 10
Name: Ann Lee
Math         : 90.00
Physics      : 80.00
Chemistry    : 70.00
Total       : 240.00
Percentage  : 80.00
Grade       : B
Generated on: Fri Oct 16 09:30:00 2026
";
    assert_eq!(text, expected);
}

#[test]
fn render_labels_extra_slots() {
    let s = Student::new(1, "x", vec![10.0, 20.0, 30.0, 40.0]);
    let text = render(&s, &SubjectConfig::default(), &fixed_time());
    assert!(text.contains("Subject4     : 40.00\n"));
}

#[test]
fn generate_writes_report_named_by_roll() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path());
    store.insert(10, "ann lee", vec![90.0, 80.0, 70.0])?;

    let reports = ReportGenerator::new(dir.path().join("reports"));
    let path = reports.generate_at(&store, 10, fixed_time())?;

    assert_eq!(path, dir.path().join("reports").join("report_roll_10.txt"));
    let text = fs::read_to_string(&path)?;
    assert!(text.starts_with("----- Report Card -----\nRoll Number: 10\n"));
    assert!(text.contains("Grade       : B\n"));
    Ok(())
}

#[test]
fn generate_overwrites_previous_report() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path());
    store.insert(3, "old name", vec![50.0, 50.0, 50.0])?;

    let reports = ReportGenerator::new(dir.path().join("reports"));
    let path = reports.generate(&store, 3)?;
    store.update(3, |s| s.name = "new name".into())?;
    reports.generate(&store, 3)?;

    let text = fs::read_to_string(&path)?;
    assert!(text.contains("Name: New Name\n"));
    assert!(!text.contains("Old Name"));
    Ok(())
}

#[test]
fn generate_missing_roll_is_not_found() -> Result<()> {
    let dir = tempdir()?;
    let store = open_store(dir.path());
    store.insert(1, "a", vec![1.0, 2.0, 3.0])?;

    let reports = ReportGenerator::new(dir.path().join("reports"));
    let err = reports.generate(&store, 2).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(2)));
    assert!(!reports.report_path(2).exists());
    Ok(())
}
