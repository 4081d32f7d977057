use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() -> Result<(), ConfigError> {
    let dir = tempdir()?;
    let cfg = SubjectConfig::load_or_default(&dir.path().join("subjects.cfg"))?;
    assert_eq!(cfg.names(), &["Math", "Physics", "Chemistry"]);
    assert_eq!(cfg.count(), 3);
    Ok(())
}

#[test]
fn save_and_reload() -> Result<(), ConfigError> {
    let dir = tempdir()?;
    let path = dir.path().join("subjects.cfg");

    let cfg = SubjectConfig::new(&["english", "", "computer science"])?;
    assert_eq!(cfg.names(), &["English", "Subject2", "Computer Science"]);
    cfg.save(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "3\nEnglish\nSubject2\nComputer Science\n");
    assert!(!path.with_extension("cfg.tmp").exists());

    let back = SubjectConfig::load_or_default(&path)?;
    assert_eq!(back, cfg);
    Ok(())
}

#[test]
fn reconfigure_saves_only_valid_lists() -> Result<(), ConfigError> {
    let dir = tempdir()?;
    let path = dir.path().join("subjects.cfg");

    let cfg = SubjectConfig::reconfigure(&path, &["art", "music"])?;
    assert_eq!(SubjectConfig::load_or_default(&path)?, cfg);

    let eleven = vec!["x"; 11];
    assert!(SubjectConfig::reconfigure(&path, &eleven).is_err());
    assert_eq!(SubjectConfig::load_or_default(&path)?.names(), &["Art", "Music"]);
    Ok(())
}

#[test]
fn count_out_of_range_is_rejected() {
    let none: [&str; 0] = [];
    assert!(matches!(
        SubjectConfig::new(&none),
        Err(ConfigError::InvalidInput(_))
    ));
    let eleven = vec!["x"; 11];
    assert!(matches!(
        SubjectConfig::new(&eleven),
        Err(ConfigError::InvalidInput(_))
    ));
    assert!(validate_count(10).is_ok());
}

#[test]
fn unparsable_count_falls_back_to_three() -> Result<(), ConfigError> {
    let dir = tempdir()?;
    let path = dir.path().join("subjects.cfg");
    fs::write(&path, "many\nArt\nMusic\n")?;

    let cfg = SubjectConfig::load_or_default(&path)?;
    assert_eq!(cfg.names(), &["Art", "Music", "Subject3"]);
    Ok(())
}

#[test]
fn count_is_clamped_and_missing_names_filled() -> Result<(), ConfigError> {
    let dir = tempdir()?;
    let path = dir.path().join("subjects.cfg");

    fs::write(&path, "42\nA\n")?;
    let cfg = SubjectConfig::load_or_default(&path)?;
    assert_eq!(cfg.count(), 10);
    assert_eq!(cfg.names()[0], "A");
    assert_eq!(cfg.names()[9], "Subject10");

    fs::write(&path, "-4\nOnly\n")?;
    let cfg = SubjectConfig::load_or_default(&path)?;
    assert_eq!(cfg.names(), &["Only"]);
    Ok(())
}

#[test]
fn label_past_configured_count() {
    let cfg = SubjectConfig::default();
    assert_eq!(cfg.label(1), "Physics");
    assert_eq!(cfg.label(4), "Subject5");
}

#[test]
fn settings_rooted_in_dir() {
    let s = Settings::in_dir(Path::new("/data"));
    assert_eq!(s.data_path, Path::new("/data/student.dat"));
    assert_eq!(s.backup_path, Path::new("/data/student_backup.dat"));
    assert_eq!(s.reports_dir, Path::new("/data/reports"));
    assert_eq!(s.page_size, RECORDS_PER_PAGE);
}
