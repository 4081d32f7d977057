use std::path::{Path, PathBuf};

/// Default primary store file.
pub const DEFAULT_DATA_PATH: &str = "student.dat";
/// Default backup file.
pub const DEFAULT_BACKUP_PATH: &str = "student_backup.dat";
/// Default subjects file.
pub const DEFAULT_SUBJECTS_PATH: &str = "subjects.cfg";
/// Default directory for generated report cards.
pub const DEFAULT_REPORTS_DIR: &str = "reports";
/// Default number of records shown per page.
pub const RECORDS_PER_PAGE: usize = 5;

/// Reads a configuration value from the environment, falling back to `default`.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// File locations and paging for one session.
///
/// ```text
/// SRMS_DATA_PATH      store file           (default: "student.dat")
/// SRMS_BACKUP_PATH    backup file          (default: "student_backup.dat")
/// SRMS_SUBJECTS_PATH  subjects file        (default: "subjects.cfg")
/// SRMS_REPORTS_DIR    report directory     (default: "reports")
/// SRMS_PAGE_SIZE      records per page     (default: 5, min 1)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub backup_path: PathBuf,
    pub subjects_path: PathBuf,
    pub reports_dir: PathBuf,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            backup_path: PathBuf::from(DEFAULT_BACKUP_PATH),
            subjects_path: PathBuf::from(DEFAULT_SUBJECTS_PATH),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            page_size: RECORDS_PER_PAGE,
        }
    }
}

impl Settings {
    /// Reads every setting from the environment.
    pub fn from_env() -> Self {
        let page_size = env_or("SRMS_PAGE_SIZE", "5")
            .parse::<usize>()
            .unwrap_or(RECORDS_PER_PAGE)
            .max(1);

        Self {
            data_path: env_or("SRMS_DATA_PATH", DEFAULT_DATA_PATH).into(),
            backup_path: env_or("SRMS_BACKUP_PATH", DEFAULT_BACKUP_PATH).into(),
            subjects_path: env_or("SRMS_SUBJECTS_PATH", DEFAULT_SUBJECTS_PATH).into(),
            reports_dir: env_or("SRMS_REPORTS_DIR", DEFAULT_REPORTS_DIR).into(),
            page_size,
        }
    }

    /// All default file names, rooted at `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_path: dir.join(DEFAULT_DATA_PATH),
            backup_path: dir.join(DEFAULT_BACKUP_PATH),
            subjects_path: dir.join(DEFAULT_SUBJECTS_PATH),
            reports_dir: dir.join(DEFAULT_REPORTS_DIR),
            page_size: RECORDS_PER_PAGE,
        }
    }
}
