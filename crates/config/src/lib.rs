//! # Config - Subject Configuration and Runtime Settings
//!
//! Two pieces of configuration feed the rest of the workspace:
//!
//! - [`SubjectConfig`]: the ordered list of subject names. Loaded once at
//!   startup, passed by value into the store, analytics and report layers,
//!   and persisted back only when explicitly reconfigured.
//! - [`Settings`]: file locations and paging, read from environment
//!   variables with defaults.
//!
//! ## Subjects File Format
//!
//! A small text file: the subject count on the first line, then one name per
//! line.
//!
//! ```text
//! 3
//! Math
//! Physics
//! Chemistry
//! ```
//!
//! Loading is forgiving: a missing file yields the defaults, an unparsable
//! count falls back to 3, an out-of-range count is clamped to
//! `1..=MAX_SUBJECTS`, and missing name lines become `Subject<N>`.
//!
//! ## Crash Safety
//!
//! Saving writes to `<path>.tmp`, fsyncs, then renames over the target so the
//! file is never observed half-written.

mod settings;

pub use settings::{
    env_or, Settings, DEFAULT_BACKUP_PATH, DEFAULT_DATA_PATH, DEFAULT_REPORTS_DIR,
    DEFAULT_SUBJECTS_PATH, RECORDS_PER_PAGE,
};

use log::{debug, info, warn};
use record::{title_case, MAX_SUBJECTS};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

/// Subject count used when nothing usable is configured.
pub const DEFAULT_SUBJECT_COUNT: usize = 3;

const DEFAULT_SUBJECTS: [&str; DEFAULT_SUBJECT_COUNT] = ["Math", "Physics", "Chemistry"];

/// Errors from loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A caller-supplied value is out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Ordered subject names; the count is always within `1..=MAX_SUBJECTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfig {
    names: Vec<String>,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SubjectConfig {
    /// Builds a configuration from user-entered names.
    ///
    /// Blank names become `Subject<N>` and every name is title-cased.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidInput`] if `names` is empty or longer than
    /// [`MAX_SUBJECTS`].
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        validate_count(names.len())?;
        let names = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let n = n.as_ref().trim();
                if n.is_empty() {
                    placeholder(i)
                } else {
                    title_case(n)
                }
            })
            .collect();
        Ok(Self { names })
    }

    /// Number of configured subjects (at least 1).
    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Display name for mark slot `i`; slots past the configured count (from
    /// records written under an older configuration) get `Subject<N>`.
    #[must_use]
    pub fn label(&self, i: usize) -> String {
        self.names.get(i).cloned().unwrap_or_else(|| placeholder(i))
    }

    /// Loads the configuration from `path`, or returns the defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no subjects file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut lines = contents.lines();
        let count = match lines.next().and_then(|l| l.trim().parse::<i64>().ok()) {
            Some(n) => n.clamp(1, MAX_SUBJECTS as i64) as usize,
            None => {
                warn!(
                    "unparsable subject count in {}, using {}",
                    path.display(),
                    DEFAULT_SUBJECT_COUNT
                );
                DEFAULT_SUBJECT_COUNT
            }
        };

        let names = (0..count)
            .map(|i| match lines.next() {
                Some(l) => l.trim_end_matches('\r').to_string(),
                None => placeholder(i),
            })
            .collect::<Vec<_>>();

        info!("loaded {} subjects from {}", names.len(), path.display());
        Ok(Self { names })
    }

    /// Persists the configuration to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let tmp_path = path.with_extension("cfg.tmp");

        {
            let mut f = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            writeln!(f, "{}", self.names.len())?;
            for name in &self.names {
                writeln!(f, "{}", name)?;
            }
            f.flush()?;
            f.sync_all()?;
        }

        fs::rename(&tmp_path, path)?;
        info!("saved {} subjects to {}", self.names.len(), path.display());
        Ok(())
    }

    /// Replaces the subject list with `names` and saves it to `path`.
    ///
    /// Nothing is written if `names` has an invalid length.
    pub fn reconfigure<S: AsRef<str>>(path: &Path, names: &[S]) -> Result<Self, ConfigError> {
        let config = Self::new(names)?;
        config.save(path)?;
        Ok(config)
    }
}

/// Checks that a requested subject count is within `1..=MAX_SUBJECTS`.
pub fn validate_count(count: usize) -> Result<(), ConfigError> {
    if count == 0 || count > MAX_SUBJECTS {
        return Err(ConfigError::InvalidInput(format!(
            "subject count {} out of range 1..={}",
            count, MAX_SUBJECTS
        )));
    }
    Ok(())
}

fn placeholder(i: usize) -> String {
    format!("Subject{}", i + 1)
}

#[cfg(test)]
mod tests;
