use log::info;
use std::fs;
use std::path::Path;

use crate::{sync_parent_dir, tmp_path_for, RecordStore, Result, StoreError};

impl RecordStore {
    /// Copies the store file byte-for-byte to the backup path, replacing any
    /// previous backup.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingFile`] if there is no store file to back up.
    pub fn backup(&self) -> Result<u64> {
        let n = copy_replace(self.path(), self.backup_path())?;
        info!("backed up {} bytes to {}", n, self.backup_path().display());
        Ok(n)
    }

    /// Replaces the store file with the backup, byte-for-byte.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingFile`] if no backup exists.
    pub fn restore(&self) -> Result<u64> {
        let n = copy_replace(self.backup_path(), self.path())?;
        info!("restored {} bytes from {}", n, self.backup_path().display());
        Ok(n)
    }
}

/// Copies `src` to `dst` through `<dst>.tmp` so `dst` is never seen half
/// copied. Returns the number of bytes copied.
fn copy_replace(src: &Path, dst: &Path) -> Result<u64> {
    if !src.exists() {
        return Err(StoreError::MissingFile(src.to_path_buf()));
    }

    let tmp = tmp_path_for(dst);
    let n = match fs::copy(src, &tmp) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
    };
    fs::File::open(&tmp)?.sync_all()?;
    fs::rename(&tmp, dst)?;
    sync_parent_dir(dst);
    Ok(n)
}
