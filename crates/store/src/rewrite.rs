/// Mutation path: `update()` and `delete()`.
///
/// Both stream the whole store through [`RecordStore::rewrite`], which copies
/// every non-matching block byte-for-byte into `<store>.tmp`, hands matching
/// records to an edit closure, and finally renames the temp file over the
/// store. The rewrite runs to completion even when nothing matches, so a
/// missed lookup costs one harmless full copy.
use log::{debug, info};
use record::{encode, normalize_name, RecordReader, Student};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::{check_finite, sync_parent_dir, RecordStore, Result, StoreError};

impl RecordStore {
    /// Applies `mutator` to the record with this roll number.
    ///
    /// After the mutator runs, the roll number is restored (the key cannot be
    /// changed through an update), the name is normalized, the marks are
    /// resized to the current subject count (new slots are `0.0`) and the
    /// derived fields are recomputed. Returns the record as written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no record matched. The store has still
    ///   been rewritten (unchanged) in that case, unless it did not exist at
    ///   all.
    /// - [`StoreError::InvalidInput`] if the mutator left a NaN or infinite
    ///   mark. The rewrite is abandoned and the store is left untouched.
    pub fn update<F>(&self, roll: i32, mutator: F) -> Result<Student>
    where
        F: FnOnce(&mut Student),
    {
        let count = self.subjects().count();
        let mut mutator = Some(mutator);
        let mut updated = None;

        self.rewrite(roll, |mut s| {
            if let Some(m) = mutator.take() {
                m(&mut s);
                s.roll = roll;
                s.name = normalize_name(&s.name);
                s.marks.resize(count, 0.0);
                check_finite(&s.marks)?;
                s.recalculate();
                updated = Some(s.clone());
            }
            Ok(Some(s))
        })?;

        match updated {
            Some(s) => {
                info!("updated roll {}", roll);
                Ok(s)
            }
            None => Err(StoreError::NotFound(roll)),
        }
    }

    /// Removes the record with this roll number and returns it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no record matched, with the same harmless
    /// rewrite as [`update`](Self::update).
    pub fn delete(&self, roll: i32) -> Result<Student> {
        let mut removed = None;

        self.rewrite(roll, |s| {
            if removed.is_none() {
                removed = Some(s);
            }
            Ok(None)
        })?;

        match removed {
            Some(s) => {
                info!("deleted roll {}", roll);
                Ok(s)
            }
            None => Err(StoreError::NotFound(roll)),
        }
    }

    /// Streams the store into the temp file and renames it over the store.
    ///
    /// Every record whose roll equals `roll` is passed to `edit`, which
    /// returns the record to write in its place or `None` to drop it. All
    /// other blocks are copied verbatim in their original order.
    ///
    /// An absent store yields [`StoreError::NotFound`] without creating any
    /// file. If anything fails before the rename completes (the scan, an
    /// `edit` error, flush, fsync or the rename itself) the temp file is
    /// removed and the store is left untouched.
    fn rewrite<F>(&self, roll: i32, mut edit: F) -> Result<()>
    where
        F: FnMut(Student) -> Result<Option<Student>>,
    {
        let mut reader = match RecordReader::open(self.path()) {
            Ok(r) => r,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(roll));
            }
            Err(e) => return Err(e.into()),
        };

        let tmp_path = self.tmp_path();
        let raw_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut out = BufWriter::new(raw_file);

        let copied = match copy_with_edit(&mut reader, &mut out, roll, &mut edit) {
            Ok(n) => n,
            Err(e) => {
                drop(out);
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        };

        if let Err(e) = commit(out, &tmp_path, self.path()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        sync_parent_dir(self.path());

        debug!(
            "rewrote {} ({} records kept)",
            self.path().display(),
            copied
        );
        Ok(())
    }
}

/// Copies `reader` into `out`, routing records that match `roll` through
/// `edit`. Returns the number of records written.
fn copy_with_edit<F>(
    reader: &mut RecordReader<File>,
    out: &mut BufWriter<File>,
    roll: i32,
    edit: &mut F,
) -> Result<usize>
where
    F: FnMut(Student) -> Result<Option<Student>>,
{
    let mut written = 0;
    while let Some(s) = reader.next_record()? {
        if s.roll == roll {
            if let Some(replacement) = edit(s)? {
                out.write_all(&encode(&replacement))?;
                written += 1;
            }
        } else {
            out.write_all(reader.block())?;
            written += 1;
        }
    }
    Ok(written)
}

/// Flushes and fsyncs `out`, then renames `tmp_path` over `path`.
fn commit(mut out: BufWriter<File>, tmp_path: &Path, path: &Path) -> Result<()> {
    out.flush()?;
    out.into_inner().map_err(io::Error::from)?.sync_all()?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
