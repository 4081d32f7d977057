use byteorder::{LittleEndian, ReadBytesExt};
use log::warn;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::{CodecError, Grade, Student, MAX_NAME_LEN, MAX_SUBJECTS};

/// Size of one encoded record in bytes:
/// 4 (`roll`) + 100 (`name`) + 1 (`subject_count`) + 40 (`marks`)
/// + 4 (`total`) + 4 (`percentage`) + 1 (`grade`).
pub const RECORD_SIZE: usize = 4 + MAX_NAME_LEN + 1 + 4 * MAX_SUBJECTS + 4 + 4 + 1;

/// Encodes `s` into a fixed-width block.
///
/// Never fails: a name longer than the field is cut on a char boundary and
/// marks beyond [`MAX_SUBJECTS`] are dropped.
#[must_use]
pub fn encode(s: &Student) -> [u8; RECORD_SIZE] {
    let mut buf = Vec::with_capacity(RECORD_SIZE);

    buf.extend_from_slice(&s.roll.to_le_bytes());

    let mut name = [0u8; MAX_NAME_LEN];
    let mut end = s.name.len().min(MAX_NAME_LEN - 1);
    while !s.name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].copy_from_slice(&s.name.as_bytes()[..end]);
    buf.extend_from_slice(&name);

    let count = s.marks.len().min(MAX_SUBJECTS);
    buf.push(count as u8);
    for i in 0..MAX_SUBJECTS {
        let m = if i < count { s.marks[i] } else { 0.0 };
        buf.extend_from_slice(&m.to_le_bytes());
    }

    buf.extend_from_slice(&s.total.to_le_bytes());
    buf.extend_from_slice(&s.percentage.to_le_bytes());
    buf.push(s.grade.as_char() as u8);

    let mut block = [0u8; RECORD_SIZE];
    block.copy_from_slice(&buf);
    block
}

/// Decodes one block. `offset` is the block's position in the file and is
/// only used for error reporting.
pub fn decode(block: &[u8], offset: u64) -> Result<Student, CodecError> {
    if block.len() != RECORD_SIZE {
        return Err(CodecError::Corrupt {
            offset,
            reason: format!("block is {} bytes, expected {}", block.len(), RECORD_SIZE),
        });
    }

    let mut r = block;
    let roll = r.read_i32::<LittleEndian>()?;

    let mut name_buf = [0u8; MAX_NAME_LEN];
    r.read_exact(&mut name_buf)?;
    let name_len = name_buf.iter().position(|&b| b == 0).unwrap_or(MAX_NAME_LEN);
    let name = String::from_utf8_lossy(&name_buf[..name_len]).into_owned();

    let count = r.read_u8()? as usize;
    if count == 0 || count > MAX_SUBJECTS {
        return Err(CodecError::Corrupt {
            offset,
            reason: format!("subject count {} out of range 1..={}", count, MAX_SUBJECTS),
        });
    }

    let mut marks = Vec::with_capacity(count);
    for i in 0..MAX_SUBJECTS {
        let m = r.read_f32::<LittleEndian>()?;
        if i < count {
            marks.push(m);
        }
    }

    let total = r.read_f32::<LittleEndian>()?;
    let percentage = r.read_f32::<LittleEndian>()?;
    let grade_byte = r.read_u8()?;
    let grade = Grade::from_char(grade_byte as char)
        .filter(|_| grade_byte.is_ascii_uppercase())
        .ok_or_else(|| CodecError::Corrupt {
            offset,
            reason: format!("invalid grade byte {:#04x}", grade_byte),
        })?;

    Ok(Student {
        roll,
        name,
        marks,
        total,
        percentage,
        grade,
    })
}

/// Sequential reader over a stream of fixed-width records.
///
/// A partial block at the end of the stream (a file whose length is not a
/// multiple of [`RECORD_SIZE`]) is treated as a clean end-of-stream.
pub struct RecordReader<R: Read> {
    rdr: BufReader<R>,
    /// Offset of the next unread block.
    offset: u64,
    block: [u8; RECORD_SIZE],
}

impl RecordReader<File> {
    /// Opens an existing record file for sequential reading.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<RecordReader<File>> {
        let f = File::open(path)?;
        Ok(RecordReader::from_reader(f))
    }
}

impl<R: Read> RecordReader<R> {
    /// Constructs a reader from any `Read` implementor.
    pub fn from_reader(reader: R) -> Self {
        RecordReader {
            rdr: BufReader::new(reader),
            offset: 0,
            block: [0u8; RECORD_SIZE],
        }
    }

    /// Byte offset of the next block to be read.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The raw bytes of the block most recently returned by
    /// [`next_block`](Self::next_block) or [`next_record`](Self::next_record).
    #[must_use]
    pub fn block(&self) -> &[u8; RECORD_SIZE] {
        &self.block
    }

    /// Reads the next complete block without decoding it.
    ///
    /// Returns the block's offset, or `None` at end-of-stream (including a
    /// truncated tail).
    pub fn next_block(&mut self) -> Result<Option<u64>, CodecError> {
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match self.rdr.read(&mut self.block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::Io(e)),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < RECORD_SIZE {
            warn!(
                "ignoring {} trailing bytes at offset {} (partial record)",
                filled, self.offset
            );
            return Ok(None);
        }

        let at = self.offset;
        self.offset += RECORD_SIZE as u64;
        Ok(Some(at))
    }

    /// Reads and decodes the next record.
    pub fn next_record(&mut self) -> Result<Option<Student>, CodecError> {
        match self.next_block()? {
            Some(at) => decode(&self.block, at).map(Some),
            None => Ok(None),
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Student, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
