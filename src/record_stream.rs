use crate::MergeError;
use memchr::{memchr, memrchr};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TERMINATOR: u8 = b'\n';

/// Buffered cursor over the `\n`-delimited records of one sorted input.
///
/// Only one record is visible at a time: `current()` borrows it straight out of the
/// read buffer, and the borrow ends at the next `advance()`. The buffer is refilled when
/// the cursor runs off the end of the last complete record, carrying any partial record
/// over to the front. A buffer that is full without holding a single terminator is
/// doubled, so records longer than the configured capacity still come out whole.
pub struct RecordStream<R = File> {
    path: PathBuf,
    reader: R,
    buffer: Vec<u8>,
    /// Number of valid bytes in `buffer`
    filled: usize,
    /// One past the last terminator in the valid bytes (or `filled` once input is done)
    terminated_end: usize,
    /// Start of the current record
    cursor: usize,
    /// End of the current record, exclusive; points at its terminator when there is one
    record_end: usize,
    /// The reader has returned zero bytes
    input_done: bool,
    exhausted: bool,
}

impl RecordStream<File> {
    /// Open `path` and read ahead up to `capacity` bytes.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, MergeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MergeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(path, file, capacity)
    }
}

impl<R: Read> RecordStream<R> {
    /// Wrap an arbitrary reader. `name` is only used in diagnostics and errors.
    pub fn from_reader(name: impl Into<PathBuf>, reader: R, capacity: usize) -> Result<Self, MergeError> {
        let mut stream = RecordStream {
            path: name.into(),
            reader,
            buffer: vec![0; capacity.max(1)],
            filled: 0,
            terminated_end: 0,
            cursor: 0,
            record_end: 0,
            input_done: false,
            exhausted: false,
        };
        stream.refill()?;
        if stream.filled == 0 {
            stream.mark_exhausted();
        } else {
            stream.locate_record();
        }
        Ok(stream)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Current buffer capacity in bytes. Larger than the configured value only after a
    /// record failed to fit.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The current record without its terminator, or `None` once the input is used up.
    pub fn current(&self) -> Option<&[u8]> {
        if self.exhausted {
            None
        } else {
            Some(&self.buffer[self.cursor..self.record_end])
        }
    }

    /// Step to the next record. Does nothing on an exhausted stream.
    pub fn advance(&mut self) -> Result<(), MergeError> {
        if self.exhausted {
            return Ok(());
        }
        self.cursor = (self.record_end + 1).min(self.filled);
        if self.cursor >= self.terminated_end {
            self.refill()?;
            if self.filled == 0 {
                self.mark_exhausted();
                return Ok(());
            }
        }
        self.locate_record();
        Ok(())
    }

    /// Exhausted streams sort after everything else and tie with each other; live
    /// streams compare their current records as unsigned bytes.
    pub fn cmp_current(&self, other: &RecordStream<R>) -> Ordering {
        match (self.current(), other.current()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }

    fn locate_record(&mut self) {
        let window = &self.buffer[self.cursor..self.terminated_end];
        self.record_end = match memchr(TERMINATOR, window) {
            Some(offset) => self.cursor + offset,
            // Only reachable for a final line that has no terminator
            None => self.terminated_end,
        };
    }

    fn refill(&mut self) -> Result<(), MergeError> {
        let residue = self.filled - self.cursor;
        if residue > 0 && self.cursor > 0 {
            self.buffer.copy_within(self.cursor..self.filled, 0);
        }
        self.filled = residue;
        self.cursor = 0;
        self.record_end = 0;

        loop {
            self.fill_remaining()?;
            match memrchr(TERMINATOR, &self.buffer[..self.filled]) {
                Some(last) => {
                    self.terminated_end = last + 1;
                    return Ok(());
                }
                None if self.input_done => {
                    self.terminated_end = self.filled;
                    return Ok(());
                }
                None => {
                    let grown = self.buffer.len() * 2;
                    debug!(
                        path = %self.path.display(),
                        from = self.buffer.len(),
                        to = grown,
                        "record does not fit in buffer, growing"
                    );
                    self.buffer.resize(grown, 0);
                }
            }
        }
    }

    /// Read until the buffer is full or the reader reports end of input.
    fn fill_remaining(&mut self) -> Result<(), MergeError> {
        while !self.input_done && self.filled < self.buffer.len() {
            match self.reader.read(&mut self.buffer[self.filled..]) {
                Ok(0) => self.input_done = true,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(MergeError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    fn mark_exhausted(&mut self) {
        self.exhausted = true;
        info!("File {} reached EOF", self.path.display());
    }
}
