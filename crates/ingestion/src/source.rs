//! Measurement log source
//!
//! Yields the log one line at a time, numbered from 1, in file order.
//! A line that is not valid UTF-8 is reported on its own and reading
//! continues with the next line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{IngestionError, Result};

/// Numbered line reader over any buffered input
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines read so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl LineSource<BufReader<File>> {
    /// Open a log file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened measurement log");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = (usize, Result<String>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                Some((self.line_no, decode_line(&self.buf)))
            }
            Err(e) => {
                self.done = true;
                self.line_no += 1;
                Some((self.line_no, Err(e.into())))
            }
        }
    }
}

/// Strip the line terminator (`\n` or `\r\n`) and decode
fn decode_line(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|_| IngestionError::InvalidEncoding { len: bytes.len() })
}
