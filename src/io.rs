//! I/O operations with buffers.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::sys::AsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the file at `path` as UTF-8 text and returns a buffer containing it.
///
/// A missing file and a directory are reported as [`Error::FileNotFound`] and
/// [`Error::InvalidPath`] respectively, so that callers can tell them apart from
/// other I/O failures.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Buffer> {
    let path = path.as_ref();
    if path.is_dir() {
        return Err(Error::invalid_path(&path.as_string()));
    }
    match fs::read_to_string(path) {
        Ok(text) => Ok(Buffer::load(&text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(Error::file_not_found(&path.as_string()))
        }
        Err(e) => Err(Error::io(&path.as_string(), e)),
    }
}

/// Writes the contents of `buf` to the file at `path`, joining lines with the line
/// ending sequence of `buf`, and returns the number of bytes written.
pub fn write_file<P: AsRef<Path>>(path: P, buf: &Buffer) -> Result<usize> {
    let path = path.as_ref();
    let text = buf.save();
    fs::write(path, &text).map_err(|e| Error::io(&path.as_string(), e))?;
    Ok(text.len())
}
