use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::UtilError;
use crate::Result;

/// A scratch file with RAII cleanup.
///
/// Holds bytes produced by a subprocess (for example an archive stream) until
/// they have been consumed. The file is unlinked when the `TempFile` is
/// dropped, on every exit path, including early returns through `?`.
pub struct TempFile {
    inner: ::tempfile::NamedTempFile,
    len: u64,
}

impl TempFile {
    /// Create a new scratch file in the system temporary directory.
    pub fn new() -> Result<Self> {
        let inner = ::tempfile::Builder::new()
            .prefix("git-compare-")
            .tempfile()
            .map_err(UtilError::Scratch)?;
        Ok(Self { inner, len: 0 })
    }

    /// Create a new scratch file in the given directory.
    pub fn new_in(dir: impl AsRef<Path>) -> Result<Self> {
        let inner = ::tempfile::Builder::new()
            .prefix("git-compare-")
            .tempfile_in(dir)
            .map_err(UtilError::Scratch)?;
        Ok(Self { inner, len: 0 })
    }

    /// Get the path of the scratch file.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Flush and rewind, returning a reader over everything written.
    pub fn reader(&mut self) -> Result<&mut File> {
        let file = self.inner.as_file_mut();
        file.flush()?;
        file.seek(SeekFrom::Start(0))?;
        Ok(file)
    }
}

impl Write for TempFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.len += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Read for TempFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
