//! Destinations for dumped lines.
//!
//! The chunked reader hands each chunk's lines to a [`LineSink`] and
//! flushes it before moving on, so an interrupted dump leaves a valid
//! prefix behind.

use crate::error::{IoError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Ordered consumer of dumped text lines.
pub trait LineSink {
    /// Appends lines, each already terminated with `\n`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines cannot be written.
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Makes everything written so far durable.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&mut self) -> Result<()>;
}

/// Writes lines to a text file, truncating it on creation.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: usize,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`, creating parent
    /// directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DirectoryFailed`] or [`IoError::CreateFailed`].
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
                path: parent.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        }

        let file = File::create(path_ref).map_err(|e| IoError::CreateFailed {
            path: path_ref.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path_ref.to_path_buf(),
            lines_written: 0,
        })
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written so far.
    #[must_use]
    pub const fn lines_written(&self) -> usize {
        self.lines_written
    }

    fn write_failed(&self, e: &std::io::Error) -> IoError {
        IoError::WriteFailed {
            path: self.path.to_string_lossy().to_string(),
            reason: e.to_string(),
        }
    }
}

impl LineSink for FileSink {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            if let Err(e) = self.writer.write_all(line.as_bytes()) {
                return Err(self.write_failed(&e).into());
            }
        }
        self.lines_written += lines.len();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .and_then(|()| self.writer.get_ref().sync_data())
            .map_err(|e| self.write_failed(&e).into())
    }
}

/// Collects lines in memory, counting flushes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    /// Lines received, in order.
    pub lines: Vec<String>,
    /// Number of `flush` calls.
    pub flushes: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything received as one string.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.concat()
    }
}

impl LineSink for MemorySink {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        self.lines.extend_from_slice(lines);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        (**self).write_lines(lines)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_writes_and_flushes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flash.txt");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_lines(&["aa\n".to_string(), "bb\n".to_string()])
            .unwrap();
        sink.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "aa\nbb\n");
        assert_eq!(sink.lines_written(), 2);
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_file_sink_flush_leaves_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.txt");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_lines(&["first\n".to_string()]).unwrap();
        sink.flush().unwrap();
        sink.write_lines(&["second\n".to_string()]).unwrap();

        // Second chunk not flushed yet.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_file_sink_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.txt");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut sink = FileSink::create(&path).unwrap();
        sink.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_file_sink_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/flash.txt");

        let sink = FileSink::create(&path).unwrap();
        drop(sink);
        assert!(path.exists());
    }

    #[test]
    fn test_file_sink_create_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file.
        let err = FileSink::create(temp_dir.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Io(IoError::CreateFailed { .. })
        ));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_lines(&["x\n".to_string()]).unwrap();
        sink.flush().unwrap();
        sink.write_lines(&["y\n".to_string()]).unwrap();
        sink.flush().unwrap();

        assert_eq!(sink.contents(), "x\ny\n");
        assert_eq!(sink.flushes, 2);
    }
}
