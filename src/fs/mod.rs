// src/fs/mod.rs

//! Read-only filesystem seam.
//!
//! Everything the monitor reads (the process registry, sub-task output
//! files) goes through [`FileSystem`], so tests can grow files in memory with
//! [`mock::MockFileSystem`] instead of racing real writes.

use std::fmt::Debug;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// What to do with a last line that has no newline yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialLine {
    /// Leave it for a later read; it is neither returned nor counted.
    Hold,
    /// Return it as a line. Used once the writer is known to be done.
    Include,
}

/// Read the lines of `path` after the first `skip` complete lines.
///
/// Lines are returned without their terminator (`\n` or `\r\n`). Bytes that
/// are not valid UTF-8 are replaced rather than failing the read.
pub fn read_lines_after(
    fs: &dyn FileSystem,
    path: &Path,
    skip: usize,
    partial: PartialLine,
) -> Result<Vec<String>> {
    let mut reader = BufReader::new(fs.open_read(path)?);
    let mut out = Vec::new();
    let mut buf = Vec::new();
    let mut index = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("reading line from {:?}", path))?;
        if read == 0 {
            break;
        }

        let complete = buf.last() == Some(&b'\n');
        if !complete && partial == PartialLine::Hold {
            break;
        }
        if index >= skip {
            out.push(decode_line(&buf));
        }
        index += 1;
    }
    Ok(out)
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
