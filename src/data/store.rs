//! Newline-delimited JSON record store shared by every pipeline stage.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Lines, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

/// Streaming reader yielding one decoded record per non-blank line.
pub struct JsonlReader<T> {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
    _record: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
            _record: PhantomData,
        })
    }
}

impl<T: DeserializeOwned> Iterator for JsonlReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    return Some(
                        Err(err).with_context(|| format!("read {}", self.path.display())),
                    )
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let path = &self.path;
            let line_no = self.line_no;
            return Some(
                serde_json::from_str(&line)
                    .with_context(|| format!("decode {}:{line_no}", path.display())),
            );
        }
    }
}

/// Buffered writer emitting one compact JSON object per line.
pub struct JsonlWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Create (or truncate) the target file, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self {
            path,
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.inner, record)?;
        self.inner.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flush buffered lines and return the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.inner
            .flush()
            .with_context(|| format!("flush {}", self.path.display()))?;
        info!(path = %self.path.display(), count = self.written, "saved jsonl records");
        Ok(self.written)
    }
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}
