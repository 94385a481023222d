//! One-shot report file handle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

/// A report destination that accepts exactly one write.
///
/// Parent directories are created eagerly so a doomed destination fails
/// before any changes are recorded, not at close.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    written: bool,
}

impl OutputFile {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
            }
        }
        Ok(Self {
            path,
            written: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_text(&mut self, text: &str) -> Result<()> {
        if self.written {
            bail!("report already written to {}", self.path.display());
        }
        std::fs::write(&self.path, text)
            .with_context(|| format!("write {}", self.path.display()))?;
        self.written = true;
        Ok(())
    }

    pub fn write_json(&mut self, value: &impl Serialize) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("serialize report")?;
        self.write_text(&text)
    }
}
