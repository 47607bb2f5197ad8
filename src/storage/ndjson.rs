//! NDJSON (Newline Delimited JSON) output for extracted models

use crate::etl::Loader;

use eyre::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Where an [`NdjsonWriter`] sends its lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdjsonTarget {
    File(PathBuf),
    Stdout,
}

/// Write serializable items as NDJSON, one item per line
pub struct NdjsonWriter<T> {
    target: NdjsonTarget,
    _item: PhantomData<fn(T)>,
}

impl<T: Serialize> NdjsonWriter<T> {
    /// Writer replacing the contents of `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_target(NdjsonTarget::File(path.as_ref().to_path_buf()))
    }

    /// Writer printing to standard output
    pub fn stdout() -> Self {
        Self::with_target(NdjsonTarget::Stdout)
    }

    pub fn with_target(target: NdjsonTarget) -> Self {
        Self {
            target,
            _item: PhantomData,
        }
    }

    pub fn target(&self) -> &NdjsonTarget {
        &self.target
    }

    /// Serialize items as NDJSON text with a trailing newline
    pub fn render(items: &[T]) -> Result<String> {
        let mut content = String::new();
        for item in items {
            content.push_str(&serde_json::to_string(item)?);
            content.push('\n');
        }
        Ok(content)
    }

    /// Write items, replacing any previous file contents
    pub fn write(&self, items: &[T]) -> Result<()> {
        let content = Self::render(items)?;
        match &self.target {
            NdjsonTarget::File(path) => std::fs::write(path, content)
                .with_context(|| format!("Failed to write NDJSON file: {}", path.display())),
            NdjsonTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|_| stdout.flush())
                    .with_context(|| "Failed to write NDJSON to stdout")
            }
        }
    }
}

// Implement Loader trait for writing NDJSON files

impl<T: Serialize + Send> Loader for NdjsonWriter<T> {
    type Item = T;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        log::debug!("Wrote {} line(s) to {:?}", items.len(), self.target);
        Ok(items.len())
    }
}
