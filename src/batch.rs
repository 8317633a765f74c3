//! Batch processing of letter directories.
//!
//! Files are parsed on the rayon pool and their results streamed back to the
//! calling thread over a channel, so the sink (usually a record writer) needs
//! neither `Send` nor locking.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assemble::LetterParser;
use crate::detect::is_candidate;
use crate::error::Result;
use crate::model::ExtractedRecord;

/// List candidate PDFs under `dir`, recursively, in sorted order.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_candidate(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Options for batch runs.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Parse files in parallel
    pub parallel: bool,

    /// Copy failed sources into this directory
    pub failed_dir: Option<PathBuf>,

    /// Results buffered between workers and the sink
    pub channel_capacity: usize,
}

impl BatchOptions {
    /// Create new batch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(self) -> Self {
        self.parallel(false)
    }

    /// Archive failed sources into `dir`.
    pub fn with_failed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failed_dir = Some(dir.into());
        self
    }

    /// Do not copy failed sources anywhere.
    pub fn without_archive(mut self) -> Self {
        self.failed_dir = None;
        self
    }

    /// Set the channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            failed_dir: None,
            channel_capacity: 64,
        }
    }
}

/// Outcome of one file.
#[derive(Debug)]
pub struct FileResult {
    /// Source path
    pub path: PathBuf,
    /// Extracted record or the parse error
    pub outcome: Result<ExtractedRecord>,
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files that produced a record
    pub parsed: usize,
    /// Files that failed
    pub failed: usize,
}

impl BatchSummary {
    /// Total files processed.
    pub fn total(&self) -> usize {
        self.parsed + self.failed
    }

    fn record(&mut self, result: &FileResult) {
        match result.outcome {
            Ok(_) => self.parsed += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Runs a [`LetterParser`] over many files.
#[derive(Debug)]
pub struct BatchRunner {
    parser: LetterParser,
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(parser: LetterParser, options: BatchOptions) -> Self {
        Self { parser, options }
    }

    /// Get the batch options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Parse `files`, handing every result to `sink`.
    ///
    /// In parallel mode results arrive in completion order. An error from
    /// `sink` stops the batch and is returned; parse failures are logged,
    /// archived and passed to `sink` like any other result.
    pub fn run<F>(&self, files: &[PathBuf], mut sink: F) -> Result<BatchSummary>
    where
        F: FnMut(&FileResult) -> Result<()>,
    {
        let mut summary = BatchSummary::default();

        if !self.options.parallel {
            for path in files {
                let result = self.process(path);
                summary.record(&result);
                sink(&result)?;
            }
            return Ok(summary);
        }

        let (tx, rx) = crossbeam_channel::bounded::<FileResult>(self.options.channel_capacity);

        std::thread::scope(|scope| {
            scope.spawn(move || {
                // A send error means the receiver stopped; abandon the rest.
                let _ = files
                    .par_iter()
                    .try_for_each_with(tx, |tx, path| tx.send(self.process(path)));
            });

            for result in rx {
                summary.record(&result);
                sink(&result)?;
            }
            Ok(summary)
        })
    }

    fn process(&self, path: &Path) -> FileResult {
        let outcome = self.parser.parse(path);
        if let Err(e) = &outcome {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            log::error!("{}, {}", name, e.cause());
            self.archive(path);
        }

        FileResult {
            path: path.to_path_buf(),
            outcome,
        }
    }

    fn archive(&self, path: &Path) {
        let Some(dir) = &self.options.failed_dir else {
            return;
        };
        let Some(name) = path.file_name() else {
            return;
        };

        let copied = fs::create_dir_all(dir).and_then(|_| fs::copy(path, dir.join(name)));
        if let Err(e) = copied {
            log::warn!("Could not archive {} into {}: {}", path.display(), dir.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2019");
        fs::create_dir(&nested).unwrap();
        for path in [
            dir.path().join("b.pdf"),
            dir.path().join("a.PDF"),
            dir.path().join(".hidden.pdf"),
            dir.path().join("notes.txt"),
            nested.join("c.pdf"),
        ] {
            fs::write(path, b"%PDF-1.4").unwrap();
        }

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2019/c.pdf", "a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        assert!(discover("/nonexistent/letters").is_err());
    }

    #[test]
    fn test_batch_options_builder() {
        let options = BatchOptions::new()
            .sequential()
            .with_failed_dir("results/failed")
            .with_channel_capacity(0);
        assert!(!options.parallel);
        assert_eq!(options.failed_dir, Some(PathBuf::from("results/failed")));
        assert_eq!(options.channel_capacity, 1);
        assert!(options.clone().parallel(true).parallel);
        assert!(options.without_archive().failed_dir.is_none());
    }

    #[test]
    fn test_summary_total() {
        let summary = BatchSummary {
            parsed: 3,
            failed: 2,
        };
        assert_eq!(summary.total(), 5);
    }
}
