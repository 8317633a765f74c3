//! PDF to positioned-markup conversion.
//!
//! The layout stages never read PDF themselves. A [`MarkupConverter`] turns a
//! source file into converter tokens, writing whatever intermediate files it
//! needs into a per-file [`Scratch`] directory.
//!
//! # Example
//!
//! ```no_run
//! use letterparse::convert::{MarkupConverter, PdftohtmlConverter, Scratch};
//! use std::path::Path;
//!
//! fn main() -> letterparse::Result<()> {
//!     let scratch = Scratch::new()?;
//!     let tokens = PdftohtmlConverter::new().convert(Path::new("letter.pdf"), scratch.path())?;
//!     println!("{} tokens", tokens.len());
//!     scratch.close()
//! }
//! ```

mod pdftohtml;
pub mod xml;

pub use pdftohtml::PdftohtmlConverter;

use crate::error::Result;
use crate::model::Token;
use std::path::Path;
use tempfile::TempDir;

/// Trait for PDF-to-markup converters.
///
/// An empty token list means the document has no vector text and needs OCR.
pub trait MarkupConverter: Send + Sync {
    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert `source`, writing intermediate files under `scratch`.
    fn convert(&self, source: &Path, scratch: &Path) -> Result<Vec<Token>>;
}

/// Temporary directory holding every intermediate file for one source.
///
/// The directory is removed by [`Scratch::close`], or on drop if the parse
/// exits early.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a scratch directory under the system temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("letterparse-").tempdir()?;
        Ok(Self { dir })
    }

    /// Create a scratch directory under `parent`.
    pub fn new_in<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("letterparse-")
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory, reporting any failure.
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}
