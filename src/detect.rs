//! Input detection: PDF magic check and batch candidate filtering.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Check that `path` starts with the PDF magic bytes.
///
/// # Returns
/// * `Ok(())` if the file looks like a PDF
/// * `Err(Error::UnknownFormat)` if it does not
/// * `Err(Error::Io)` if it cannot be read
///
/// # Example
/// ```no_run
/// use letterparse::detect::ensure_pdf;
///
/// ensure_pdf("letters/smith.pdf").unwrap();
/// ```
pub fn ensure_pdf<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(PDF_MAGIC.len());
    file.take(PDF_MAGIC.len() as u64).read_to_end(&mut header)?;

    if is_pdf_bytes(&header) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if bytes start with the PDF magic.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Whether a path should be picked up by batch discovery.
///
/// Accepts `*.pdf` (any case) whose file name does not start with a dot.
pub fn is_candidate<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
