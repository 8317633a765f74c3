//! Converter backed by the poppler `pdftohtml` tool.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{xml, MarkupConverter};
use crate::error::{Error, Result};
use crate::model::Token;

/// Runs `pdftohtml -xml` and reads the generated XML.
///
/// Page images are extracted next to the XML so the OCR pipeline can find
/// them in the same scratch directory.
#[derive(Debug, Clone)]
pub struct PdftohtmlConverter {
    program: PathBuf,
    extract_images: bool,
}

impl PdftohtmlConverter {
    /// Create a converter using `pdftohtml` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("pdftohtml"),
            extract_images: true,
        }
    }

    /// Use a specific pdftohtml binary.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Enable or disable page image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    fn command(&self, source: &Path, output_base: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-xml", "-q", "-hidden", "-nodrm"]);
        if !self.extract_images {
            cmd.arg("-i");
        }
        cmd.arg(source).arg(output_base);
        cmd
    }
}

impl Default for PdftohtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConverter for PdftohtmlConverter {
    fn name(&self) -> &str {
        "pdftohtml"
    }

    fn convert(&self, source: &Path, scratch: &Path) -> Result<Vec<Token>> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Conversion(format!("no file name in {}", source.display())))?;
        let output_base = scratch.join(&stem);

        let output = self
            .command(source, &output_base)
            .output()
            .map_err(|source| Error::Tool {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Conversion(format!(
                "{} exited with {}: {}",
                self.name(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let xml_path = scratch.join(format!("{}.xml", stem));
        let bytes = fs::read(&xml_path).map_err(|e| {
            Error::Conversion(format!("no output at {}: {}", xml_path.display(), e))
        })?;

        let tokens = xml::read_tokens(&bytes)?;
        log::debug!("{}: {} tokens from {}", self.name(), tokens.len(), source.display());
        Ok(tokens)
    }
}
