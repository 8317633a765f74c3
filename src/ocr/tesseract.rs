//! Tesseract command-line OCR engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use super::OcrEngine;
use crate::error::{Error, Result};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// OCR engine that shells out to `tesseract <image> stdout`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    program: PathBuf,
    search_source_dir: bool,
}

impl TesseractOcr {
    /// Create an engine using `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            search_source_dir: true,
        }
    }

    /// Use a specific tesseract binary.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Also look for page images next to the source PDF.
    pub fn with_source_dir_search(mut self, enabled: bool) -> Self {
        self.search_source_dir = enabled;
        self
    }

    fn search_dirs(&self, source: &Path, scratch: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![scratch.to_path_buf()];
        if self.search_source_dir {
            let parent = source
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            dirs.push(parent.to_path_buf());
        }
        dirs
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn locate_images(&self, source: &Path, scratch: &Path) -> Result<Vec<PathBuf>> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Ocr(format!("no file name in {}", source.display())))?;

        let mut images = Vec::new();
        for dir in self.search_dirs(source, scratch) {
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).max_depth(1) {
                let entry = entry?;
                if entry.file_type().is_file() && is_page_image(entry.path(), &stem) {
                    images.push(entry.into_path());
                }
            }
        }

        images.sort();
        images.dedup();
        Ok(images)
    }

    fn ocr(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .output()
            .map_err(|source| Error::Tool {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "{} on {}: {}",
                output.status,
                image.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn is_page_image(path: &Path, stem: &str) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(stem));
    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    name_matches && extension_matches
}
