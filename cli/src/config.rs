//! Run profiles loaded from a JSON config file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use letterparse::{BatchOptions, Error, OutputFormat, ParseOptions, Result};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "config.json";

/// Where batch records go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Stdout,
    File,
}

/// One named profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Directory of letters to parse
    pub dir: PathBuf,
    /// Where records are written: stdout or a file under `results_dir`
    pub destination: Destination,
    /// Output directory when `destination` is `file`
    pub results_dir: PathBuf,
    /// Log file directory; logs go to stderr when unset
    pub log_dir: Option<PathBuf>,
    /// Failed sources are copied here
    pub failed_dir: Option<PathBuf>,
    /// Skip archiving failed sources
    pub fail_no_copy: bool,
    /// Record format for the output
    pub format: OutputFormat,
    /// Layout and extraction thresholds
    pub layout: ParseOptions,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/letters"),
            destination: Destination::Stdout,
            results_dir: PathBuf::from("results/parsed"),
            log_dir: None,
            failed_dir: None,
            fail_no_copy: false,
            format: OutputFormat::Csv,
            layout: ParseOptions::default(),
        }
    }
}

impl Profile {
    /// Name of the letter directory, used to label output and log files.
    pub fn dir_name(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "letters".to_string())
    }

    /// Output file for a run started at `stamp`, or `None` for stdout.
    pub fn output_path(&self, stamp: &str) -> Option<PathBuf> {
        match self.destination {
            Destination::Stdout => None,
            Destination::File => Some(self.results_dir.join(format!(
                "{}_{}.{}",
                stamp,
                self.dir_name(),
                self.format.extension()
            ))),
        }
    }

    /// Log file for a run started at `stamp`.
    pub fn log_path(&self, stamp: &str) -> Option<PathBuf> {
        self.log_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_{}.log", stamp, self.dir_name())))
    }

    /// Batch options for this profile.
    pub fn batch_options(&self) -> BatchOptions {
        match (&self.failed_dir, self.fail_no_copy) {
            (Some(dir), false) => BatchOptions::new().with_failed_dir(dir),
            _ => BatchOptions::new().without_archive(),
        }
    }
}

/// Load `name` from the config file at `path`.
///
/// A missing file yields the built-in defaults unless `required` is set.
pub fn load_profile(path: &Path, name: &str, required: bool) -> Result<Profile> {
    if !path.exists() && !required {
        log::debug!("{} not found, using default profile", path.display());
        return Ok(Profile::default());
    }

    let text = fs::read_to_string(path)?;
    let mut profiles: HashMap<String, Profile> = serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let profile = profiles.remove(name).ok_or_else(|| {
        let mut known: Vec<_> = profiles.keys().cloned().collect();
        known.sort();
        Error::Config(format!(
            "profile '{}' not in {} (available: {})",
            name,
            path.display(),
            known.join(", ")
        ))
    })?;

    profile.layout.validate()?;
    Ok(profile)
}
