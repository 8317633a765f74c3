//! letterparse CLI - recommendation letter extraction tool

mod config;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use letterparse::{discover, writer_for, BatchRunner, FileResult, LetterParser, OutputFormat};

use crate::config::{load_profile, Profile, DEFAULT_CONFIG};

#[derive(Parser)]
#[command(name = "letterparse")]
#[command(version)]
#[command(about = "Extract text and affiliations from PDF recommendation letters", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single letter
    Parse {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse every letter in a directory
    Batch {
        /// Letter directory (overrides the profile)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Profile name in the config file
        #[arg(short = 'd', long, default_value = "dev", env = "LETTERPARSE_PROFILE")]
        profile: String,

        /// Config file [default: config.json]
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format (overrides the profile)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Parse one file at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Comma-separated values
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Jsonl => OutputFormat::JsonLines,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Parse { input, json }) => {
            init_logging();
            cmd_parse(&input, json)
        }
        Some(Commands::Batch {
            dir,
            profile,
            config,
            format,
            sequential,
        }) => cmd_batch(dir, &profile, config.as_deref(), format, sequential),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            init_logging();
            if let Some(input) = cli.input {
                cmd_parse(&input, false)
            } else {
                println!("{}", "Usage: letterparse <FILE>".yellow());
                println!("       letterparse batch [-d PROFILE]");
                println!("       letterparse --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn log_env() -> env_logger::Env<'static> {
    env_logger::Env::default().default_filter_or("info")
}

fn init_logging() {
    env_logger::Builder::from_env(log_env()).init();
}

/// Route logs to `path` as `LEVEL - target - message`.
fn init_file_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;

    env_logger::Builder::from_env(log_env())
        .format(|buf, record| {
            writeln!(buf, "{} - {} - {}", record.level(), record.target(), record.args())
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn cmd_parse(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = LetterParser::new().parse(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}: {}", "File".bold(), record.filename());
    println!("{}: {}", "Department".bold(), record.department());
    println!("{}: {}", "University".bold(), record.university());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", record.contents());

    Ok(())
}

fn cmd_batch(
    dir: Option<PathBuf>,
    profile_name: &str,
    config: Option<&Path>,
    format: Option<FormatArg>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config.unwrap_or_else(|| Path::new(DEFAULT_CONFIG));
    let mut profile: Profile = load_profile(config_path, profile_name, config.is_some())?;
    if let Some(dir) = dir {
        profile.dir = dir;
    }
    if let Some(format) = format {
        profile.format = format.into();
    }

    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();
    match profile.log_path(&stamp) {
        Some(path) => init_file_logging(&path)?,
        None => init_logging(),
    }

    let files = discover(&profile.dir)?;
    log::info!("Found {} letters in {}", files.len(), profile.dir.display());

    let mut options = profile.batch_options();
    if sequential {
        options = options.sequential();
    }
    let parser = LetterParser::new().with_options(profile.layout.clone());
    let runner = BatchRunner::new(parser, options);

    let output_path = profile.output_path(&stamp);
    let out: Box<dyn Write> = match &output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = writer_for(profile.format, out)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = runner.run(&files, |result: &FileResult| {
        pb.inc(1);
        pb.set_message(
            result
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match &result.outcome {
            Ok(record) => writer.write_record(record),
            Err(e) => {
                pb.println(format!("{} {}", "Failed".red(), e));
                Ok(())
            }
        }
    })?;
    writer.finish()?;

    pb.finish_and_clear();

    eprintln!(
        "{} {} of {} letters",
        "Parsed".green().bold(),
        summary.parsed,
        summary.total()
    );
    if summary.failed > 0 {
        eprintln!("{} {}", "Failed:".red().bold(), summary.failed);
    }
    if let Some(path) = output_path {
        eprintln!("{} {}", "Saved to".green(), path.display());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "letterparse".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Recommendation letter extraction tool");
    println!();
    println!("External tools: pdftohtml (poppler-utils), tesseract");
    println!("License: MIT");
}
