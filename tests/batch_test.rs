//! Batch runs over a directory of letters.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use letterparse::render::{CsvWriter, CSV_HEADER};
use letterparse::{
    discover, BatchOptions, BatchRunner, Error, LetterParser, MarkupConverter, OcrEngine,
    RecordWriter, Result, Token,
};

struct LetterheadConverter;

impl MarkupConverter for LetterheadConverter {
    fn name(&self) -> &str {
        "letterhead"
    }

    fn convert(&self, source: &Path, _scratch: &Path) -> Result<Vec<Token>> {
        if source.file_stem().and_then(|s| s.to_str()) == Some("corrupt") {
            return Err(Error::Conversion("Syntax Error: Couldn't find trailer dictionary".into()));
        }
        Ok(vec![
            Token::new("University of Michigan", 40, 80, 200, 20).with_font("1"),
            Token::new("Dear Colleagues, I am delighted to write this letter for my", 200, 80, 560, 16)
                .with_font("0"),
            Token::new("former student, whose dissertation I supervised.", 220, 80, 540, 16)
                .with_font("0"),
            Token::new("Best regards,", 260, 80, 100, 16).with_font("0"),
        ])
    }
}

struct NoOcr;

impl OcrEngine for NoOcr {
    fn locate_images(&self, _source: &Path, _scratch: &Path) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn ocr(&self, _image: &Path) -> Result<String> {
        Ok(String::new())
    }
}

fn letters_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let letters = dir.path().join("letters");
    fs::create_dir_all(letters.join("2020")).unwrap();
    fs::write(letters.join("adams.pdf"), b"%PDF-1.5\n").unwrap();
    fs::write(letters.join("2020").join("baker.pdf"), b"%PDF-1.5\n").unwrap();
    fs::write(letters.join("corrupt.pdf"), b"%PDF-1.5\n").unwrap();
    fs::write(letters.join("notes.txt"), b"not a letter").unwrap();
    dir
}

fn runner(options: BatchOptions) -> BatchRunner {
    let parser = LetterParser::with_collaborators(Arc::new(LetterheadConverter), Arc::new(NoOcr));
    BatchRunner::new(parser, options)
}

fn run_to_csv(runner: &BatchRunner, files: &[PathBuf]) -> (letterparse::BatchSummary, String) {
    let mut writer = CsvWriter::new(Vec::new()).unwrap();
    let summary = runner
        .run(files, |result| match &result.outcome {
            Ok(record) => writer.write_record(record),
            Err(_) => Ok(()),
        })
        .unwrap();
    writer.finish().unwrap();
    (summary, String::from_utf8(writer.into_inner()).unwrap())
}

#[test]
fn test_sequential_batch_archives_failures() {
    let dir = letters_dir();
    let failed = dir.path().join("failed");
    let files = discover(dir.path().join("letters")).unwrap();
    assert_eq!(files.len(), 3);

    let runner = runner(BatchOptions::new().sequential().with_failed_dir(&failed));
    let (summary, csv) = run_to_csv(&runner, &files);

    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.failed, 1);
    assert!(failed.join("corrupt.pdf").exists());

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert!(csv.contains("baker.pdf,University Of Michigan"));
    assert!(csv.contains("adams.pdf,University Of Michigan"));
    assert!(!csv.contains("corrupt.pdf"));
}

#[test]
fn test_parallel_batch_matches_sequential() {
    let dir = letters_dir();
    let files = discover(dir.path().join("letters")).unwrap();

    let (sequential, seq_csv) = run_to_csv(&runner(BatchOptions::new().sequential()), &files);
    let (parallel, par_csv) = run_to_csv(&runner(BatchOptions::new()), &files);

    assert_eq!(sequential, parallel);

    let mut seq_rows: Vec<&str> = seq_csv.lines().collect();
    let mut par_rows: Vec<&str> = par_csv.lines().collect();
    seq_rows.sort_unstable();
    par_rows.sort_unstable();
    assert_eq!(seq_rows, par_rows);
}

#[test]
fn test_without_archive_copies_nothing() {
    let dir = letters_dir();
    let files = discover(dir.path().join("letters")).unwrap();

    let runner = runner(BatchOptions::new().sequential().without_archive());
    let (summary, _) = run_to_csv(&runner, &files);

    assert_eq!(summary.failed, 1);
    assert!(!dir.path().join("failed").exists());
}

#[test]
fn test_sink_error_stops_batch() {
    let dir = letters_dir();
    let files = discover(dir.path().join("letters")).unwrap();

    for options in [BatchOptions::new().sequential(), BatchOptions::new().with_channel_capacity(1)] {
        let mut seen = 0;
        let result = runner(options).run(&files, |_| {
            seen += 1;
            Err(Error::Render("disk full".into()))
        });
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(seen, 1);
    }
}
