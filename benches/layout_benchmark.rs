//! Benchmarks for letterparse layout inference.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic letters, so no external tools are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use letterparse::convert::xml::read_tokens;
use letterparse::{analyze_layout, is_pdf_bytes, MetadataExtractor, ParseOptions, Token};

/// Creates a letter with a two-line letterhead and `paragraphs` body paragraphs.
fn create_letter(paragraphs: usize) -> Vec<Token> {
    let mut tokens = vec![
        Token::new("Department of Molecular Biology", 40, 300, 220, 20).with_font("1"),
        Token::new("Princeton University", 62, 300, 160, 20).with_font("1"),
        Token::new("Dear Committee Members,", 140, 80, 200, 16).with_font("0"),
    ];

    let mut top = 180;
    for p in 0..paragraphs {
        for line in 0..6 {
            // Lines are split into fragments the way the converter emits them.
            let text = if line == 5 {
                format!("which concludes paragraph number {}.", p + 1)
            } else {
                "continues the recommendation with more supporting detail and".to_string()
            };
            let (head, tail) = text.split_at(text.len() / 2);
            tokens.push(Token::new(head, top, 80, 270, 16).with_font("0"));
            tokens.push(Token::new(tail.trim_start(), top + 1, 150, 270, 16).with_font("0"));
            top += 20;
        }
        top += 25;
    }

    tokens.push(Token::new("Sincerely,", top + 40, 80, 90, 16).with_font("0"));
    tokens.push(Token::new("Page 1", top + 90, 300, 40, 12).with_font("2"));
    tokens
}

fn create_xml(lines: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<pdf2xml>\n<page number=\"1\">\n");
    for i in 0..lines {
        xml.push_str(&format!(
            "<text top=\"{}\" left=\"80\" width=\"540\" height=\"16\" font=\"0\">Line <b>{}</b> of the letter &amp; more</text>\n",
            100 + i * 20,
            i
        ));
    }
    xml.push_str("</page>\n</pdf2xml>\n");
    xml
}

/// Benchmark PDF signature detection.
fn bench_format_detection(c: &mut Criterion) {
    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| is_pdf_bytes(black_box(b"%PDF-1.4\n%\xe2\xe3")));
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| is_pdf_bytes(black_box(b"Not a PDF file at all")));
    });
}

/// Benchmark layout inference at various letter lengths.
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let options = ParseOptions::default();

    for paragraphs in [1, 5, 20].iter() {
        let tokens = create_letter(*paragraphs);

        group.bench_function(format!("{}_paragraphs", paragraphs), |b| {
            b.iter(|| analyze_layout(black_box(&tokens), &options));
        });
    }

    group.finish();
}

/// Benchmark converter markup reading.
fn bench_xml(c: &mut Criterion) {
    let xml = create_xml(200);

    c.bench_function("read_tokens_200_lines", |b| {
        b.iter(|| read_tokens(black_box(xml.as_bytes())).unwrap());
    });
}

/// Benchmark the metadata chains.
fn bench_metadata(c: &mut Criterion) {
    let extractor = MetadataExtractor::new();
    let pool = vec![
        "Office of the Dean",
        "Jane Doe, Professor of Neurobiology",
        "Department of Molecular Biology",
        "Princeton University, Princeton, NJ 08544",
        "Tel: 609-555-0100",
    ];

    c.bench_function("extract_metadata", |b| {
        b.iter(|| {
            let department = extractor.department(black_box(&pool));
            let university = extractor.university(black_box(&pool));
            (department, university)
        });
    });

    c.bench_function("extractor_creation", |b| {
        b.iter(MetadataExtractor::new);
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_layout,
    bench_xml,
    bench_metadata,
);
criterion_main!(benches);
