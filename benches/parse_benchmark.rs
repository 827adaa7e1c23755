//! Benchmarks for field parsing and page preprocessing.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic recognized text and page images, so no
//! external engines are needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, GrayImage, Luma};
use medscan::engine::{AdaptiveThreshold, ImagePreprocessor};
use medscan::parser::{DiagnosisExtractor, ParserSet};
use medscan::{DocumentKind, PageImage};

/// Creates prescription-like text spread over the given number of pages.
fn create_prescription_text(pages: usize) -> String {
    let mut text = String::new();
    for i in 0..pages {
        text.push('\n');
        if i == 0 {
            text.push_str("Dr John Smith, M.D\n2 Non-Important Street,\n\n");
            text.push_str("Name: Marta Sharapova Date: 5/11/2022\n\n");
            text.push_str("Address: 9 tennis court, new Russia, DC\n\n");
            text.push_str("Prednisone 20 mg\nLialda 2.4 gram\n\nDirections:\n\n");
        }
        for line in 0..40 {
            text.push_str(&format!(
                "Line {} of page {} - take 2 pill everyday for 1 month\n",
                line,
                i + 1
            ));
        }
    }
    text.push_str("\nRefill: 3 times\nProvisional Diagnosis: Chronic sinusitis\n");
    text
}

/// Creates a page image with dark horizontal strokes on a light background.
fn create_page(width: u32, height: u32) -> PageImage {
    let image = GrayImage::from_fn(width, height, |_, y| {
        if y % 24 < 3 {
            Luma([40])
        } else {
            Luma([225])
        }
    });
    PageImage::new(1, DynamicImage::ImageLuma8(image))
}

fn bench_parse_prescription(c: &mut Criterion) {
    let parsers = ParserSet::new();
    let text = create_prescription_text(1);

    c.bench_function("parse_prescription_1_page", |b| {
        b.iter(|| parsers.get(DocumentKind::Prescription).parse(black_box(&text)))
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let parsers = ParserSet::new();
    let text = create_prescription_text(20);

    c.bench_function("parse_prescription_20_pages", |b| {
        b.iter(|| parsers.get(DocumentKind::Prescription).parse(black_box(&text)))
    });
}

fn bench_diagnosis(c: &mut Criterion) {
    let diagnosis = DiagnosisExtractor::new();
    let text = create_prescription_text(5);

    c.bench_function("provisional_diagnosis", |b| {
        b.iter(|| diagnosis.extract(black_box(&text)))
    });
}

fn bench_threshold(c: &mut Criterion) {
    let preprocessor = AdaptiveThreshold::default();
    let page = create_page(850, 1100);

    c.bench_function("adaptive_threshold_letter_page", |b| {
        b.iter(|| preprocessor.preprocess(black_box(&page)))
    });
}

criterion_group!(
    benches,
    bench_parse_prescription,
    bench_parse_large,
    bench_diagnosis,
    bench_threshold
);
criterion_main!(benches);
