//! Criterion benchmarks for trope-analysis components
//!
//! Run with: cargo bench -p trope-analysis

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::f32::consts::PI;
use trope_analysis::{
    TimbreExtractor, Window, amplitude_contour, find_peaks, magnitude_spectrum, rms,
};

const SAMPLE_RATE: f32 = 44100.0;

/// Generate a test signal with decaying harmonics
fn generate_note(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let decay = (-2.0 * t).exp();
            let f1 = (2.0 * PI * 220.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 440.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 660.0 * t).sin();
            decay * (f1 + f2 + f3)
        })
        .collect()
}

fn bench_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("Spectrum");

    for size in [1024usize, 8192, 65536] {
        let signal = generate_note(size);
        group.bench_with_input(BenchmarkId::new("magnitude", size), &signal, |b, s| {
            b.iter(|| black_box(magnitude_spectrum(s, size, Window::Hann)))
        });

        let spectrum = magnitude_spectrum(&signal, size, Window::Hann);
        group.bench_with_input(BenchmarkId::new("find_peaks", size), &spectrum, |b, s| {
            b.iter(|| black_box(find_peaks(s, SAMPLE_RATE, -40.0, 20.0)))
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Extraction");
    let signal = generate_note(44100);
    let extractor = TimbreExtractor::default();

    group.bench_function("timbre", |b| {
        b.iter(|| black_box(extractor.extract(&signal, SAMPLE_RATE)))
    });
    group.bench_function("contour", |b| {
        b.iter(|| black_box(amplitude_contour(&signal, 511)))
    });
    group.bench_function("rms", |b| b.iter(|| black_box(rms(&signal))));

    group.finish();
}

criterion_group!(benches, bench_spectrum, bench_extraction);
criterion_main!(benches);
