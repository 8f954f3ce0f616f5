//! Criterion benchmarks for trope-synth components
//!
//! Run with: cargo bench -p trope-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use trope_synth::{Envelope, Note, Refrain, Synthesis, Timbre, ToneGenerator, duration_to_samples};

const SAMPLE_RATE: f32 = 44100.0;
const TONE_SECONDS: &[f32] = &[0.05, 0.25, 1.0, 4.0];

// ============================================================================
// Tone benchmarks
// ============================================================================

fn bench_quantization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quantization");

    for &seconds in TONE_SECONDS {
        group.bench_with_input(
            BenchmarkId::new("duration_to_samples", seconds),
            &seconds,
            |b, &secs| b.iter(|| black_box(duration_to_samples(black_box(440.0), secs, SAMPLE_RATE))),
        );
    }

    group.finish();
}

fn bench_tone_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ToneGenerator");
    let tones = ToneGenerator::new(SAMPLE_RATE).unwrap();

    for &seconds in TONE_SECONDS {
        let len = tones.quantize(Note::Pitch(440.0), seconds).unwrap();
        let mut out = vec![0.0f32; len + 64];

        group.bench_with_input(BenchmarkId::new("centred", seconds), &len, |b, &len| {
            b.iter(|| {
                tones
                    .generate_into(Note::Pitch(440.0), len, 1.0, &mut out)
                    .unwrap();
                black_box(out[len / 2])
            })
        });
    }

    group.finish();
}

// ============================================================================
// Envelope benchmarks
// ============================================================================

fn bench_envelope_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("Envelope_Shape");

    let parametric = Envelope::parametric(5, 20, 40, 20, SAMPLE_RATE).unwrap();
    let contour: Vec<f32> = (0..2048).map(|i| (i as f32 / 2047.0).sqrt()).collect();
    let reference = Envelope::from_reference(contour, SAMPLE_RATE).unwrap();

    for &seconds in TONE_SECONDS {
        let len = (seconds * SAMPLE_RATE) as usize;
        group.bench_with_input(BenchmarkId::new("Parametric", len), &len, |b, &len| {
            b.iter(|| black_box(parametric.shape(len)))
        });
        group.bench_with_input(BenchmarkId::new("FromReference", len), &len, |b, &len| {
            b.iter(|| black_box(reference.shape(len)))
        });
    }

    group.finish();
}

// ============================================================================
// Render benchmarks
// ============================================================================

fn bench_render_melody(c: &mut Criterion) {
    let mut group = c.benchmark_group("Synthesis_Melody");
    group.sample_size(20);

    let refrain = Refrain::melody(&[261.63, 293.66, 329.63, 0.0, 392.0, 440.0, 493.88, 523.25])
        .unwrap();
    let durations = [0.25, 0.125, 0.125, 0.25, 0.5, 0.25, 0.25, 1.0];

    let plain = Synthesis::new(SAMPLE_RATE).unwrap();
    group.bench_function("no_timbre", |b| {
        b.iter(|| black_box(plain.render(&refrain, &durations).unwrap()))
    });

    let organ = Timbre::from_pairs(&[(1.0, 1.0), (2.0, 0.5), (3.0, 0.33), (4.0, 0.25)]).unwrap();
    let layered = Synthesis::new(SAMPLE_RATE).unwrap().with_timbre(organ);
    group.bench_function("four_partials", |b| {
        b.iter(|| black_box(layered.render(&refrain, &durations).unwrap()))
    });

    group.finish();
}

fn bench_render_chord_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Synthesis_ChordScaling");
    group.sample_size(20);

    let synth = Synthesis::new(SAMPLE_RATE).unwrap();
    for voices in [1usize, 4, 8, 16] {
        let rows: Vec<Vec<f32>> = (0..voices)
            .map(|v| vec![110.0 * (v + 1) as f32; 4])
            .collect();
        let refrain = Refrain::from_frequencies(rows).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(voices), &refrain, |b, refrain| {
            b.iter(|| black_box(synth.render(refrain, &[0.25]).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_quantization,
    bench_tone_generation,
    bench_envelope_shape,
    bench_render_melody,
    bench_render_chord_scaling,
);

criterion_main!(benches);
