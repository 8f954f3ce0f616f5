//! Rayon row fill matches a row-by-row fill built from the public API.
//!
//! Run with: cargo test -p trope-synth --features parallel

use trope_core::normalize_to_peak;
use trope_synth::{Envelope, Refrain, Synthesis, Timbre, ToneGenerator};

const SR: f32 = 44100.0;

#[test]
fn parallel_fill_matches_serial_rows() {
    let refrain = Refrain::from_frequencies(vec![
        vec![261.63, 0.0, 392.0, 523.25],
        vec![329.63, 349.23, 0.0, 659.25],
        vec![110.0, 110.0, 146.83, 0.0],
    ])
    .unwrap();
    let durations = [0.2, 0.15, 0.3, 0.05];
    let timbre = Timbre::from_pairs(&[(1.0, 1.0), (2.0, 0.4), (3.0, 0.0)]).unwrap();
    let envelope = Envelope::parametric(5, 10, 40, 20, SR).unwrap();

    let synth = Synthesis::new(SR)
        .unwrap()
        .with_timbre(timbre)
        .with_envelope(envelope.clone());
    let out = synth.render(&refrain, &durations).unwrap();
    let layout = &out.layout;
    let tones = ToneGenerator::new(SR).unwrap();

    assert_eq!(out.matrix.rows(), 9);
    for row in 0..layout.row_count() {
        let amplitude = layout.partial(row).amplitude;
        let mut expected = vec![0.0f32; layout.total_samples()];
        for (slot, (&start, &width)) in layout
            .boundaries()
            .iter()
            .zip(layout.slot_widths())
            .enumerate()
        {
            let note = layout.note(row, slot);
            let len = layout.cell_samples(row, slot);
            let segment = &mut expected[start..start + width];
            tones.generate_into(note, len, amplitude, segment).unwrap();
            if len > 0 && !note.is_rest() {
                let lead = (width - len) / 2;
                envelope.apply(&mut segment[lead..lead + len]);
            }
        }
        normalize_to_peak(&mut expected, amplitude);

        assert_eq!(out.matrix.row(row), &expected[..], "row {row}");
    }
}
