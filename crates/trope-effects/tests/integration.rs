//! Integration tests for trope-effects.
//!
//! Applies the delay stack to buffers rendered by trope-synth.

use trope_effects::{Delay, EdgeMode};
use trope_synth::{Refrain, render};

const SR: f32 = 44100.0;

fn one_second_tone() -> Vec<f32> {
    let refrain = Refrain::melody(&[441.0]).unwrap();
    render(&refrain, &[1.0], SR, None, None).unwrap().mono
}

#[test]
fn mirrored_echoes_of_rendered_tone() {
    let tone = one_second_tone();
    assert_eq!(tone.len(), 44100);

    let delay = Delay::new(SR)
        .unwrap()
        .with_repeats(3)
        .with_delay_time_ms(100.0)
        .with_decay(0.9, 0.1)
        .with_edge_mode(EdgeMode::Mirror);
    let stack = delay.apply(&tone).unwrap();

    assert_eq!(stack.shape(), (4, 44100));
    assert_eq!(delay.delay_samples(), 4410);

    let gains = delay.gains();
    assert_eq!(gains[1], 0.9);
    assert!((gains[2] - 0.5).abs() < 1e-6);
    assert_eq!(gains[3], 0.1);

    assert_eq!(stack.row(0), tone.as_slice());
    for k in 1..=3 {
        let shift = k * 4410;
        assert_eq!(stack.row(k)[shift + 1000], tone[1000] * gains[k]);
    }
}

#[test]
fn zero_filled_echo_starts_silent() {
    let tone = one_second_tone();
    let stack = Delay::new(SR)
        .unwrap()
        .with_repeats(2)
        .with_delay_time_ms(250.0)
        .apply(&tone)
        .unwrap();
    assert!(stack.row(2)[..22050].iter().all(|&s| s == 0.0));
}

#[test]
fn summed_stack_can_be_renormalized() {
    let tone = one_second_tone();
    let stack = Delay::new(SR)
        .unwrap()
        .with_repeats(4)
        .with_delay_time_ms(50.0)
        .with_decay(0.8, 0.2)
        .with_edge_mode(EdgeMode::Edge)
        .apply(&tone)
        .unwrap();

    let mut mixed = stack.sum_rows();
    assert!(trope_core::normalize_to_peak(&mut mixed, 1.0));
    assert!(mixed.iter().all(|s| s.abs() <= 1.0));
}
