//! Math accuracy tests
//!
//! Transcendentals on the vector types are evaluated with the same libm
//! primitives on every backend and must match them exactly. The fast
//! approximations in `approx` are checked against libm within their stated
//! error bounds over the ranges audio code actually feeds them.


use rigel_kernels::approx::{fast_exp, fast_exp2, fast_log2, fast_tanh};
use rigel_kernels::kernels::{pow_vec_simd, signed_pow_vec, signed_pow_vec_simd};
use rigel_kernels::{DefaultSimdVector, SimdVector};
use test_utils::*;

/// `count` evenly spaced samples over `[start, end]`, padded to whole vectors
fn sweep(start: f32, end: f32, count: usize) -> Vec<f32> {
    let mut values: Vec<f32> = (0..count)
        .map(|i| start + (end - start) * i as f32 / (count - 1) as f32)
        .collect();
    while !values.len().is_multiple_of(LANES) {
        values.push(end);
    }
    values
}

fn max_relative_error(
    input: &[f32],
    op: fn(DefaultSimdVector) -> DefaultSimdVector,
    reference: fn(f32) -> f32,
) -> f32 {
    let mut worst = 0.0f32;
    for chunk in input.chunks_exact(LANES) {
        let result = op(DefaultSimdVector::from_slice(chunk));
        for (lane, &x) in chunk.iter().enumerate() {
            let expected = reference(x);
            let error = ((result.get(lane) - expected) / expected).abs();
            worst = worst.max(error);
        }
    }
    worst
}

fn max_absolute_error(
    input: &[f32],
    op: fn(DefaultSimdVector) -> DefaultSimdVector,
    reference: fn(f32) -> f32,
) -> f32 {
    let mut worst = 0.0f32;
    for chunk in input.chunks_exact(LANES) {
        let result = op(DefaultSimdVector::from_slice(chunk));
        for (lane, &x) in chunk.iter().enumerate() {
            worst = worst.max((result.get(lane) - reference(x)).abs());
        }
    }
    worst
}

#[test]
fn test_transcendentals_match_libm() {
    let wide = sweep(-20.0, 20.0, 401);
    let unit = sweep(-1.0, 1.0, 201);
    let positive = sweep(1e-4, 1e4, 401);

    assert_lanes(&wide, |x| x.exp(), libm::expf, "exp");
    assert_lanes(&wide, |x| x.sin(), libm::sinf, "sin");
    assert_lanes(&wide, |x| x.cos(), libm::cosf, "cos");
    assert_lanes(&wide, |x| x.tan(), libm::tanf, "tan");
    assert_lanes(&wide, |x| x.atan(), libm::atanf, "atan");
    assert_lanes(&wide, |x| x.tanh(), libm::tanhf, "tanh");
    assert_lanes(&unit, |x| x.asin(), libm::asinf, "asin");
    assert_lanes(&unit, |x| x.acos(), libm::acosf, "acos");
    assert_lanes(&positive, |x| x.log(), libm::logf, "log");
    assert_lanes(&positive, |x| x.log2(), libm::log2f, "log2");
    assert_lanes(&positive, |x| x.log10(), libm::log10f, "log10");
}

#[test]
fn test_pow_entry_points() {
    let base = sweep(-8.0, 8.0, 33);
    let exponent = sweep(0.5, 3.0, 33);
    let n = base.len();

    let mut out = vec![0.0; n];
    pow_vec_simd(&mut out, &base[..], &exponent[..], n);
    for i in 0..n {
        assert_same_bits(
            out[i],
            libm::powf(base[i], exponent[i]),
            &format!("pow({}, {})", base[i], exponent[i]),
        );
    }

    let mut scalar = vec![0.0; n];
    signed_pow_vec(&mut scalar, &base[..], 1.5, n);
    signed_pow_vec_simd(&mut out, &base[..], 1.5, n);
    for i in 0..n {
        let x = base[i];
        let expected = if x < 0.0 {
            -libm::powf(-x, 1.5)
        } else {
            libm::powf(x, 1.5)
        };
        assert_same_bits(scalar[i], expected, &format!("signed_pow({}, 1.5)", x));
        assert_same_bits(out[i], scalar[i], &format!("signed_pow({}, 1.5) paths", x));
    }
}

#[test]
fn test_signed_sqrt_keeps_polarity() {
    let input = sweep(-16.0, 16.0, 65);
    assert_lanes(
        &input,
        |x| x.signed_sqrt(),
        |x| {
            if x < 0.0 {
                -libm::sqrtf(-x)
            } else {
                libm::sqrtf(x)
            }
        },
        "signed_sqrt",
    );
}

#[test]
fn test_fast_reciprocal_error() {
    let input = sweep(0.01, 1000.0, 1001);
    let error = max_relative_error(&input, |x| x.fast_reciprocal(), |x| 1.0 / x);
    // Hardware estimate is specified to 1.5 * 2^-12
    assert!(error <= 1.5 / 4096.0, "fast_reciprocal error {}", error);

    let exact = max_relative_error(&input, |x| x.reciprocal(), |x| 1.0 / x);
    assert_eq!(exact, 0.0);
}

#[test]
fn test_fast_exp2_accuracy() {
    let input = sweep(-60.0, 60.0, 4801);
    let error = max_relative_error(&input, fast_exp2, libm::exp2f);
    assert!(error < 1e-4, "fast_exp2 relative error {}", error);
}

#[test]
fn test_fast_exp_accuracy() {
    let input = sweep(-40.0, 40.0, 3201);
    let error = max_relative_error(&input, fast_exp, libm::expf);
    assert!(error < 1e-4, "fast_exp relative error {}", error);
}

#[test]
fn test_fast_log2_accuracy() {
    let input = sweep(1e-6, 1e6, 4801);
    let error = max_absolute_error(&input, fast_log2, libm::log2f);
    assert!(error < 2e-4, "fast_log2 absolute error {}", error);

    let small = sweep(0.01, 4.0, 2001);
    let error = max_absolute_error(&small, fast_log2, libm::log2f);
    assert!(error < 2e-4, "fast_log2 absolute error near 1: {}", error);
}

#[test]
fn test_fast_tanh_accuracy() {
    let input = sweep(-12.0, 12.0, 2401);
    let error = max_absolute_error(&input, fast_tanh, libm::tanhf);
    assert!(error < 1e-4, "fast_tanh absolute error {}", error);

    let saturated = fast_tanh(DefaultSimdVector::splat(50.0));
    assert!((saturated.get(0) - 1.0).abs() < 1e-6);
}

#[test]
fn test_midi_to_frequency() {
    // A4 = 440 Hz; one octave every 12 semitones
    let notes = sweep(21.0, 108.0, 88);
    for chunk in notes.chunks_exact(LANES) {
        let semitones = DefaultSimdVector::from_slice(chunk) - DefaultSimdVector::splat(69.0);
        let octaves = semitones / DefaultSimdVector::splat(12.0);
        let freq = fast_exp2(octaves) * DefaultSimdVector::splat(440.0);
        for (lane, &note) in chunk.iter().enumerate() {
            let expected = 440.0 * libm::exp2f((note - 69.0) / 12.0);
            assert_close(freq.get(lane), expected, 1e-4, &format!("note {}", note));
        }
    }
}
