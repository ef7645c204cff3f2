//! Block processing integration tests
//!
//! Aligned chunk views and the unrolled block engine must produce the same
//! samples as the slice-based engine.


use rigel_kernels::{
    apply_simd, AudioBlock, Block128, Block64, Clip2, DefaultSimdVector, ExpRamp, Max, Plus,
    SimdVector, Times,
};
use test_utils::*;

#[test]
fn test_block_alignment() {
    let block = Block64::new();
    assert_eq!(block.as_slice().as_ptr() as usize % 64, 0);
    assert_eq!(core::mem::align_of::<Block128>(), 64);

    let blocks = [Block64::new(), Block64::new()];
    assert_eq!(blocks[1].as_slice().as_ptr() as usize % 64, 0);
}

#[test]
fn test_block_processing_gain() {
    let mut input = Block64::new();
    let mut output = Block64::new();

    for i in 0..64 {
        input[i] = (i as f32) / 64.0;
    }

    let gain = DefaultSimdVector::splat(0.5);

    for (in_chunk, mut out_chunk) in input
        .as_chunks::<DefaultSimdVector>()
        .iter()
        .zip(output.as_chunks_mut::<DefaultSimdVector>().iter_mut())
    {
        out_chunk.store(in_chunk * gain);
    }

    for i in 0..64 {
        assert_eq!(output[i], (i as f32) / 64.0 * 0.5, "Sample {} mismatch", i);
    }
}

#[test]
fn test_block_chunk_counts() {
    let block = Block128::new();
    assert_eq!(block.len(), 128);
    assert_eq!(block.as_chunks::<DefaultSimdVector>().len(), 128 / LANES);
    assert_eq!(block.as_chunks::<DefaultSimdVector>().iter().count(), 128 / LANES);
}

#[test]
fn test_block_process_matches_slice_engine() {
    let signal = test_signal::<128>(0.4);
    let input = Block128::from_slice(&signal);

    let mut block = Block128::new();
    block.process(Clip2, input.as_slice(), (0.5, 0.03125));

    let mut expected = [0.0; 128];
    apply_simd(Clip2, &mut expected, &signal, (0.5, 0.03125), 128);
    assert_eq!(block.as_slice(), &expected[..]);
}

#[test]
fn test_block_process_in_place() {
    let signal = test_signal::<64>(1.1);
    let mut block = Block64::from_slice(&signal);

    block.process_in_place(Max, 0.0);
    for i in 0..64 {
        assert_eq!(block[i], ref_max(signal[i], 0.0), "rectified sample {}", i);
    }

    // Exponential decay envelope: 1, 0.5, 0.25, ...
    let mut ones = AudioBlock::<16>::from_slice(&[1.0; 16]);
    ones.process_in_place(Times, ExpRamp::new(1.0, 0.5));
    for i in 0..16 {
        assert_eq!(ones[i], 0.5f32.powi(i as i32), "decay sample {}", i);
    }
}

#[test]
fn test_block_mix() {
    let a = Block64::from_slice(&[1.0; 64]);
    let b = Block64::from_slice(&[0.5; 64]);
    let mut out = Block64::default();

    out.process(Plus, a.as_slice(), b.as_slice());
    assert!(out.as_slice().iter().all(|&x| x == 1.5));
}

#[test]
#[should_panic(expected = "Slice length 3 doesn't match block size 64")]
fn test_block_from_short_slice() {
    let _ = Block64::from_slice(&[0.0; 3]);
}
