//! Compile-time unrolled engine for fixed block lengths
//!
//! When the block length `N` is a compile-time constant (a host's fixed
//! processing block), the `N / LANES` chunk operations are emitted as a straight
//! sequence with no loop counter and no tail.
//!
//! Unrolling is done by recursive macro expansion: a count of `2k` expands to two
//! copies of the expansion for `k`, down to a single chunk operation. A chunk
//! count is emitted as the sum of its binary digits, each digit guarded by a
//! constant condition, so every count up to [`MAX_UNROLLED_CHUNKS`] becomes
//! straight-line code. Larger counts fall back to a counted loop.

use core::marker::PhantomData;

use crate::engine::{step, step_in_place, OutputSink};
use crate::functors::Functor;
use crate::operand::IntoOperand;
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

// Expands to `$count` consecutive calls of `$step`
macro_rules! repeat {
    (1, $step:ident) => {
        $step()
    };
    (2, $step:ident) => {{
        repeat!(1, $step);
        repeat!(1, $step);
    }};
    (4, $step:ident) => {{
        repeat!(2, $step);
        repeat!(2, $step);
    }};
    (8, $step:ident) => {{
        repeat!(4, $step);
        repeat!(4, $step);
    }};
    (16, $step:ident) => {{
        repeat!(8, $step);
        repeat!(8, $step);
    }};
    (32, $step:ident) => {{
        repeat!(16, $step);
        repeat!(16, $step);
    }};
    (64, $step:ident) => {{
        repeat!(32, $step);
        repeat!(32, $step);
    }};
    (128, $step:ident) => {{
        repeat!(64, $step);
        repeat!(64, $step);
    }};
    (256, $step:ident) => {{
        repeat!(128, $step);
        repeat!(128, $step);
    }};
    (512, $step:ident) => {{
        repeat!(256, $step);
        repeat!(256, $step);
    }};
    (1024, $step:ident) => {{
        repeat!(512, $step);
        repeat!(512, $step);
    }};
}

/// Largest chunk count emitted without a loop
pub const MAX_UNROLLED_CHUNKS: usize = 2047;

/// Straight-line repetition of a chunk operation for a block of `N` elements
///
/// Holds no runtime state. `CHUNKS` is evaluated at compile time and rejects
/// block lengths that are not a multiple of `V::LANES`.
pub struct Unroller<V, const N: usize>(PhantomData<V>);

impl<V: SimdVector, const N: usize> Unroller<V, N> {
    /// Number of chunk operations, `N / V::LANES`
    pub const CHUNKS: usize = {
        assert!(
            N.is_multiple_of(V::LANES),
            "block length must be a multiple of the vector lane count"
        );
        N / V::LANES
    };

    /// Whether `CHUNKS` is expanded without any loop
    pub const FULLY_UNROLLED: bool = Self::CHUNKS <= MAX_UNROLLED_CHUNKS;

    /// Call `step` exactly `CHUNKS` times
    ///
    /// Every guard below is a constant, so only the set bits of `CHUNKS` survive
    /// compilation.
    #[inline(always)]
    pub fn run(mut step: impl FnMut()) {
        if !Self::FULLY_UNROLLED {
            for _ in 0..Self::CHUNKS {
                step();
            }
            return;
        }

        if Self::CHUNKS & 1 != 0 {
            repeat!(1, step);
        }
        if Self::CHUNKS & 2 != 0 {
            repeat!(2, step);
        }
        if Self::CHUNKS & 4 != 0 {
            repeat!(4, step);
        }
        if Self::CHUNKS & 8 != 0 {
            repeat!(8, step);
        }
        if Self::CHUNKS & 16 != 0 {
            repeat!(16, step);
        }
        if Self::CHUNKS & 32 != 0 {
            repeat!(32, step);
        }
        if Self::CHUNKS & 64 != 0 {
            repeat!(64, step);
        }
        if Self::CHUNKS & 128 != 0 {
            repeat!(128, step);
        }
        if Self::CHUNKS & 256 != 0 {
            repeat!(256, step);
        }
        if Self::CHUNKS & 512 != 0 {
            repeat!(512, step);
        }
        if Self::CHUNKS & 1024 != 0 {
            repeat!(1024, step);
        }
    }
}

#[inline(always)]
fn fixed_prefix<const N: usize>(output: &mut [f32]) -> OutputSink<'_> {
    assert!(
        output.len() >= N,
        "Output holds {} elements but the block is {}",
        output.len(),
        N
    );
    OutputSink::new(&mut output[..N])
}

/// Unrolled engine over an explicit vector type for a block of `N` elements
///
/// Fails to compile when `N` is not a multiple of `V::LANES`.
///
/// # Panics
///
/// Panics if `output` or a buffer operand holds fewer than `N` elements.
#[inline]
pub fn apply_fixed_with<V: SimdVector, const N: usize>(
    functor: impl Functor,
    output: &mut [f32],
    arg1: impl IntoOperand,
    arg2: impl IntoOperand,
) {
    let mut sink = fixed_prefix::<N>(output);
    let mut lhs = arg1.into_operand();
    let mut rhs = arg2.into_operand();

    Unroller::<V, N>::run(|| step::<V, _, _, _>(functor, &mut sink, &mut lhs, &mut rhs));
}

/// Unrolled vectorized path for a block of `N` elements on [`DefaultSimdVector`]
///
/// Produces exactly what [`apply_simd`](crate::apply_simd) produces for `n = N`.
///
/// ```rust
/// use rigel_kernels::{apply_simd_fixed, Times};
///
/// let input: [f32; 8] = core::array::from_fn(|i| (i + 1) as f32);
/// let mut out = [0.0; 8];
/// apply_simd_fixed::<8>(Times, &mut out, &input, 2.0);
/// assert_eq!(out, [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]);
/// ```
#[inline]
pub fn apply_simd_fixed<const N: usize>(
    functor: impl Functor,
    output: &mut [f32],
    arg1: impl IntoOperand,
    arg2: impl IntoOperand,
) {
    apply_fixed_with::<DefaultSimdVector, N>(functor, output, arg1, arg2)
}

/// Unrolled in-place engine over an explicit vector type
#[inline]
pub fn apply_fixed_in_place_with<V: SimdVector, const N: usize>(
    functor: impl Functor,
    buffer: &mut [f32],
    arg2: impl IntoOperand,
) {
    let mut sink = fixed_prefix::<N>(buffer);
    let mut rhs = arg2.into_operand();

    Unroller::<V, N>::run(|| step_in_place::<V, _, _>(functor, &mut sink, &mut rhs));
}

/// Unrolled in-place vectorized path
#[inline]
pub fn apply_simd_fixed_in_place<const N: usize>(
    functor: impl Functor,
    buffer: &mut [f32],
    arg2: impl IntoOperand,
) {
    apply_fixed_in_place_with::<DefaultSimdVector, N>(functor, buffer, arg2)
}
