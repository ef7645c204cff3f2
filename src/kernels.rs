//! Named per-operation entry points
//!
//! Every functor gets three entry points: `<op>_vec` (scalar path),
//! `<op>_vec_simd` (bulk+tail) and `<op>_vec_simd_fixed::<N>` (unrolled block).
//! Each argument after the output may be a constant (`f32`), a ramp
//! (`(start, step)`), a buffer (`&[f32]`) or any explicit operand source.
//!
//! ```rust
//! use rigel_kernels::kernels::{clip2_vec_simd, times_vec_simd_fixed};
//!
//! let signal = [0.5f32, -2.0, 1.5, -0.25];
//! let mut out = [0.0; 4];
//! clip2_vec_simd(&mut out, &signal, 1.0, 4);
//! assert_eq!(out, [0.5, -1.0, 1.0, -0.25]);
//!
//! // Linear fade-in over a 4-sample block
//! times_vec_simd_fixed::<4>(&mut out, &signal, (0.0, 0.25));
//! assert_eq!(out, [0.0, -0.5, 0.75, -0.1875]);
//! ```

use crate::engine::{apply, apply_simd};
use crate::functors::{
    Clip2, Equal, Greater, GreaterEqual, Less, LessEqual, Max, Min, Minus, NotEqual, Over, Plus,
    Pow, SignedPow, Times,
};
use crate::operand::IntoOperand;
use crate::unroll::apply_simd_fixed;

macro_rules! entry_points {
    ($($functor:ident => $scalar:ident, $simd:ident, $fixed:ident;)*) => {
        $(
            #[doc = concat!("[`", stringify!($functor), "`] over `n` elements, scalar path")]
            #[inline]
            pub fn $scalar(
                output: &mut [f32],
                arg1: impl IntoOperand,
                arg2: impl IntoOperand,
                n: usize,
            ) {
                apply($functor, output, arg1, arg2, n)
            }

            #[doc = concat!("[`", stringify!($functor), "`] over `n` elements, vector bulk with scalar tail")]
            #[inline]
            pub fn $simd(
                output: &mut [f32],
                arg1: impl IntoOperand,
                arg2: impl IntoOperand,
                n: usize,
            ) {
                apply_simd($functor, output, arg1, arg2, n)
            }

            #[doc = concat!("[`", stringify!($functor), "`] over a fixed block of `N` elements, unrolled")]
            #[inline]
            pub fn $fixed<const N: usize>(
                output: &mut [f32],
                arg1: impl IntoOperand,
                arg2: impl IntoOperand,
            ) {
                apply_simd_fixed::<N>($functor, output, arg1, arg2)
            }
        )*
    };
}

entry_points! {
    Plus => plus_vec, plus_vec_simd, plus_vec_simd_fixed;
    Minus => minus_vec, minus_vec_simd, minus_vec_simd_fixed;
    Times => times_vec, times_vec_simd, times_vec_simd_fixed;
    Over => over_vec, over_vec_simd, over_vec_simd_fixed;
    Min => min_vec, min_vec_simd, min_vec_simd_fixed;
    Max => max_vec, max_vec_simd, max_vec_simd_fixed;
    Less => less_vec, less_vec_simd, less_vec_simd_fixed;
    LessEqual => less_equal_vec, less_equal_vec_simd, less_equal_vec_simd_fixed;
    Greater => greater_vec, greater_vec_simd, greater_vec_simd_fixed;
    GreaterEqual => greater_equal_vec, greater_equal_vec_simd, greater_equal_vec_simd_fixed;
    Equal => equal_vec, equal_vec_simd, equal_vec_simd_fixed;
    NotEqual => not_equal_vec, not_equal_vec_simd, not_equal_vec_simd_fixed;
    Clip2 => clip2_vec, clip2_vec_simd, clip2_vec_simd_fixed;
    Pow => pow_vec, pow_vec_simd, pow_vec_simd_fixed;
    SignedPow => signed_pow_vec, signed_pow_vec_simd, signed_pow_vec_simd_fixed;
}
