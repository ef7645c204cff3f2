//! Fast polynomial approximations built on IEEE 754 bit manipulation
//!
//! The `SimdVector` transcendentals (`exp`, `log2`, `tanh`, ...) are exact to
//! libm on every backend. The functions here trade a bounded error for staying
//! entirely in vector registers:
//!
//! | Function    | Error bound                          |
//! |-------------|--------------------------------------|
//! | `fast_exp2` | relative < 1e-4 over [-126, 126]     |
//! | `fast_exp`  | relative < 1e-4 over [-87, 87]       |
//! | `fast_log2` | absolute < 2e-4 for positive normals |
//! | `fast_tanh` | absolute < 1e-4                      |

use core::f32::consts::{LN_2, LOG2_E, SQRT_2};

use crate::traits::{SimdInt, SimdVector};

const EXPONENT_BIAS: i32 = 127;
const MANTISSA_BITS: u32 = 23;
const MANTISSA_MASK: i32 = 0x007F_FFFF;
const ONE_BITS: i32 = 0x3F80_0000;

/// Fast vectorized `2^x`
///
/// Splits `x = i + f` with `i = floor(x)` and `f` in `[0, 1)`. `2^i` is built
/// exactly by writing `i + 127` into the exponent field; `2^f` comes from a
/// degree-5 polynomial. Inputs are clamped to `[-126, 126]`, so the result stays
/// a finite normal number.
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{DefaultSimdVector, SimdVector};
/// use rigel_kernels::approx::fast_exp2;
///
/// // MIDI note 60 relative to A4 = 440 Hz
/// let octaves = DefaultSimdVector::splat((60.0 - 69.0) / 12.0);
/// let freq = fast_exp2(octaves) * DefaultSimdVector::splat(440.0);
/// assert!((freq.get(0) - 261.63).abs() < 0.05);
/// ```
#[inline(always)]
pub fn fast_exp2<V: SimdVector>(x: V) -> V {
    let x = x.max(V::splat(-126.0)).min(V::splat(126.0));

    let whole = x.floor();
    let f = x - whole;

    let biased = whole.truncate_to_int() + V::Int::splat(EXPONENT_BIAS);
    let pow2_i = V::from_int_bits(biased.shl(MANTISSA_BITS));

    let c0 = V::splat(1.0);
    let c1 = V::splat(LN_2);
    let c2 = V::splat(0.240_226_5);
    let c3 = V::splat(0.055_504_11);
    let c4 = V::splat(0.009_618_129);
    let c5 = V::splat(0.001_333_355_8);

    let pow2_f = ((((c5 * f + c4) * f + c3) * f + c2) * f + c1) * f + c0;

    pow2_i * pow2_f
}

/// Fast vectorized `log2(x)` for positive normal inputs
///
/// Reads the unbiased exponent straight from the bit pattern and evaluates a
/// degree-4 polynomial on the mantissa, renormalized into `[√2/2, √2)` so the
/// polynomial is centred on 1. Zero, negative, subnormal and non-finite inputs
/// give unspecified finite results.
///
/// ```rust
/// use rigel_kernels::{DefaultSimdVector, SimdVector};
/// use rigel_kernels::approx::fast_log2;
///
/// let x = DefaultSimdVector::splat(8.0);
/// assert!((fast_log2(x).get(0) - 3.0).abs() < 2e-4);
/// ```
#[inline(always)]
pub fn fast_log2<V: SimdVector>(x: V) -> V {
    let bits = x.to_int_bits();

    // Logical shift, then drop the sign bit
    let exponent_bits = bits.shr(MANTISSA_BITS) & V::Int::splat(0xFF);
    let mut exponent = V::from_int(exponent_bits - V::Int::splat(EXPONENT_BIAS));

    let mantissa_bits = (bits & V::Int::splat(MANTISSA_MASK)) | V::Int::splat(ONE_BITS);
    let mut m = V::from_int_bits(mantissa_bits);

    // Fold [√2, 2) down to [√2/2, 1)
    let high = m.mask_ge(V::splat(SQRT_2));
    exponent += V::from_mask(high) & V::splat(1.0);
    m = V::select(high, m * V::splat(0.5), m);

    let c0 = V::splat(-3.005_614_8);
    let c1 = V::splat(5.727_023);
    let c2 = V::splat(-4.198_805);
    let c3 = V::splat(1.797_496_9);
    let c4 = V::splat(-0.320_043_5);

    let poly = (((c4 * m + c3) * m + c2) * m + c1) * m + c0;

    exponent + poly
}

/// Fast vectorized `e^x`, as `fast_exp2(x * log2(e))`
#[inline(always)]
pub fn fast_exp<V: SimdVector>(x: V) -> V {
    fast_exp2(x * V::splat(LOG2_E))
}

/// Fast vectorized hyperbolic tangent
///
/// `tanh(x) = (e^2x - 1) / (e^2x + 1)` with `e^2x` from [`fast_exp2`]. Inputs
/// beyond ±9 are already ±1 in `f32` and are clamped before exponentiation.
#[inline(always)]
pub fn fast_tanh<V: SimdVector>(x: V) -> V {
    let x = x.max(V::splat(-9.0)).min(V::splat(9.0));
    let e2x = fast_exp2(x * V::splat(2.0 * LOG2_E));
    let one = V::splat(1.0);
    (e2x - one) / (e2x + one)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarVector;
    use crate::DefaultSimdVector;

    fn sweep(start: f32, end: f32, steps: usize) -> impl Iterator<Item = f32> {
        (0..=steps).map(move |i| start + (end - start) * i as f32 / steps as f32)
    }

    #[test]
    fn test_exp2_exact_powers() {
        for p in [-10.0f32, -2.0, 0.0, 1.0, 3.0, 20.0] {
            let value = fast_exp2(DefaultSimdVector::splat(p)).get(0);
            let expected = libm::exp2f(p);
            let error = ((value - expected) / expected).abs();
            assert!(error < 1e-6, "exp2({}) error: {}", p, error);
        }
    }

    #[test]
    fn test_exp2_relative_error() {
        for x in sweep(-20.0, 20.0, 4001) {
            let value = fast_exp2(ScalarVector(x)).0;
            let expected = libm::exp2f(x);
            let error = ((value - expected) / expected).abs();
            assert!(error < 1e-4, "exp2({}) = {}, expected {}", x, value, expected);
        }
    }

    #[test]
    fn test_exp2_clamps_extremes() {
        let high = fast_exp2(DefaultSimdVector::splat(200.0)).get(0);
        assert!(high.is_finite() && high > 1e37, "exp2(200) = {}", high);

        let low = fast_exp2(DefaultSimdVector::splat(-200.0)).get(0);
        assert!(low > 0.0 && low.is_normal(), "exp2(-200) = {}", low);
    }

    #[test]
    fn test_log2_absolute_error() {
        for x in sweep(0.001, 1000.0, 5000) {
            let value = fast_log2(ScalarVector(x)).0;
            let expected = libm::log2f(x);
            assert!(
                (value - expected).abs() < 2e-4,
                "log2({}) = {}, expected {}",
                x,
                value,
                expected
            );
        }
    }

    #[test]
    fn test_exp_and_tanh() {
        for x in sweep(-10.0, 10.0, 2001) {
            let exp = fast_exp(ScalarVector(x)).0;
            let expected = libm::expf(x);
            assert!(((exp - expected) / expected).abs() < 1e-4, "exp({})", x);

            let tanh = fast_tanh(ScalarVector(x)).0;
            assert!((tanh - libm::tanhf(x)).abs() < 1e-4, "tanh({}) = {}", x, tanh);
        }
    }

    #[test]
    fn test_backends_agree() {
        let input = [-3.7f32, 0.25, 1.5, 7.9];
        let positive = [0.003f32, 0.75, 1.5, 440.0];
        let simd_exp = fast_exp2(DefaultSimdVector::from_slice(&input));
        let simd_log = fast_log2(DefaultSimdVector::from_slice(&positive));
        for lane in 0..DefaultSimdVector::LANES {
            assert_eq!(simd_exp.get(lane), fast_exp2(ScalarVector(input[lane])).0);
            assert_eq!(simd_log.get(lane), fast_log2(ScalarVector(positive[lane])).0);
        }
    }
}
