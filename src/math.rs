//! Scalar numeric primitives
//!
//! These are the per-element reference functions behind every transcendental
//! operation. The scalar backend calls them directly and the vector backends
//! call them lane by lane, so both paths produce identical results.

/// Natural exponential
#[inline]
pub fn exp(x: f32) -> f32 {
    libm::expf(x)
}

/// Natural logarithm
#[inline]
pub fn log(x: f32) -> f32 {
    libm::logf(x)
}

/// Base-2 logarithm
#[inline]
pub fn log2(x: f32) -> f32 {
    libm::log2f(x)
}

/// Base-10 logarithm
#[inline]
pub fn log10(x: f32) -> f32 {
    libm::log10f(x)
}

/// `x` raised to `y`
#[inline]
pub fn pow(x: f32, y: f32) -> f32 {
    libm::powf(x, y)
}

/// Sign of `x` as `1.0`, `-1.0` or `0.0` (NaN maps to `0.0`)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `sign(x) * |x|^y`
///
/// Keeps the polarity of a bipolar signal when shaping it with an exponent.
#[inline]
pub fn signed_pow(x: f32, y: f32) -> f32 {
    sign(x) * libm::powf(libm::fabsf(x), y)
}

/// `sign(x) * sqrt(|x|)`
#[inline]
pub fn signed_sqrt(x: f32) -> f32 {
    sign(x) * libm::sqrtf(libm::fabsf(x))
}

/// Sine (radians)
#[inline]
pub fn sin(x: f32) -> f32 {
    libm::sinf(x)
}

/// Cosine (radians)
#[inline]
pub fn cos(x: f32) -> f32 {
    libm::cosf(x)
}

/// Tangent (radians)
#[inline]
pub fn tan(x: f32) -> f32 {
    libm::tanf(x)
}

/// Arcsine
#[inline]
pub fn asin(x: f32) -> f32 {
    libm::asinf(x)
}

/// Arccosine
#[inline]
pub fn acos(x: f32) -> f32 {
    libm::acosf(x)
}

/// Arctangent
#[inline]
pub fn atan(x: f32) -> f32 {
    libm::atanf(x)
}

/// Hyperbolic tangent
#[inline]
pub fn tanh(x: f32) -> f32 {
    libm::tanhf(x)
}

/// Truncate toward zero into `i32`
///
/// Out-of-range and NaN inputs produce `i32::MIN`, the same "integer indefinite"
/// value the x86 truncating conversion yields.
#[inline]
pub fn truncate_to_i32(x: f32) -> i32 {
    if x >= -2_147_483_648.0 && x < 2_147_483_648.0 {
        x as i32
    } else {
        i32::MIN
    }
}
