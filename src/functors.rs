//! Elementwise operations
//!
//! A [`Functor`] maps two operand values to one result. Every functor is a
//! zero-sized, stateless type whose single generic `call` works for the scalar
//! backend and for every vector backend alike, which is what lets the engine
//! finish a vector loop with scalar tail elements.
//!
//! Comparison functors follow the numeric convention: each lane of the result is
//! exactly `0.0` or `1.0`.

use crate::traits::SimdVector;

/// A pure, stateless elementwise operation on two operands
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{DefaultSimdVector, Functor, Over, SimdVector};
///
/// let q = Over.call(DefaultSimdVector::splat(3.0), DefaultSimdVector::splat(2.0));
/// assert_eq!(q.get(0), 1.5);
/// ```
pub trait Functor: Copy {
    /// Apply the operation lane-wise
    fn call<V: SimdVector>(self, lhs: V, rhs: V) -> V;
}

macro_rules! functor {
    ($(#[$meta:meta])* $name:ident($lhs:ident, $rhs:ident) => $body:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Functor for $name {
            #[inline(always)]
            fn call<V: SimdVector>(self, $lhs: V, $rhs: V) -> V {
                $body
            }
        }
    };
}

functor! {
    /// `lhs + rhs`
    Plus(lhs, rhs) => lhs + rhs
}

functor! {
    /// `lhs - rhs`
    Minus(lhs, rhs) => lhs - rhs
}

functor! {
    /// `lhs * rhs`
    Times(lhs, rhs) => lhs * rhs
}

functor! {
    /// `lhs / rhs`
    Over(lhs, rhs) => lhs / rhs
}

functor! {
    /// Lane-wise minimum
    Min(lhs, rhs) => lhs.min(rhs)
}

functor! {
    /// Lane-wise maximum
    Max(lhs, rhs) => lhs.max(rhs)
}

functor! {
    /// `1.0` where `lhs < rhs`, else `0.0`
    Less(lhs, rhs) => lhs.less(rhs)
}

functor! {
    /// `1.0` where `lhs <= rhs`, else `0.0`
    LessEqual(lhs, rhs) => lhs.less_equal(rhs)
}

functor! {
    /// `1.0` where `lhs > rhs`, else `0.0`
    Greater(lhs, rhs) => lhs.greater(rhs)
}

functor! {
    /// `1.0` where `lhs >= rhs`, else `0.0`
    GreaterEqual(lhs, rhs) => lhs.greater_equal(rhs)
}

functor! {
    /// `1.0` where `lhs == rhs`, else `0.0`
    Equal(lhs, rhs) => lhs.equal(rhs)
}

functor! {
    /// `1.0` where `lhs != rhs`, else `0.0`
    NotEqual(lhs, rhs) => lhs.not_equal(rhs)
}

functor! {
    /// Symmetric clamp of `value` into `[-limit, limit]`
    ///
    /// `limit` must be non-negative. A NaN value lane comes out as `-limit`.
    Clip2(value, limit) => value.max(-limit).min(limit)
}

functor! {
    /// `lhs` raised to `rhs` (engineering-grade)
    Pow(lhs, rhs) => lhs.pow(rhs)
}

functor! {
    /// `sign(lhs) * |lhs|^rhs` (engineering-grade)
    SignedPow(lhs, rhs) => lhs.signed_pow(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarVector;

    fn call<F: Functor>(f: F, a: f32, b: f32) -> f32 {
        f.call(ScalarVector(a), ScalarVector(b)).0
    }

    #[test]
    fn test_arithmetic_functors() {
        assert_eq!(call(Plus, 2.0, 3.0), 5.0);
        assert_eq!(call(Minus, 2.0, 3.0), -1.0);
        assert_eq!(call(Times, 2.0, 3.0), 6.0);
        assert_eq!(call(Over, 3.0, 2.0), 1.5);
        assert_eq!(call(Min, 2.0, 3.0), 2.0);
        assert_eq!(call(Max, 2.0, 3.0), 3.0);
    }

    #[test]
    fn test_comparison_functors_are_numeric() {
        assert_eq!(call(Less, 1.0, 2.0), 1.0);
        assert_eq!(call(LessEqual, 2.0, 2.0), 1.0);
        assert_eq!(call(Greater, 1.0, 2.0), 0.0);
        assert_eq!(call(GreaterEqual, 1.0, 2.0), 0.0);
        assert_eq!(call(Equal, 2.0, 2.0), 1.0);
        assert_eq!(call(NotEqual, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_clip2() {
        assert_eq!(call(Clip2, 5.0, 1.0), 1.0);
        assert_eq!(call(Clip2, -5.0, 1.0), -1.0);
        assert_eq!(call(Clip2, 0.5, 1.0), 0.5);
        assert_eq!(call(Clip2, f32::NAN, 1.0), -1.0);
        assert_eq!(call(Clip2, f32::INFINITY, 2.0), 2.0);
    }

    #[test]
    fn test_pow_functors() {
        assert_eq!(call(Pow, 2.0, 3.0), 8.0);
        assert_eq!(call(SignedPow, -2.0, 3.0), -8.0);
        assert_eq!(call(SignedPow, -4.0, 0.5), -2.0);
    }
}
