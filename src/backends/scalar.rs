//! Scalar backend implementation
//!
//! Single-lane reference implementation of the full vector surface. It is the
//! whole execution path when no vector backend is built, the tail path of the
//! bulk+tail engine, and the reference that vector backends are tested against.

use core::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::math;
use crate::traits::{SimdInt, SimdMask, SimdVector};

/// Scalar vector wrapper (single-lane SIMD)
///
/// This wraps a single `f32` to implement the SimdVector trait,
/// providing a fallback when SIMD is not available or desired.
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct ScalarVector(pub f32);

/// Scalar mask wrapper (single boolean)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarMask(pub bool);

/// Scalar integer wrapper (single i32 lane)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct ScalarInt(pub i32);

#[inline(always)]
fn bits_op(a: f32, b: f32, op: impl Fn(u32, u32) -> u32) -> f32 {
    f32::from_bits(op(a.to_bits(), b.to_bits()))
}

#[inline(always)]
fn numeric(condition: bool) -> ScalarVector {
    ScalarVector(if condition { 1.0 } else { 0.0 })
}

impl Add for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        ScalarVector(self.0 + rhs.0)
    }
}

impl Sub for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        ScalarVector(self.0 - rhs.0)
    }
}

impl Mul for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        ScalarVector(self.0 * rhs.0)
    }
}

impl Div for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        ScalarVector(self.0 / rhs.0)
    }
}

impl Neg for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        ScalarVector(-self.0)
    }
}

impl AddAssign for ScalarVector {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for ScalarVector {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for ScalarVector {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl DivAssign for ScalarVector {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        self.0 /= rhs.0;
    }
}

impl BitAnd for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        ScalarVector(bits_op(self.0, rhs.0, |a, b| a & b))
    }
}

impl BitOr for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        ScalarVector(bits_op(self.0, rhs.0, |a, b| a | b))
    }
}

impl BitXor for ScalarVector {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        ScalarVector(bits_op(self.0, rhs.0, |a, b| a ^ b))
    }
}

// Implement SimdVector for ScalarVector
impl SimdVector for ScalarVector {
    type Mask = ScalarMask;
    type Int = ScalarInt;

    const LANES: usize = 1;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        ScalarVector(value)
    }

    #[inline(always)]
    fn from_first(value: f32) -> Self {
        ScalarVector(value)
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for scalar load");
        ScalarVector(slice[0])
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(
            slice.len() >= Self::LANES,
            "Slice too short for scalar store"
        );
        slice[0] = self.0;
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        ScalarVector(*ptr)
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        *ptr = self.0;
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> (Self, f32) {
        (ScalarVector(start + 0.0 * step), step)
    }

    #[inline(always)]
    fn get(self, lane: usize) -> f32 {
        assert!(lane < Self::LANES, "Lane {} out of range for scalar", lane);
        self.0
    }

    #[inline(always)]
    fn set(&mut self, lane: usize, value: f32) {
        assert!(lane < Self::LANES, "Lane {} out of range for scalar", lane);
        self.0 = value;
    }

    #[inline(always)]
    fn fast_reciprocal(self) -> Self {
        ScalarVector(1.0 / self.0)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        ScalarVector(if self.0 < rhs.0 { self.0 } else { rhs.0 })
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        ScalarVector(if self.0 > rhs.0 { self.0 } else { rhs.0 })
    }

    #[inline(always)]
    fn less(self, rhs: Self) -> Self {
        numeric(self.0 < rhs.0)
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Self {
        numeric(self.0 <= rhs.0)
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Self {
        numeric(self.0 > rhs.0)
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Self {
        numeric(self.0 >= rhs.0)
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Self {
        numeric(self.0 == rhs.0)
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Self {
        numeric(self.0 != rhs.0)
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 < rhs.0)
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 <= rhs.0)
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 > rhs.0)
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 >= rhs.0)
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 == rhs.0)
    }

    #[inline(always)]
    fn mask_ne(self, rhs: Self) -> Self::Mask {
        ScalarMask(self.0 != rhs.0)
    }

    #[inline(always)]
    fn from_mask(mask: Self::Mask) -> Self {
        ScalarVector(f32::from_bits(if mask.0 { u32::MAX } else { 0 }))
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        ScalarVector(bits_op(self.0, rhs.0, |a, b| !a & b))
    }

    #[inline(always)]
    fn select(mask: Self::Mask, if_set: Self, if_clear: Self) -> Self {
        if mask.0 {
            if_set
        } else {
            if_clear
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        ScalarVector(libm::fabsf(self.0))
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        ScalarVector(libm::sqrtf(self.0))
    }

    #[inline(always)]
    fn round(self) -> Self {
        ScalarVector(libm::rintf(self.0))
    }

    #[inline(always)]
    fn floor(self) -> Self {
        ScalarVector(libm::floorf(self.0))
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        ScalarVector(libm::ceilf(self.0))
    }

    #[inline(always)]
    fn exp(self) -> Self {
        ScalarVector(math::exp(self.0))
    }

    #[inline(always)]
    fn log(self) -> Self {
        ScalarVector(math::log(self.0))
    }

    #[inline(always)]
    fn log2(self) -> Self {
        ScalarVector(math::log2(self.0))
    }

    #[inline(always)]
    fn log10(self) -> Self {
        ScalarVector(math::log10(self.0))
    }

    #[inline(always)]
    fn pow(self, rhs: Self) -> Self {
        ScalarVector(math::pow(self.0, rhs.0))
    }

    #[inline(always)]
    fn signed_pow(self, rhs: Self) -> Self {
        ScalarVector(math::signed_pow(self.0, rhs.0))
    }

    #[inline(always)]
    fn signed_sqrt(self) -> Self {
        ScalarVector(math::signed_sqrt(self.0))
    }

    #[inline(always)]
    fn sin(self) -> Self {
        ScalarVector(math::sin(self.0))
    }

    #[inline(always)]
    fn cos(self) -> Self {
        ScalarVector(math::cos(self.0))
    }

    #[inline(always)]
    fn tan(self) -> Self {
        ScalarVector(math::tan(self.0))
    }

    #[inline(always)]
    fn asin(self) -> Self {
        ScalarVector(math::asin(self.0))
    }

    #[inline(always)]
    fn acos(self) -> Self {
        ScalarVector(math::acos(self.0))
    }

    #[inline(always)]
    fn atan(self) -> Self {
        ScalarVector(math::atan(self.0))
    }

    #[inline(always)]
    fn tanh(self) -> Self {
        ScalarVector(math::tanh(self.0))
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn horizontal_max(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn truncate_to_int(self) -> Self::Int {
        ScalarInt(math::truncate_to_i32(self.0))
    }

    #[inline(always)]
    fn from_int(int_vec: Self::Int) -> Self {
        ScalarVector(int_vec.0 as f32)
    }

    #[inline(always)]
    fn to_int_bits(self) -> Self::Int {
        ScalarInt(self.0.to_bits() as i32)
    }

    #[inline(always)]
    fn from_int_bits(bits: Self::Int) -> Self {
        ScalarVector(f32::from_bits(bits.0 as u32))
    }
}

impl Add for ScalarInt {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        ScalarInt(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for ScalarInt {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        ScalarInt(self.0.wrapping_sub(rhs.0))
    }
}

impl BitAnd for ScalarInt {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        ScalarInt(self.0 & rhs.0)
    }
}

impl BitOr for ScalarInt {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        ScalarInt(self.0 | rhs.0)
    }
}

impl SimdInt for ScalarInt {
    const LANES: usize = 1;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        ScalarInt(value)
    }

    #[inline(always)]
    fn get(self, lane: usize) -> i32 {
        assert!(lane < Self::LANES, "Lane {} out of range for scalar", lane);
        self.0
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        ScalarInt(!self.0 & rhs.0)
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        ScalarInt((self.0 as u32).checked_shl(count).unwrap_or(0) as i32)
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        ScalarInt((self.0 as u32).checked_shr(count).unwrap_or(0) as i32)
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        ScalarInt(if self.0 < rhs.0 { -1 } else { 0 })
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        ScalarInt(if self.0 > rhs.0 { -1 } else { 0 })
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        ScalarInt(if self.0 == rhs.0 { -1 } else { 0 })
    }
}

// Implement SimdMask for ScalarMask
impl SimdMask for ScalarMask {
    #[inline(always)]
    fn all(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0
    }

    #[inline(always)]
    fn none(self) -> bool {
        !self.0
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        ScalarMask(self.0 && rhs.0)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        ScalarMask(self.0 || rhs.0)
    }

    #[inline(always)]
    fn not(self) -> Self {
        ScalarMask(!self.0)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        ScalarMask(self.0 ^ rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_arithmetic() {
        let a = ScalarVector(2.0f32);
        let b = ScalarVector(3.0f32);

        assert_eq!(a + b, ScalarVector(5.0));
        assert_eq!(a - b, ScalarVector(-1.0));
        assert_eq!(a * b, ScalarVector(6.0));
        assert_eq!((a / b).0, 2.0 / 3.0);
        assert_eq!(-a, ScalarVector(-2.0));
        assert_eq!(b.reciprocal().0, 1.0 / 3.0);

        let mut acc = a;
        acc += b;
        acc *= b;
        assert_eq!(acc, ScalarVector(15.0));
    }

    #[test]
    fn test_scalar_minmax_nan_returns_second() {
        let a = ScalarVector(2.0f32);
        let b = ScalarVector(3.0f32);
        let nan = ScalarVector(f32::NAN);

        assert_eq!(a.min(b), ScalarVector(2.0));
        assert_eq!(a.max(b), ScalarVector(3.0));
        assert_eq!(nan.min(a), a);
        assert!(a.max(nan).0.is_nan());
    }

    #[test]
    fn test_scalar_numeric_comparison() {
        let a = ScalarVector(2.0f32);
        let b = ScalarVector(3.0f32);

        assert_eq!(a.less(b).0, 1.0);
        assert_eq!(a.less_equal(a).0, 1.0);
        assert_eq!(a.greater(b).0, 0.0);
        assert_eq!(b.greater_equal(a).0, 1.0);
        assert_eq!(a.equal(b).0, 0.0);
        assert_eq!(a.not_equal(b).0, 1.0);
    }

    #[test]
    fn test_scalar_mask_comparison() {
        let a = ScalarVector(2.0f32);
        let b = ScalarVector(3.0f32);

        assert!(a.mask_lt(b).0);
        assert!(!a.mask_gt(b).0);
        assert!(!a.mask_eq(b).0);
        assert!(a.mask_ne(b).0);
        assert_eq!(ScalarVector::from_mask(a.mask_lt(b)).0.to_bits(), u32::MAX);
        assert_eq!(ScalarVector::from_mask(a.mask_gt(b)).0.to_bits(), 0);
    }

    #[test]
    fn test_scalar_select() {
        let a = ScalarVector(1.0f32);
        let b = ScalarVector(2.0f32);
        let mask_true = ScalarMask(true);
        let mask_false = ScalarMask(false);

        assert_eq!(ScalarVector::select(mask_true, a, b), a);
        assert_eq!(ScalarVector::select(mask_false, a, b), b);
    }

    #[test]
    fn test_scalar_bitwise() {
        let x = ScalarVector(-1.5f32);
        let sign_bit = ScalarVector(-0.0f32);

        assert_eq!(x.andnot(ScalarVector(0.0)), ScalarVector(0.0));
        assert_eq!(sign_bit.andnot(x), ScalarVector(1.5));
        assert_eq!(x & sign_bit, ScalarVector(-0.0));
        assert_eq!((x ^ sign_bit), ScalarVector(1.5));
        assert_eq!(ScalarVector(1.5f32) | sign_bit, x);
    }

    #[test]
    fn test_scalar_unary() {
        assert_eq!(ScalarVector(-3.0f32).abs(), ScalarVector(3.0));
        assert_eq!(ScalarVector(-3.0f32).sign(), ScalarVector(-1.0));
        assert_eq!(ScalarVector(3.0f32).square(), ScalarVector(9.0));
        assert_eq!(ScalarVector(-2.0f32).cube(), ScalarVector(-8.0));
        assert_eq!(ScalarVector(16.0f32).sqrt(), ScalarVector(4.0));
    }

    #[test]
    fn test_scalar_rounding() {
        assert_eq!(ScalarVector(2.5f32).round(), ScalarVector(2.0));
        assert_eq!(ScalarVector(3.5f32).round(), ScalarVector(4.0));
        assert_eq!(ScalarVector(-2.7f32).floor(), ScalarVector(-3.0));
        assert_eq!(ScalarVector(-2.7f32).ceil(), ScalarVector(-2.0));
        assert_eq!(ScalarVector(2.25f32).frac(), ScalarVector(0.25));
        assert_eq!(ScalarVector(-2.25f32).frac(), ScalarVector(0.75));
    }

    #[test]
    fn test_scalar_horizontal() {
        let a = ScalarVector(5.0f32);

        assert_eq!(a.horizontal_sum(), 5.0);
        assert_eq!(a.horizontal_max(), 5.0);
        assert_eq!(a.horizontal_min(), 5.0);
    }

    #[test]
    fn test_scalar_int_interop() {
        assert_eq!(ScalarVector(-2.9f32).truncate_to_int(), ScalarInt(-2));
        assert_eq!(ScalarVector::from_int(ScalarInt(7)), ScalarVector(7.0));
        assert_eq!(ScalarVector(1.0f32).to_int_bits(), ScalarInt(0x3F80_0000));

        let int = ScalarInt(8);
        assert_eq!(int.shl(2), ScalarInt(32));
        assert_eq!(int.shr(2), ScalarInt(2));
        assert_eq!(ScalarInt(-1).shr(28), ScalarInt(0xF));
        assert_eq!(int.shl(32), ScalarInt(0));
        assert_eq!(ScalarInt(i32::MAX) + ScalarInt(1), ScalarInt(i32::MIN));
        assert_eq!(ScalarInt(0xF0).andnot(ScalarInt(0xFF)), ScalarInt(0x0F));
        assert_eq!(ScalarInt(1).mask_lt(ScalarInt(2)), ScalarInt(-1));
        assert_eq!(ScalarInt(1).mask_gt(ScalarInt(2)), ScalarInt(0));
    }

    #[test]
    fn test_scalar_ramp_and_geometric() {
        let (lanes, advance) = ScalarVector::ramp(10.0, -1.0);
        assert_eq!(lanes, ScalarVector(10.0));
        assert_eq!(advance, -1.0);

        let (lanes, next) = ScalarVector::geometric(2.0, 0.5);
        assert_eq!(lanes, ScalarVector(2.0));
        assert_eq!(next, 1.0);
    }

    #[test]
    fn test_scalar_mask() {
        let mask_true = ScalarMask(true);
        let mask_false = ScalarMask(false);

        assert!(mask_true.all());
        assert!(mask_true.any());
        assert!(!mask_true.none());

        assert!(!mask_false.all());
        assert!(!mask_false.any());
        assert!(mask_false.none());

        assert!(mask_true.and(mask_true).0);
        assert!(!mask_true.and(mask_false).0);
        assert!(mask_true.or(mask_false).0);
        assert!(!mask_true.not().0);
        assert!(!mask_true.xor(mask_true).0);
        assert!(mask_true.xor(mask_false).0);
    }
}
