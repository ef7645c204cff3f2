//! SSE backend implementation (x86 / x86-64)
//!
//! 4-lane (128-bit) vectors of `f32`. SSE2 is the baseline; when the build
//! targets SSE4.1 (`-C target-feature=+sse4.1` or a suitable `target-cpu`) the
//! hardware rounding and blend instructions replace the derived sequences.
//!
//! Transcendental functions have no hardware path here and are evaluated lane by
//! lane with the same scalar primitives the scalar backend uses.
//!
//! **Note**: the backend is selected at compile time. Use
//! [`CpuFeatures::detect`](crate::backends::CpuFeatures::detect) to check what
//! the running CPU could do beyond it.

// This backend only compiles on x86/x86_64 targets
#![cfg(any(target_arch = "x86", target_arch = "x86_64"))]

use core::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::math;
use crate::traits::{SimdInt, SimdMask, SimdVector};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;

const SIGN_BITS: i32 = i32::MIN;
const ABS_BITS: i32 = i32::MAX;
// 2^23: every float at or above this magnitude is already an integer
#[cfg(not(target_feature = "sse4.1"))]
const ROUNDING_LIMIT: f32 = 8_388_608.0;

/// SSE vector wrapper (4 lanes of f32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseVector(__m128);

/// SSE mask wrapper (4 all-ones or all-zero lanes)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseMask(__m128);

/// SSE integer vector wrapper (4 lanes of i32)
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SseInt(__m128i);

impl SseVector {
    #[inline(always)]
    fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    fn from_array(lanes: [f32; 4]) -> Self {
        unsafe { SseVector(_mm_loadu_ps(lanes.as_ptr())) }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn sign_bits(self) -> __m128 {
        unsafe { _mm_and_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(SIGN_BITS))) }
    }

    #[inline(always)]
    fn one() -> __m128 {
        unsafe { _mm_set1_ps(1.0) }
    }

    // Lanes with |x| >= 2^23 (or NaN) keep their input value
    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn keep_large(self, rounded: __m128) -> Self {
        unsafe {
            let small = _mm_cmplt_ps(self.abs().0, _mm_set1_ps(ROUNDING_LIMIT));
            SseVector::select(SseMask(small), SseVector(rounded), self)
        }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn truncated(self) -> __m128 {
        unsafe { _mm_cvtepi32_ps(_mm_cvttps_epi32(self.0)) }
    }
}

impl core::fmt::Debug for SseVector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SseVector").field(&self.to_array()).finish()
    }
}

impl core::fmt::Debug for SseMask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let bits = unsafe { _mm_movemask_ps(self.0) };
        write!(f, "SseMask({:#06b})", bits)
    }
}

impl core::fmt::Debug for SseInt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SseInt").field(&self.to_array()).finish()
    }
}

// Applies a scalar function to every lane
macro_rules! per_lane {
    ($vec:expr, $function:path) => {{
        let mut lanes = $vec.to_array();
        for lane in lanes.iter_mut() {
            *lane = $function(*lane);
        }
        SseVector::from_array(lanes)
    }};
    ($lhs:expr, $rhs:expr, $function:path) => {{
        let mut lanes = $lhs.to_array();
        let rhs = $rhs.to_array();
        for (lane, r) in lanes.iter_mut().zip(rhs) {
            *lane = $function(*lane, r);
        }
        SseVector::from_array(lanes)
    }};
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $intrinsic:ident) => {
        impl $trait for SseVector {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                unsafe { SseVector($intrinsic(self.0, rhs.0)) }
            }
        }
    };
}

macro_rules! assign_op {
    ($trait:ident, $method:ident, $intrinsic:ident) => {
        impl $trait for SseVector {
            #[inline(always)]
            fn $method(&mut self, rhs: Self) {
                self.0 = unsafe { $intrinsic(self.0, rhs.0) };
            }
        }
    };
}

binary_op!(Add, add, _mm_add_ps);
binary_op!(Sub, sub, _mm_sub_ps);
binary_op!(Mul, mul, _mm_mul_ps);
binary_op!(Div, div, _mm_div_ps);
binary_op!(BitAnd, bitand, _mm_and_ps);
binary_op!(BitOr, bitor, _mm_or_ps);
binary_op!(BitXor, bitxor, _mm_xor_ps);

assign_op!(AddAssign, add_assign, _mm_add_ps);
assign_op!(SubAssign, sub_assign, _mm_sub_ps);
assign_op!(MulAssign, mul_assign, _mm_mul_ps);
assign_op!(DivAssign, div_assign, _mm_div_ps);

impl Neg for SseVector {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { SseVector(_mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(SIGN_BITS)))) }
    }
}

// Implement SimdVector for SseVector
impl SimdVector for SseVector {
    type Mask = SseMask;
    type Int = SseInt;

    const LANES: usize = 4;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        unsafe { SseVector(_mm_set1_ps(value)) }
    }

    #[inline(always)]
    fn zero() -> Self {
        unsafe { SseVector(_mm_setzero_ps()) }
    }

    #[inline(always)]
    fn from_first(value: f32) -> Self {
        unsafe { SseVector(_mm_set_ss(value)) }
    }

    #[inline(always)]
    fn from_slice(slice: &[f32]) -> Self {
        assert!(slice.len() >= Self::LANES, "Slice too short for SSE load");
        unsafe { SseVector(_mm_loadu_ps(slice.as_ptr())) }
    }

    #[inline(always)]
    fn to_slice(self, slice: &mut [f32]) {
        assert!(slice.len() >= Self::LANES, "Slice too short for SSE store");
        unsafe { _mm_storeu_ps(slice.as_mut_ptr(), self.0) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        SseVector(_mm_load_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        _mm_store_ps(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_stream(self, ptr: *mut f32) {
        _mm_stream_ps(ptr, self.0)
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> (Self, f32) {
        unsafe {
            let offsets = _mm_setr_ps(0.0, 1.0, 2.0, 3.0);
            let lanes = _mm_add_ps(_mm_set1_ps(start), _mm_mul_ps(_mm_set1_ps(step), offsets));
            (SseVector(lanes), step * 4.0)
        }
    }

    #[inline(always)]
    fn get(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn set(&mut self, lane: usize, value: f32) {
        let mut lanes = self.to_array();
        lanes[lane] = value;
        *self = SseVector::from_array(lanes);
    }

    #[inline(always)]
    fn fast_reciprocal(self) -> Self {
        unsafe { SseVector(_mm_rcp_ps(self.0)) }
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_max_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn less(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmplt_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmple_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmpgt_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmpge_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmpeq_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_and_ps(_mm_cmpneq_ps(self.0, rhs.0), Self::one())) }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_le(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmple_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_ge(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpge_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_ne(self, rhs: Self) -> Self::Mask {
        unsafe { SseMask(_mm_cmpneq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn from_mask(mask: Self::Mask) -> Self {
        SseVector(mask.0)
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        unsafe { SseVector(_mm_andnot_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    #[cfg(target_feature = "sse4.1")]
    fn select(mask: Self::Mask, if_set: Self, if_clear: Self) -> Self {
        unsafe { SseVector(_mm_blendv_ps(if_clear.0, if_set.0, mask.0)) }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn select(mask: Self::Mask, if_set: Self, if_clear: Self) -> Self {
        unsafe {
            SseVector(_mm_or_ps(
                _mm_and_ps(mask.0, if_set.0),
                _mm_andnot_ps(mask.0, if_clear.0),
            ))
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        unsafe { SseVector(_mm_and_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(ABS_BITS)))) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { SseVector(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    #[cfg(target_feature = "sse4.1")]
    fn round(self) -> Self {
        unsafe {
            SseVector(_mm_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(
                self.0,
            ))
        }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn round(self) -> Self {
        // Adding and removing 2^23 rounds the magnitude to nearest-even
        unsafe {
            let limit = _mm_set1_ps(ROUNDING_LIMIT);
            let magnitude = _mm_sub_ps(_mm_add_ps(self.abs().0, limit), limit);
            self.keep_large(_mm_or_ps(magnitude, self.sign_bits()))
        }
    }

    #[inline(always)]
    #[cfg(target_feature = "sse4.1")]
    fn floor(self) -> Self {
        unsafe { SseVector(_mm_floor_ps(self.0)) }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn floor(self) -> Self {
        unsafe {
            let truncated = self.truncated();
            let correction = _mm_and_ps(_mm_cmplt_ps(self.0, truncated), Self::one());
            let floored = _mm_sub_ps(truncated, correction);
            self.keep_large(_mm_or_ps(floored, self.sign_bits()))
        }
    }

    #[inline(always)]
    #[cfg(target_feature = "sse4.1")]
    fn ceil(self) -> Self {
        unsafe { SseVector(_mm_ceil_ps(self.0)) }
    }

    #[inline(always)]
    #[cfg(not(target_feature = "sse4.1"))]
    fn ceil(self) -> Self {
        unsafe {
            let truncated = self.truncated();
            let correction = _mm_and_ps(_mm_cmpgt_ps(self.0, truncated), Self::one());
            let ceiled = _mm_add_ps(truncated, correction);
            self.keep_large(_mm_or_ps(ceiled, self.sign_bits()))
        }
    }

    #[inline(always)]
    fn exp(self) -> Self {
        per_lane!(self, math::exp)
    }

    #[inline(always)]
    fn log(self) -> Self {
        per_lane!(self, math::log)
    }

    #[inline(always)]
    fn log2(self) -> Self {
        per_lane!(self, math::log2)
    }

    #[inline(always)]
    fn log10(self) -> Self {
        per_lane!(self, math::log10)
    }

    #[inline(always)]
    fn pow(self, rhs: Self) -> Self {
        per_lane!(self, rhs, math::pow)
    }

    #[inline(always)]
    fn signed_pow(self, rhs: Self) -> Self {
        per_lane!(self, rhs, math::signed_pow)
    }

    #[inline(always)]
    fn signed_sqrt(self) -> Self {
        // sign(x) * sqrt(|x|) with the sign taken as -1, 0 or 1
        self.sign() * self.abs().sqrt()
    }

    #[inline(always)]
    fn sin(self) -> Self {
        per_lane!(self, math::sin)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        per_lane!(self, math::cos)
    }

    #[inline(always)]
    fn tan(self) -> Self {
        per_lane!(self, math::tan)
    }

    #[inline(always)]
    fn asin(self) -> Self {
        per_lane!(self, math::asin)
    }

    #[inline(always)]
    fn acos(self) -> Self {
        per_lane!(self, math::acos)
    }

    #[inline(always)]
    fn atan(self) -> Self {
        per_lane!(self, math::atan)
    }

    #[inline(always)]
    fn tanh(self) -> Self {
        per_lane!(self, math::tanh)
    }

    #[inline(always)]
    fn horizontal_sum(self) -> f32 {
        unsafe {
            // [x1, x0, x3, x2]
            let swapped = _mm_shuffle_ps::<0b1011_0001>(self.0, self.0);
            let sums = _mm_add_ps(self.0, swapped);
            let high = _mm_movehl_ps(swapped, sums);
            _mm_cvtss_f32(_mm_add_ss(sums, high))
        }
    }

    #[inline(always)]
    fn horizontal_min(self) -> f32 {
        unsafe {
            let swapped = _mm_shuffle_ps::<0b1011_0001>(self.0, self.0);
            let mins = _mm_min_ps(self.0, swapped);
            let high = _mm_movehl_ps(swapped, mins);
            _mm_cvtss_f32(_mm_min_ss(mins, high))
        }
    }

    #[inline(always)]
    fn horizontal_max(self) -> f32 {
        unsafe {
            let swapped = _mm_shuffle_ps::<0b1011_0001>(self.0, self.0);
            let maxs = _mm_max_ps(self.0, swapped);
            let high = _mm_movehl_ps(swapped, maxs);
            _mm_cvtss_f32(_mm_max_ss(maxs, high))
        }
    }

    #[inline(always)]
    fn truncate_to_int(self) -> Self::Int {
        unsafe { SseInt(_mm_cvttps_epi32(self.0)) }
    }

    #[inline(always)]
    fn from_int(int_vec: Self::Int) -> Self {
        unsafe { SseVector(_mm_cvtepi32_ps(int_vec.0)) }
    }

    #[inline(always)]
    fn to_int_bits(self) -> Self::Int {
        unsafe { SseInt(_mm_castps_si128(self.0)) }
    }

    #[inline(always)]
    fn from_int_bits(bits: Self::Int) -> Self {
        unsafe { SseVector(_mm_castsi128_ps(bits.0)) }
    }
}

impl SseInt {
    #[inline(always)]
    fn to_array(self) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) };
        out
    }
}

impl Add for SseInt {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_add_epi32(self.0, rhs.0)) }
    }
}

impl Sub for SseInt {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_sub_epi32(self.0, rhs.0)) }
    }
}

impl BitAnd for SseInt {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_and_si128(self.0, rhs.0)) }
    }
}

impl BitOr for SseInt {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_or_si128(self.0, rhs.0)) }
    }
}

// Implement SimdInt for SseInt
impl SimdInt for SseInt {
    const LANES: usize = 4;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        unsafe { SseInt(_mm_set1_epi32(value)) }
    }

    #[inline(always)]
    fn get(self, lane: usize) -> i32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_andnot_si128(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        unsafe {
            // Counts above 31 clear every lane
            let shift_count = _mm_cvtsi32_si128(count as i32);
            SseInt(_mm_sll_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        unsafe {
            let shift_count = _mm_cvtsi32_si128(count as i32);
            SseInt(_mm_srl_epi32(self.0, shift_count))
        }
    }

    #[inline(always)]
    fn mask_lt(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_cmplt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_gt(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_cmpgt_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mask_eq(self, rhs: Self) -> Self {
        unsafe { SseInt(_mm_cmpeq_epi32(self.0, rhs.0)) }
    }
}

// Implement SimdMask for SseMask
impl SimdMask for SseMask {
    #[inline(always)]
    fn all(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) == 0b1111 }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) != 0 }
    }

    #[inline(always)]
    fn none(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) == 0 }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { SseMask(_mm_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { SseMask(_mm_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe { SseMask(_mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(-1)))) }
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        unsafe { SseMask(_mm_xor_ps(self.0, rhs.0)) }
    }
}
