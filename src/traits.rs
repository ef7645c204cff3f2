//! Core vector abstraction traits
//!
//! Every backend implements [`SimdVector`] for its float vector, [`SimdMask`] for
//! the raw comparison mask and [`SimdInt`] for the 32-bit integer vector used in
//! bit-level manipulation. Kernels are written once against these traits.
//!
//! Comparisons come in two deliberately distinct kinds:
//!
//! - `less`, `greater`, ... return a float vector holding exactly `0.0` or `1.0`
//!   per lane, usable directly in arithmetic (crossfade weights, gates).
//! - `mask_lt`, `mask_gt`, ... return a [`SimdMask`] whose lanes are all-bits-set
//!   or all-bits-clear, meant for branchless composition with `select`, `&` and
//!   `andnot`.

use core::fmt::Debug;
use core::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Core SIMD vector abstraction trait
///
/// All backends (scalar, SSE) implement this trait over `f32` lanes. Arithmetic
/// and bitwise operators come from the `core::ops` supertraits; bitwise operators
/// act on the raw IEEE 754 bit patterns of each lane.
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{DefaultSimdVector, SimdVector};
///
/// let a = DefaultSimdVector::splat(2.0);
/// let b = DefaultSimdVector::splat(3.0);
/// let result = a + b;
/// assert_eq!(result.horizontal_sum(), 5.0 * DefaultSimdVector::LANES as f32);
/// ```
pub trait SimdVector:
    Copy
    + Clone
    + Sized
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
{
    /// Associated mask type for raw comparison results
    type Mask: SimdMask;

    /// Associated 32-bit integer vector with the same lane count
    type Int: SimdInt;

    /// Number of lanes (1 for scalar, 4 for SSE)
    const LANES: usize;

    // Construction

    /// Broadcast a scalar value to all lanes
    fn splat(value: f32) -> Self;

    /// All lanes set to `0.0`
    #[inline(always)]
    fn zero() -> Self {
        Self::splat(0.0)
    }

    /// Vector whose first lane holds `value` and whose other lanes are zero
    fn from_first(value: f32) -> Self;

    /// Unaligned load from a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn from_slice(slice: &[f32]) -> Self;

    /// Unaligned store to a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn to_slice(self, slice: &mut [f32]);

    /// Aligned load
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading LANES floats and aligned to
    /// `LANES * size_of::<f32>()` bytes.
    unsafe fn load_aligned(ptr: *const f32) -> Self;

    /// Aligned store
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing LANES floats and aligned to
    /// `LANES * size_of::<f32>()` bytes.
    unsafe fn store_aligned(self, ptr: *mut f32);

    /// Aligned store that bypasses the cache where the backend supports it
    ///
    /// For output that will not be read again soon. Backends without a
    /// non-temporal store fall back to [`store_aligned`](Self::store_aligned).
    ///
    /// # Safety
    ///
    /// Same contract as [`store_aligned`](Self::store_aligned).
    #[inline(always)]
    unsafe fn store_stream(self, ptr: *mut f32) {
        self.store_aligned(ptr)
    }

    /// Lanes `start, start + step, ..., start + (LANES - 1) * step`
    ///
    /// Returns the seeded vector together with the increment that moves the
    /// ramp forward by one whole vector (`step * LANES`).
    ///
    /// ```rust
    /// use rigel_kernels::{DefaultSimdVector, SimdVector};
    ///
    /// let (lanes, advance) = DefaultSimdVector::ramp(10.0, -1.0);
    /// assert_eq!(lanes.get(0), 10.0);
    /// assert_eq!(advance, -(DefaultSimdVector::LANES as f32));
    /// ```
    fn ramp(start: f32, step: f32) -> (Self, f32);

    /// Lanes `start, start * factor, start * factor^2, ...` built by successive
    /// multiplication
    ///
    /// Returns the seeded vector and the value that follows its last lane.
    #[inline]
    fn geometric(start: f32, factor: f32) -> (Self, f32) {
        let mut lanes = Self::zero();
        let mut value = start;
        for lane in 0..Self::LANES {
            lanes.set(lane, value);
            value *= factor;
        }
        (lanes, value)
    }

    // Element access

    /// Read one lane
    ///
    /// # Panics
    ///
    /// Panics if `lane >= LANES`
    fn get(self, lane: usize) -> f32;

    /// Overwrite one lane
    ///
    /// # Panics
    ///
    /// Panics if `lane >= LANES`
    fn set(&mut self, lane: usize, value: f32);

    // Arithmetic

    /// Exact reciprocal `1 / x`
    #[inline(always)]
    fn reciprocal(self) -> Self {
        Self::splat(1.0) / self
    }

    /// Reciprocal estimate
    ///
    /// Backends with a hardware estimate use it (relative error at most
    /// `1.5 * 2^-12`); others compute the exact reciprocal.
    fn fast_reciprocal(self) -> Self;

    /// Element-wise minimum, `if a < b { a } else { b }`
    ///
    /// When either lane is NaN the second operand is returned.
    fn min(self, rhs: Self) -> Self;

    /// Element-wise maximum, `if a > b { a } else { b }`
    ///
    /// When either lane is NaN the second operand is returned.
    fn max(self, rhs: Self) -> Self;

    // Numeric comparisons (0.0 / 1.0)

    /// `1.0` where `self < rhs`, else `0.0`
    fn less(self, rhs: Self) -> Self;

    /// `1.0` where `self <= rhs`, else `0.0`
    fn less_equal(self, rhs: Self) -> Self;

    /// `1.0` where `self > rhs`, else `0.0`
    fn greater(self, rhs: Self) -> Self;

    /// `1.0` where `self >= rhs`, else `0.0`
    fn greater_equal(self, rhs: Self) -> Self;

    /// `1.0` where `self == rhs`, else `0.0`
    fn equal(self, rhs: Self) -> Self;

    /// `1.0` where `self != rhs` (including NaN lanes), else `0.0`
    fn not_equal(self, rhs: Self) -> Self;

    // Raw mask comparisons

    /// Mask set where `self < rhs`
    fn mask_lt(self, rhs: Self) -> Self::Mask;

    /// Mask set where `self <= rhs`
    fn mask_le(self, rhs: Self) -> Self::Mask;

    /// Mask set where `self > rhs`
    fn mask_gt(self, rhs: Self) -> Self::Mask;

    /// Mask set where `self >= rhs`
    fn mask_ge(self, rhs: Self) -> Self::Mask;

    /// Mask set where `self == rhs`
    fn mask_eq(self, rhs: Self) -> Self::Mask;

    /// Mask set where `self != rhs` (including NaN lanes)
    fn mask_ne(self, rhs: Self) -> Self::Mask;

    /// Reinterpret a mask as a float vector with all-ones or all-zero lanes,
    /// for composition with `&`, `|` and `andnot`
    fn from_mask(mask: Self::Mask) -> Self;

    // Bitwise

    /// `!self & rhs` on the raw bit patterns
    fn andnot(self, rhs: Self) -> Self;

    /// Per lane: `if_set` where the mask lane is set, else `if_clear`
    ///
    /// # Example
    ///
    /// ```rust
    /// use rigel_kernels::{DefaultSimdVector, SimdVector};
    /// let x = DefaultSimdVector::splat(1.0);
    /// let y = DefaultSimdVector::splat(2.0);
    /// let picked = DefaultSimdVector::select(x.mask_lt(y), y, x);
    /// assert_eq!(picked.get(0), 2.0);
    /// ```
    fn select(mask: Self::Mask, if_set: Self, if_clear: Self) -> Self;

    // Unary

    /// Element-wise absolute value (clears the sign bit)
    fn abs(self) -> Self;

    /// `1.0`, `-1.0` or `0.0` following the sign of each lane (NaN maps to `0.0`)
    #[inline(always)]
    fn sign(self) -> Self {
        let zero = Self::zero();
        self.greater(zero) - self.less(zero)
    }

    /// `x * x`
    #[inline(always)]
    fn square(self) -> Self {
        self * self
    }

    /// `x * (x * x)`
    #[inline(always)]
    fn cube(self) -> Self {
        self * (self * self)
    }

    /// Correctly rounded square root
    fn sqrt(self) -> Self;

    // Rounding

    /// Round to nearest integer, ties to even
    fn round(self) -> Self;

    /// Round toward negative infinity
    fn floor(self) -> Self;

    /// Round toward positive infinity
    fn ceil(self) -> Self;

    /// Fractional part, `x - floor(x)`
    #[inline(always)]
    fn frac(self) -> Self {
        self - self.floor()
    }

    // Transcendentals (engineering-grade)

    /// Natural exponential
    fn exp(self) -> Self;

    /// Natural logarithm
    fn log(self) -> Self;

    /// Base-2 logarithm
    fn log2(self) -> Self;

    /// Base-10 logarithm
    fn log10(self) -> Self;

    /// `self` raised to `rhs`
    fn pow(self, rhs: Self) -> Self;

    /// `sign(self) * |self|^rhs`
    fn signed_pow(self, rhs: Self) -> Self;

    /// `sign(self) * sqrt(|self|)`
    fn signed_sqrt(self) -> Self;

    /// Sine (radians)
    fn sin(self) -> Self;

    /// Cosine (radians)
    fn cos(self) -> Self;

    /// Tangent (radians)
    fn tan(self) -> Self;

    /// Arcsine
    fn asin(self) -> Self;

    /// Arccosine
    fn acos(self) -> Self;

    /// Arctangent
    fn atan(self) -> Self;

    /// Hyperbolic tangent
    fn tanh(self) -> Self;

    // Horizontal operations

    /// Sum of all lanes
    fn horizontal_sum(self) -> f32;

    /// Minimum across all lanes, reduced pairwise
    fn horizontal_min(self) -> f32;

    /// Maximum across all lanes, reduced pairwise
    fn horizontal_max(self) -> f32;

    // Integer interop

    /// Convert each lane to `i32`, truncating toward zero
    ///
    /// Lanes that are NaN or outside the `i32` range become `i32::MIN`.
    fn truncate_to_int(self) -> Self::Int;

    /// Numeric conversion from an integer vector
    fn from_int(int_vec: Self::Int) -> Self;

    /// Reinterpret each lane's IEEE 754 bits as an integer
    ///
    /// ```rust
    /// use rigel_kernels::{DefaultSimdVector, SimdInt, SimdVector};
    /// let bits = DefaultSimdVector::splat(1.0).to_int_bits();
    /// assert_eq!(bits.get(0), 0x3F80_0000);
    /// ```
    fn to_int_bits(self) -> Self::Int;

    /// Reinterpret integer lanes as IEEE 754 bits
    fn from_int_bits(bits: Self::Int) -> Self;
}

/// 32-bit integer vector trait
///
/// Arithmetic wraps on overflow. Shifts are logical: vacated bits are zero and a
/// count of 32 or more clears the lane.
pub trait SimdInt:
    Copy
    + Clone
    + Sized
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
{
    /// Number of lanes (matches the associated float vector)
    const LANES: usize;

    /// Broadcast a scalar to all lanes
    fn splat(value: i32) -> Self;

    /// Read one lane
    ///
    /// # Panics
    ///
    /// Panics if `lane >= LANES`
    fn get(self, lane: usize) -> i32;

    /// `!self & rhs`
    fn andnot(self, rhs: Self) -> Self;

    /// Logical shift left
    fn shl(self, count: u32) -> Self;

    /// Logical shift right
    fn shr(self, count: u32) -> Self;

    /// `-1` (all bits set) where `self < rhs` as signed integers, else `0`
    fn mask_lt(self, rhs: Self) -> Self;

    /// `-1` where `self > rhs` as signed integers, else `0`
    fn mask_gt(self, rhs: Self) -> Self;

    /// `-1` where `self == rhs`, else `0`
    fn mask_eq(self, rhs: Self) -> Self;
}

/// Mask type for branchless selection
///
/// Each lane is either all bits set or all bits clear.
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{DefaultSimdVector, SimdMask, SimdVector};
/// let a = DefaultSimdVector::splat(1.0);
/// let b = DefaultSimdVector::splat(2.0);
/// assert!(a.mask_lt(b).all());
/// ```
pub trait SimdMask: Copy + Clone + Sized {
    /// Returns true if all lanes are set
    fn all(self) -> bool;

    /// Returns true if any lane is set
    fn any(self) -> bool;

    /// Returns true if no lanes are set
    fn none(self) -> bool;

    /// Lane-wise AND of two masks
    fn and(self, rhs: Self) -> Self;

    /// Lane-wise OR of two masks
    fn or(self, rhs: Self) -> Self;

    /// Lane-wise NOT
    fn not(self) -> Self;

    /// Lane-wise XOR of two masks
    fn xor(self, rhs: Self) -> Self;
}
