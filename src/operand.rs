//! Operand sources
//!
//! An operand is pulled one chunk at a time: a whole vector for the bulk loop,
//! a single lane for the tail. Each source keeps its own cursor, so a tail that
//! follows a vector loop continues exactly where the vector loop stopped.
//!
//! | Source     | Successive values                        | Built from        |
//! |------------|------------------------------------------|-------------------|
//! | `Constant` | `c, c, c, ...`                           | `f32`             |
//! | `Ramp`     | `start, start + step, start + 2*step`    | `(f32, f32)`      |
//! | `ExpRamp`  | `start, start * f, start * f * f, ...`   | `ExpRamp::new`    |
//! | `Buffer`   | `data[0], data[1], ...`                  | `&[f32]`          |
//!
//! The engine is generic over the source type, so which variant is in use is
//! decided once at construction and never inspected while iterating.

use crate::traits::SimdVector;

/// Something that yields successive chunks of operand values
pub trait OperandSource {
    /// Produce the next `V::LANES` values and advance past them
    fn pull<V: SimdVector>(&mut self) -> V;
}

/// Conversion into an [`OperandSource`]
///
/// Lets the engine entry points accept plain values:
///
/// ```rust
/// use rigel_kernels::{apply_simd, Times};
///
/// let input = [1.0, 2.0, 3.0];
/// let mut out = [0.0; 3];
/// // buffer * constant
/// apply_simd(Times, &mut out, &input[..], 2.0, 3);
/// assert_eq!(out, [2.0, 4.0, 6.0]);
/// // ramp (start, step) * constant
/// apply_simd(Times, &mut out, (1.0, 1.0), 10.0, 3);
/// assert_eq!(out, [10.0, 20.0, 30.0]);
/// ```
pub trait IntoOperand {
    /// Resulting source type
    type Source: OperandSource;

    /// Wrap `self` as an operand source
    fn into_operand(self) -> Self::Source;
}

/// The same value on every pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f32);

impl OperandSource for Constant {
    #[inline(always)]
    fn pull<V: SimdVector>(&mut self) -> V {
        V::splat(self.0)
    }
}

/// Linear ramp: `start, start + step, start + 2 * step, ...`
///
/// Vector pulls seed lanes as `value + lane * step` and then advance the running
/// value by `step * LANES`. Over long runs this may differ in the last bits from
/// adding `step` one element at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    value: f32,
    step: f32,
}

impl Ramp {
    /// Ramp starting at `start` and moving by `step` per element
    #[inline]
    pub const fn new(start: f32, step: f32) -> Self {
        Self { value: start, step }
    }

    /// Ramp from `start` that reaches `end` after `n` elements
    ///
    /// This is how a host interpolates a control parameter across one block.
    /// An empty block gives a flat ramp.
    #[inline]
    pub fn spanning(start: f32, end: f32, n: usize) -> Self {
        let step = if n == 0 {
            0.0
        } else {
            (end - start) / n as f32
        };
        Self::new(start, step)
    }

    /// Value the next pull starts from
    #[inline]
    pub fn current(&self) -> f32 {
        self.value
    }

    /// Per-element increment
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }
}

impl OperandSource for Ramp {
    #[inline(always)]
    fn pull<V: SimdVector>(&mut self) -> V {
        let (lanes, advance) = V::ramp(self.value, self.step);
        self.value += advance;
        lanes
    }
}

/// Exponential ramp: `start, start * factor, start * factor^2, ...`
///
/// Values are produced by successive multiplication in both the vector and the
/// single-lane path, so the two agree exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpRamp {
    value: f32,
    factor: f32,
}

impl ExpRamp {
    /// Exponential ramp starting at `start` scaled by `factor` per element
    #[inline]
    pub const fn new(start: f32, factor: f32) -> Self {
        Self {
            value: start,
            factor,
        }
    }

    /// Value the next pull starts from
    #[inline]
    pub fn current(&self) -> f32 {
        self.value
    }
}

impl OperandSource for ExpRamp {
    #[inline(always)]
    fn pull<V: SimdVector>(&mut self) -> V {
        let (lanes, next) = V::geometric(self.value, self.factor);
        self.value = next;
        lanes
    }
}

/// Sequential reads from a caller-owned slice (unaligned loads)
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    data: &'a [f32],
    position: usize,
}

impl<'a> Buffer<'a> {
    /// Read cursor at the start of `data`
    #[inline]
    pub const fn new(data: &'a [f32]) -> Self {
        Self { data, position: 0 }
    }

    /// Index of the next element to be read
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl OperandSource for Buffer<'_> {
    /// # Panics
    ///
    /// Panics if fewer than `V::LANES` elements remain.
    #[inline(always)]
    fn pull<V: SimdVector>(&mut self) -> V {
        let chunk = V::from_slice(&self.data[self.position..]);
        self.position += V::LANES;
        chunk
    }
}

impl IntoOperand for f32 {
    type Source = Constant;

    #[inline(always)]
    fn into_operand(self) -> Constant {
        Constant(self)
    }
}

impl IntoOperand for (f32, f32) {
    type Source = Ramp;

    #[inline(always)]
    fn into_operand(self) -> Ramp {
        Ramp::new(self.0, self.1)
    }
}

impl<'a> IntoOperand for &'a [f32] {
    type Source = Buffer<'a>;

    #[inline(always)]
    fn into_operand(self) -> Buffer<'a> {
        Buffer::new(self)
    }
}

impl<'a, const N: usize> IntoOperand for &'a [f32; N] {
    type Source = Buffer<'a>;

    #[inline(always)]
    fn into_operand(self) -> Buffer<'a> {
        Buffer::new(self)
    }
}

macro_rules! into_operand_identity {
    ($($source:ty),*) => {
        $(
            impl IntoOperand for $source {
                type Source = Self;

                #[inline(always)]
                fn into_operand(self) -> Self {
                    self
                }
            }
        )*
    };
}

into_operand_identity!(Constant, Ramp, ExpRamp);

impl<'a> IntoOperand for Buffer<'a> {
    type Source = Self;

    #[inline(always)]
    fn into_operand(self) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarVector;

    type Scalar = ScalarVector;

    #[test]
    fn test_constant_never_advances() {
        let mut c = Constant(2.5);
        for _ in 0..3 {
            assert_eq!(c.pull::<Scalar>(), ScalarVector(2.5));
        }
    }

    #[test]
    fn test_ramp_scalar_sequence() {
        let mut ramp = Ramp::new(10.0, -1.0);
        let values: [f32; 4] = core::array::from_fn(|_| ramp.pull::<Scalar>().0);
        assert_eq!(values, [10.0, 9.0, 8.0, 7.0]);
        assert_eq!(ramp.current(), 6.0);
    }

    #[test]
    fn test_ramp_spanning() {
        let ramp = Ramp::spanning(0.0, 1.0, 4);
        assert_eq!(ramp.step(), 0.25);
        assert_eq!(Ramp::spanning(3.0, 5.0, 0).step(), 0.0);
    }

    #[test]
    fn test_exp_ramp_sequence() {
        let mut ramp = ExpRamp::new(1.0, 0.5);
        let values: [f32; 4] = core::array::from_fn(|_| ramp.pull::<Scalar>().0);
        assert_eq!(values, [1.0, 0.5, 0.25, 0.125]);
        assert_eq!(ramp.current(), 0.0625);
    }

    #[test]
    fn test_buffer_cursor() {
        let data = [1.0, 2.0, 3.0];
        let mut buffer = Buffer::new(&data);
        assert_eq!(buffer.pull::<Scalar>(), ScalarVector(1.0));
        assert_eq!(buffer.pull::<Scalar>(), ScalarVector(2.0));
        assert_eq!(buffer.position(), 2);
    }

    #[test]
    #[should_panic]
    fn test_buffer_overrun_panics() {
        let data = [1.0];
        let mut buffer = Buffer::new(&data);
        buffer.pull::<Scalar>();
        buffer.pull::<Scalar>();
    }

    #[test]
    fn test_into_operand_shapes() {
        let data = [4.0f32, 5.0];
        assert_eq!(1.5f32.into_operand(), Constant(1.5));
        assert_eq!((0.0f32, 2.0f32).into_operand(), Ramp::new(0.0, 2.0));
        assert_eq!((&data[..]).into_operand().position(), 0);
        assert_eq!((&data).into_operand().pull::<Scalar>(), ScalarVector(4.0));
    }
}
