//! Bulk+tail elementwise engine
//!
//! Applies a [`Functor`] across `n` elements pulled from two operand sources:
//!
//! ```text
//! n = 11, LANES = 4
//! [0  1  2  3] [4  5  6  7] [8] [9] [10]
//!  └ chunk 0 ┘  └ chunk 1 ┘  └─ tail ──┘
//! ```
//!
//! Full vectors are processed first; the remaining `n % LANES` elements then run
//! through the scalar backend, continuing from the exact cursor state (ramp
//! value, buffer position, output position) the vector loop left behind.
//!
//! Operand 1 may be the output itself through the `*_in_place` entry points.
//! Any other overlap between output and operand memory is ruled out by the
//! borrow checker.

use crate::backends::scalar::ScalarVector;
use crate::functors::Functor;
use crate::operand::{IntoOperand, OperandSource};
use crate::traits::SimdVector;
use crate::DefaultSimdVector;

/// Write cursor over caller-owned output memory
///
/// Advances by one chunk per [`push`](Self::push).
#[derive(Debug)]
pub struct OutputSink<'a> {
    data: &'a mut [f32],
    position: usize,
}

impl<'a> OutputSink<'a> {
    /// Cursor at the start of `data`
    #[inline]
    pub fn new(data: &'a mut [f32]) -> Self {
        Self { data, position: 0 }
    }

    /// Index of the next element to be written
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Load the chunk under the cursor without advancing
    ///
    /// # Panics
    ///
    /// Panics if fewer than `V::LANES` elements remain.
    #[inline(always)]
    pub fn read<V: SimdVector>(&self) -> V {
        V::from_slice(&self.data[self.position..])
    }

    /// Store one chunk and advance past it
    ///
    /// # Panics
    ///
    /// Panics if fewer than `V::LANES` elements remain.
    #[inline(always)]
    pub fn push<V: SimdVector>(&mut self, chunk: V) {
        chunk.to_slice(&mut self.data[self.position..]);
        self.position += V::LANES;
    }
}

/// One chunk: pull both operands, apply, write
#[inline(always)]
pub(crate) fn step<V, F, A, B>(functor: F, sink: &mut OutputSink<'_>, lhs: &mut A, rhs: &mut B)
where
    V: SimdVector,
    F: Functor,
    A: OperandSource,
    B: OperandSource,
{
    let result = functor.call(lhs.pull::<V>(), rhs.pull::<V>());
    sink.push(result);
}

/// One chunk with operand 1 read from the output itself
#[inline(always)]
pub(crate) fn step_in_place<V, F, B>(functor: F, sink: &mut OutputSink<'_>, rhs: &mut B)
where
    V: SimdVector,
    F: Functor,
    B: OperandSource,
{
    let current = sink.read::<V>();
    sink.push(functor.call(current, rhs.pull::<V>()));
}

#[inline]
fn output_prefix(output: &mut [f32], n: usize) -> OutputSink<'_> {
    assert!(
        output.len() >= n,
        "Output holds {} elements but {} were requested",
        output.len(),
        n
    );
    OutputSink::new(&mut output[..n])
}

/// Bulk+tail engine over an explicit vector type
///
/// Processes `n / V::LANES` full vectors and then `n % V::LANES` single
/// elements through [`ScalarVector`].
///
/// # Panics
///
/// Panics if `output` or a buffer operand holds fewer than `n` elements.
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{apply_with, Plus, ScalarVector};
///
/// let mut out = [0.0; 5];
/// apply_with::<ScalarVector>(Plus, &mut out, (10.0, -1.0), &[0.0; 5], 5);
/// assert_eq!(out, [10.0, 9.0, 8.0, 7.0, 6.0]);
/// ```
#[inline]
pub fn apply_with<V: SimdVector>(
    functor: impl Functor,
    output: &mut [f32],
    arg1: impl IntoOperand,
    arg2: impl IntoOperand,
    n: usize,
) {
    let mut sink = output_prefix(output, n);
    let mut lhs = arg1.into_operand();
    let mut rhs = arg2.into_operand();

    for _ in 0..n / V::LANES {
        step::<V, _, _, _>(functor, &mut sink, &mut lhs, &mut rhs);
    }
    for _ in 0..n % V::LANES {
        step::<ScalarVector, _, _, _>(functor, &mut sink, &mut lhs, &mut rhs);
    }
}

/// Scalar path: one element per iteration through the scalar backend
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{apply, Times};
///
/// let input = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
/// let mut out = [0.0; 8];
/// apply(Times, &mut out, &input, 2.0, 8);
/// assert_eq!(out, [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]);
/// ```
#[inline]
pub fn apply(
    functor: impl Functor,
    output: &mut [f32],
    arg1: impl IntoOperand,
    arg2: impl IntoOperand,
    n: usize,
) {
    apply_with::<ScalarVector>(functor, output, arg1, arg2, n)
}

/// Vectorized path: bulk chunks on [`DefaultSimdVector`], scalar tail
#[inline]
pub fn apply_simd(
    functor: impl Functor,
    output: &mut [f32],
    arg1: impl IntoOperand,
    arg2: impl IntoOperand,
    n: usize,
) {
    apply_with::<DefaultSimdVector>(functor, output, arg1, arg2, n)
}

/// In-place bulk+tail engine: `buffer[i] = op(buffer[i], arg2[i])`
///
/// # Panics
///
/// Panics if `buffer` or a buffer operand holds fewer than `n` elements.
#[inline]
pub fn apply_in_place_with<V: SimdVector>(
    functor: impl Functor,
    buffer: &mut [f32],
    arg2: impl IntoOperand,
    n: usize,
) {
    let mut sink = output_prefix(buffer, n);
    let mut rhs = arg2.into_operand();

    for _ in 0..n / V::LANES {
        step_in_place::<V, _, _>(functor, &mut sink, &mut rhs);
    }
    for _ in 0..n % V::LANES {
        step_in_place::<ScalarVector, _, _>(functor, &mut sink, &mut rhs);
    }
}

/// In-place scalar path
#[inline]
pub fn apply_in_place(functor: impl Functor, buffer: &mut [f32], arg2: impl IntoOperand, n: usize) {
    apply_in_place_with::<ScalarVector>(functor, buffer, arg2, n)
}

/// In-place vectorized path
///
/// ```rust
/// use rigel_kernels::{apply_simd_in_place, Clip2};
///
/// let mut signal = [-3.0, -0.5, 0.25, 2.0, 9.0];
/// apply_simd_in_place(Clip2, &mut signal, 1.0, 5);
/// assert_eq!(signal, [-1.0, -0.5, 0.25, 1.0, 1.0]);
/// ```
#[inline]
pub fn apply_simd_in_place(
    functor: impl Functor,
    buffer: &mut [f32],
    arg2: impl IntoOperand,
    n: usize,
) {
    apply_in_place_with::<DefaultSimdVector>(functor, buffer, arg2, n)
}
