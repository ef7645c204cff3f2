//! Fixed-size aligned blocks
//!
//! A host usually processes audio in blocks of a fixed length. [`AudioBlock`]
//! stores such a block 64-byte aligned, hands out chunk views that use aligned
//! vector loads and stores, and runs elementwise operations through the unrolled
//! engine.

use core::marker::PhantomData;

use crate::functors::Functor;
use crate::operand::IntoOperand;
use crate::traits::SimdVector;
use crate::unroll::{apply_simd_fixed, apply_simd_fixed_in_place};

const BLOCK_ALIGN: usize = 64;

/// Fixed-size audio block aligned for vector access
///
/// # Memory Layout
///
/// Samples are stored in time order and processed in consecutive chunks:
///
/// ```text
/// Block64 with SSE (4 lanes):
/// [0  1  2  3] [4  5  6  7] ... [60 61 62 63]
///  └ chunk 0 ┘  └ chunk 1 ┘      └ chunk 15 ┘
/// ```
///
/// # Example
///
/// ```rust
/// use rigel_kernels::{Block64, DefaultSimdVector, SimdVector};
///
/// let mut block = Block64::new();
/// for i in 0..64 {
///     block[i] = (i as f32) / 64.0;
/// }
///
/// let gain = DefaultSimdVector::splat(0.5);
/// for mut chunk in block.as_chunks_mut::<DefaultSimdVector>().iter_mut() {
///     let value = chunk.load();
///     chunk.store(value * gain);
/// }
/// assert_eq!(block[32], 0.25);
/// ```
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioBlock<const N: usize> {
    data: [f32; N],
}

impl<const N: usize> AudioBlock<N> {
    /// Block filled with zeros
    #[inline]
    pub const fn new() -> Self {
        Self { data: [0.0; N] }
    }

    /// Block copied from a slice
    ///
    /// # Panics
    ///
    /// Panics if slice length doesn't match block size N
    #[inline]
    pub fn from_slice(slice: &[f32]) -> Self {
        assert_eq!(
            slice.len(),
            N,
            "Slice length {} doesn't match block size {}",
            slice.len(),
            N
        );
        let mut data = [0.0; N];
        data.copy_from_slice(slice);
        Self { data }
    }

    /// Returns the number of samples in this block
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true if the block is empty (only for `N == 0`)
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns a slice view of the entire block
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable slice view of the entire block
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline(always)]
    fn check_chunking<V: SimdVector>() {
        const {
            assert!(
                N.is_multiple_of(V::LANES),
                "Block size must be divisible by the SIMD lane count"
            );
            assert!(
                BLOCK_ALIGN.is_multiple_of(V::LANES * core::mem::size_of::<f32>()),
                "Vector width does not divide the block alignment"
            );
        }
    }

    /// Read-only chunk view using aligned loads
    ///
    /// Fails to compile if N is not divisible by `V::LANES`.
    #[inline]
    pub fn as_chunks<V: SimdVector>(&self) -> SimdChunks<'_, V, N> {
        Self::check_chunking::<V>();
        SimdChunks {
            data: &self.data,
            _phantom: PhantomData,
        }
    }

    /// Mutable chunk view using aligned loads and stores
    ///
    /// Fails to compile if N is not divisible by `V::LANES`.
    #[inline]
    pub fn as_chunks_mut<V: SimdVector>(&mut self) -> SimdChunksMut<'_, V, N> {
        Self::check_chunking::<V>();
        SimdChunksMut {
            data: &mut self.data,
            _phantom: PhantomData,
        }
    }

    /// Overwrite the block with `functor(arg1, arg2)` via the unrolled engine
    ///
    /// ```rust
    /// use rigel_kernels::{Block64, Times};
    ///
    /// let input = Block64::from_slice(&[0.5; 64]);
    /// let mut out = Block64::new();
    /// // Gain ramp from 0.0 rising by 1/64 per sample
    /// out.process(Times, input.as_slice(), (0.0, 1.0 / 64.0));
    /// assert_eq!(out[0], 0.0);
    /// assert_eq!(out[32], 0.25);
    /// ```
    #[inline]
    pub fn process(
        &mut self,
        functor: impl Functor,
        arg1: impl IntoOperand,
        arg2: impl IntoOperand,
    ) {
        apply_simd_fixed::<N>(functor, &mut self.data, arg1, arg2)
    }

    /// `block[i] = functor(block[i], arg2[i])` via the unrolled engine
    #[inline]
    pub fn process_in_place(&mut self, functor: impl Functor, arg2: impl IntoOperand) {
        apply_simd_fixed_in_place::<N>(functor, &mut self.data, arg2)
    }
}

impl<const N: usize> Default for AudioBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

// Index access
impl<const N: usize> core::ops::Index<usize> for AudioBlock<N> {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<const N: usize> core::ops::IndexMut<usize> for AudioBlock<N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

/// Immutable chunk view
pub struct SimdChunks<'a, V: SimdVector, const N: usize> {
    data: &'a [f32; N],
    _phantom: PhantomData<V>,
}

impl<'a, V: SimdVector, const N: usize> SimdChunks<'a, V, N> {
    /// Get number of chunks
    #[inline]
    pub const fn len(&self) -> usize {
        N / V::LANES
    }

    /// Returns true if there are no chunks
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Iterate over chunks
    #[inline]
    pub fn iter(&self) -> SimdChunksIter<'_, V> {
        SimdChunksIter {
            data: self.data,
            index: 0,
            _phantom: PhantomData,
        }
    }
}

/// Iterator over immutable chunks
pub struct SimdChunksIter<'a, V: SimdVector> {
    data: &'a [f32],
    index: usize,
    _phantom: PhantomData<V>,
}

impl<'a, V: SimdVector> Iterator for SimdChunksIter<'a, V> {
    type Item = V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index + V::LANES <= self.data.len() {
            // SAFETY: the chunk is in bounds and starts at a multiple of the
            // vector width inside a 64-byte aligned block
            let chunk = unsafe { V::load_aligned(self.data.as_ptr().add(self.index)) };
            self.index += V::LANES;
            Some(chunk)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.index) / V::LANES;
        (remaining, Some(remaining))
    }
}

impl<'a, V: SimdVector> ExactSizeIterator for SimdChunksIter<'a, V> {}

/// Mutable chunk view
pub struct SimdChunksMut<'a, V: SimdVector, const N: usize> {
    data: &'a mut [f32; N],
    _phantom: PhantomData<V>,
}

impl<'a, V: SimdVector, const N: usize> SimdChunksMut<'a, V, N> {
    /// Get number of chunks
    #[inline]
    pub const fn len(&self) -> usize {
        N / V::LANES
    }

    /// Returns true if there are no chunks
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Iterate over mutable chunks
    #[inline]
    pub fn iter_mut(&mut self) -> SimdChunksMutIter<'_, V> {
        SimdChunksMutIter {
            chunks: self.data.chunks_exact_mut(V::LANES),
            _phantom: PhantomData,
        }
    }
}

/// Iterator over mutable chunks
pub struct SimdChunksMutIter<'a, V: SimdVector> {
    chunks: core::slice::ChunksExactMut<'a, f32>,
    _phantom: PhantomData<V>,
}

impl<'a, V: SimdVector> Iterator for SimdChunksMutIter<'a, V> {
    type Item = SimdChunkMut<'a, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(|slice| SimdChunkMut {
            slice,
            _phantom: PhantomData,
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<'a, V: SimdVector> ExactSizeIterator for SimdChunksMutIter<'a, V> {}

/// Mutable reference to one chunk
pub struct SimdChunkMut<'a, V: SimdVector> {
    slice: &'a mut [f32],
    _phantom: PhantomData<V>,
}

impl<'a, V: SimdVector> SimdChunkMut<'a, V> {
    /// Load the current values as a vector
    #[inline]
    pub fn load(&self) -> V {
        // SAFETY: the slice holds exactly LANES elements at an aligned offset
        unsafe { V::load_aligned(self.slice.as_ptr()) }
    }

    /// Store a vector to this chunk
    #[inline]
    pub fn store(&mut self, vec: V) {
        // SAFETY: as in `load`
        unsafe { vec.store_aligned(self.slice.as_mut_ptr()) }
    }

    /// Store a vector to this chunk with a non-temporal store
    ///
    /// Call [`stream_fence`] before the block is handed to another thread.
    #[inline]
    pub fn stream(&mut self, vec: V) {
        // SAFETY: as in `load`
        unsafe { vec.store_stream(self.slice.as_mut_ptr()) }
    }
}

/// Orders preceding non-temporal stores before any later store
#[inline]
pub fn stream_fence() {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: SSE is part of the x86_64 baseline
    unsafe {
        core::arch::x86_64::_mm_sfence();
    };
    #[cfg(all(target_arch = "x86", target_feature = "sse"))]
    // SAFETY: guarded by the target feature
    unsafe {
        core::arch::x86::_mm_sfence();
    };
}

/// Standard 64-sample block (low-latency processing)
pub type Block64 = AudioBlock<64>;

/// Standard 128-sample block (balanced latency/efficiency)
pub type Block128 = AudioBlock<128>;
