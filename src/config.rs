//! Host block configuration
//!
//! A host describes its processing block once with a [`BlockConfig`], validates
//! it, and then runs elementwise operations through the resulting
//! [`ValidatedBlock`]. Block sizes with an unrolled specialization are routed to
//! the fixed-size engine; every other size uses the bulk+tail engine.

use log::{debug, trace};
use thiserror::Error;

use crate::engine::apply_simd;
use crate::functors::Functor;
use crate::operand::IntoOperand;
use crate::traits::SimdVector;
use crate::unroll::{apply_simd_fixed, Unroller};
use crate::DefaultSimdVector;

/// Default block size in samples
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Largest block size accepted by [`BlockConfig::validate`]
pub const MAX_BLOCK_SIZE: usize = 8192;

/// Block sizes with an unrolled engine specialization
pub const UNROLLED_BLOCK_SIZES: [usize; 7] = [16, 32, 64, 128, 256, 512, 1024];

// Whether the active backend expands a listed block size without a loop
fn unrolls(block_size: usize) -> bool {
    match block_size {
        16 => Unroller::<DefaultSimdVector, 16>::FULLY_UNROLLED,
        32 => Unroller::<DefaultSimdVector, 32>::FULLY_UNROLLED,
        64 => Unroller::<DefaultSimdVector, 64>::FULLY_UNROLLED,
        128 => Unroller::<DefaultSimdVector, 128>::FULLY_UNROLLED,
        256 => Unroller::<DefaultSimdVector, 256>::FULLY_UNROLLED,
        512 => Unroller::<DefaultSimdVector, 512>::FULLY_UNROLLED,
        1024 => Unroller::<DefaultSimdVector, 1024>::FULLY_UNROLLED,
        _ => false,
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Block size of zero
    #[error("block size must be greater than zero")]
    EmptyBlock,

    /// Block size the vector backend cannot split into whole chunks
    #[error("block size {block_size} is not a multiple of the {lanes}-lane vector width")]
    NotLaneMultiple {
        /// Requested block size
        block_size: usize,
        /// Lane count of the active backend
        lanes: usize,
    },

    /// Block size above [`MAX_BLOCK_SIZE`]
    #[error("block size {block_size} exceeds the maximum of {max}")]
    TooLarge {
        /// Requested block size
        block_size: usize,
        /// Maximum accepted block size
        max: usize,
    },
}

/// Processing block description supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlockConfig {
    /// Samples per processing block
    pub block_size: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// How a validated block is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionPath {
    /// Compile-time unrolled engine for this exact block size
    Unrolled,
    /// Bulk+tail engine
    BulkTail,
}

impl BlockConfig {
    /// Block configuration with the given size
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Check the block size against the active backend
    ///
    /// # Example
    ///
    /// ```rust
    /// use rigel_kernels::config::{BlockConfig, ConfigError, ExecutionPath};
    ///
    /// let block = BlockConfig::new(128).validate().unwrap();
    /// assert_eq!(block.path(), ExecutionPath::Unrolled);
    ///
    /// assert_eq!(BlockConfig::new(0).validate(), Err(ConfigError::EmptyBlock));
    /// ```
    pub fn validate(&self) -> Result<ValidatedBlock, ConfigError> {
        let block_size = self.block_size;
        let lanes = DefaultSimdVector::LANES;

        if block_size == 0 {
            return Err(ConfigError::EmptyBlock);
        }
        if block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::TooLarge {
                block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if !block_size.is_multiple_of(lanes) {
            return Err(ConfigError::NotLaneMultiple { block_size, lanes });
        }

        let path = if unrolls(block_size) {
            ExecutionPath::Unrolled
        } else {
            ExecutionPath::BulkTail
        };

        debug!(
            "block config: {} samples, {} lanes, {:?} path",
            block_size, lanes, path
        );

        Ok(ValidatedBlock { block_size, path })
    }
}

/// A block size accepted by the active backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedBlock {
    block_size: usize,
    path: ExecutionPath,
}

impl ValidatedBlock {
    /// Samples per block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Engine this block is routed to
    pub fn path(&self) -> ExecutionPath {
        self.path
    }

    /// Apply `functor` over one block
    ///
    /// # Panics
    ///
    /// Panics if `output` or a buffer operand is shorter than the block.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rigel_kernels::config::BlockConfig;
    /// use rigel_kernels::Plus;
    ///
    /// let block = BlockConfig::new(64).validate().unwrap();
    /// let input = [1.0f32; 64];
    /// let mut out = [0.0f32; 64];
    /// block.run(Plus, &mut out, &input[..], 1.0);
    /// assert!(out.iter().all(|&x| x == 2.0));
    /// ```
    pub fn run(
        &self,
        functor: impl Functor,
        output: &mut [f32],
        arg1: impl IntoOperand,
        arg2: impl IntoOperand,
    ) {
        trace!("running {:?} block of {}", self.path, self.block_size);

        if self.path == ExecutionPath::BulkTail {
            return apply_simd(functor, output, arg1, arg2, self.block_size);
        }

        match self.block_size {
            16 => apply_simd_fixed::<16>(functor, output, arg1, arg2),
            32 => apply_simd_fixed::<32>(functor, output, arg1, arg2),
            64 => apply_simd_fixed::<64>(functor, output, arg1, arg2),
            128 => apply_simd_fixed::<128>(functor, output, arg1, arg2),
            256 => apply_simd_fixed::<256>(functor, output, arg1, arg2),
            512 => apply_simd_fixed::<512>(functor, output, arg1, arg2),
            1024 => apply_simd_fixed::<1024>(functor, output, arg1, arg2),
            n => apply_simd(functor, output, arg1, arg2, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functors::Times;

    #[test]
    fn test_default_config() {
        let config = BlockConfig::default();
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        assert_eq!(BlockConfig::new(0).validate(), Err(ConfigError::EmptyBlock));
        assert_eq!(
            BlockConfig::new(MAX_BLOCK_SIZE + DefaultSimdVector::LANES).validate(),
            Err(ConfigError::TooLarge {
                block_size: MAX_BLOCK_SIZE + DefaultSimdVector::LANES,
                max: MAX_BLOCK_SIZE
            })
        );
        if DefaultSimdVector::LANES > 1 {
            assert_eq!(
                BlockConfig::new(DefaultSimdVector::LANES + 1).validate(),
                Err(ConfigError::NotLaneMultiple {
                    block_size: DefaultSimdVector::LANES + 1,
                    lanes: DefaultSimdVector::LANES
                })
            );
        }
    }

    #[test]
    fn test_path_selection() {
        let unrolled = BlockConfig::new(256).validate().unwrap();
        assert_eq!(unrolled.path(), ExecutionPath::Unrolled);

        let bulk = BlockConfig::new(96).validate().unwrap();
        assert_eq!(bulk.path(), ExecutionPath::BulkTail);
        assert_eq!(bulk.block_size(), 96);
    }

    #[test]
    fn test_path_follows_unroller() {
        for &size in UNROLLED_BLOCK_SIZES.iter() {
            let block = BlockConfig::new(size).validate().unwrap();
            let expected = if unrolls(size) {
                ExecutionPath::Unrolled
            } else {
                ExecutionPath::BulkTail
            };
            assert_eq!(block.path(), expected, "block size {}", size);
            assert!(unrolls(size), "block size {} is not unrolled", size);
        }
        assert!(!unrolls(96));
    }

    #[test]
    fn test_run_bulk_tail_block() {
        let block = BlockConfig::new(96).validate().unwrap();
        let input = [2.0f32; 96];
        let mut out = [0.0f32; 96];
        block.run(Times, &mut out, &input, 0.5);
        assert!(out.iter().all(|&x| x == 1.0));
    }
}
