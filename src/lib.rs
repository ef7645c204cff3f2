#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! rigel-kernels: portable SIMD vector abstraction and elementwise kernel engine
//!
//! Kernels are written once against [`SimdVector`] and compiled for whichever
//! backend the build selects: SSE (4 lanes) on x86 targets with SSE2, or the
//! scalar backend (1 lane) everywhere else.
//!
//! # Features
//!
//! - **Vector abstraction**: [`SimdVector`], [`SimdMask`] and [`SimdInt`] with
//!   scalar and SSE backends that agree bit-for-bit on every exact operation
//! - **Operand sources**: constants, linear ramps, geometric ramps and buffers
//!   feed the engine without materializing intermediate arrays
//! - **Elementwise engine**: bulk vectors plus a scalar tail for any length,
//!   or a fully unrolled body for compile-time block sizes
//! - **Block processing**: 64-byte aligned [`AudioBlock`] buffers
//! - **No allocations**: everything is stack-based and real-time safe
//!
//! # Quick Start
//!
//! ```rust
//! use rigel_kernels::{apply_simd, apply_simd_fixed, Clip2, Times};
//!
//! let input = [0.5f32, -2.0, 1.5, -0.25, 3.0, 0.75, -1.0];
//! let mut out = [0.0; 7];
//!
//! // Any length: four lanes at a time, then a scalar tail
//! apply_simd(Clip2, &mut out, &input, 1.0, 7);
//! assert_eq!(out, [0.5, -1.0, 1.0, -0.25, 1.0, 0.75, -1.0]);
//!
//! // Fixed block: gain ramp from 0 in steps of 0.5
//! let mut block = [0.0; 4];
//! apply_simd_fixed::<4>(Times, &mut block, &input, (0.0, 0.5));
//! assert_eq!(block, [0.0, -1.0, 1.5, -0.375]);
//! ```

extern crate libm;

// Core trait definitions
pub mod traits;

// Backend implementations and runtime reporting
pub mod backends;

// Scalar math shared by every backend
pub mod math;

// Fast polynomial approximations
pub mod approx;

// Operand sources and the elementwise engine
pub mod operand;
pub mod functors;
pub mod engine;
pub mod unroll;
pub mod kernels;

// Block processing
pub mod block;
pub mod config;

// Public re-exports for convenience
pub use traits::{SimdInt, SimdMask, SimdVector};

// Re-export backend types
pub use backends::scalar::{ScalarInt, ScalarMask, ScalarVector};
pub use backends::{BackendType, CpuFeatures};

#[cfg(all(
    feature = "sse",
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub use backends::sse::{SseInt, SseMask, SseVector};

// Re-export the engine surface
pub use engine::{
    apply, apply_in_place, apply_in_place_with, apply_simd, apply_simd_in_place, apply_with,
    OutputSink,
};
pub use functors::{
    Clip2, Equal, Functor, Greater, GreaterEqual, Less, LessEqual, Max, Min, Minus, NotEqual, Over,
    Plus, Pow, SignedPow, Times,
};
pub use operand::{Buffer, Constant, ExpRamp, IntoOperand, OperandSource, Ramp};
pub use unroll::{
    apply_fixed_in_place_with, apply_fixed_with, apply_simd_fixed, apply_simd_fixed_in_place,
    Unroller,
};

// Re-export block types
pub use block::{stream_fence, AudioBlock, Block128, Block64};
pub use config::{BlockConfig, ConfigError, ValidatedBlock};

/// Default SIMD vector type (SSE backend, 4 lanes)
///
/// Selected when the `sse` feature is on, `force-scalar` is off and the target
/// guarantees SSE2.
#[cfg(all(
    feature = "sse",
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub type DefaultSimdVector = SseVector;

/// Default SIMD vector type (scalar backend, 1 lane)
#[cfg(not(all(
    feature = "sse",
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
)))]
pub type DefaultSimdVector = ScalarVector;
