//! SIMD backend implementations
//!
//! Backends are selected at compile time via cargo features and target
//! capabilities. Exactly one of them backs [`DefaultSimdVector`](crate::DefaultSimdVector)
//! in a given build; the scalar backend is always compiled because the engine
//! uses it for tail elements.

use log::{info, warn};

// Scalar backend (always available, also the tail path)
pub mod scalar;

// SSE backend (x86/x86_64 with SSE2, unless scalar is forced)
#[cfg(all(
    feature = "sse",
    not(feature = "force-scalar"),
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub mod sse;

/// CPU feature detection results
///
/// Represents the vector capabilities of the running CPU, independent of the
/// backend this build was compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    /// SSE2 support (x86/x86_64)
    pub has_sse2: bool,

    /// SSE4.1 support (x86/x86_64)
    pub has_sse41: bool,

    /// AVX2 support (x86/x86_64)
    pub has_avx2: bool,
}

impl CpuFeatures {
    /// Detect CPU features at runtime
    ///
    /// # Platform Behavior
    /// - **x86/x86_64**: CPUID detection using the `cpufeatures` crate
    /// - **other targets**: all fields false
    ///
    /// Results are cached by `cpufeatures`, so repeated calls are cheap.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            cpufeatures::new!(cpuid_sse2, "sse2");
            cpufeatures::new!(cpuid_sse41, "sse4.1");
            cpufeatures::new!(cpuid_avx2, "avx2");

            Self {
                has_sse2: cpuid_sse2::get(),
                has_sse41: cpuid_sse41::get(),
                has_avx2: cpuid_avx2::get(),
            }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            Self::default()
        }
    }

    /// Best backend this CPU could run
    pub fn best_backend(&self) -> BackendType {
        if self.has_sse41 {
            BackendType::Sse41
        } else if self.has_sse2 {
            BackendType::Sse2
        } else {
            BackendType::Scalar
        }
    }
}

/// Backend type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackendType {
    /// Portable per-element backend (1 lane)
    Scalar,

    /// SSE2 backend (4 lanes, derived rounding and blend)
    Sse2,

    /// SSE backend built with SSE4.1 rounding and blend instructions
    Sse41,
}

impl BackendType {
    /// Human-readable backend name
    pub const fn name(self) -> &'static str {
        match self {
            BackendType::Scalar => "scalar",
            BackendType::Sse2 => "sse2",
            BackendType::Sse41 => "sse4.1",
        }
    }

    /// Lanes processed per vector by this backend
    pub const fn lanes(self) -> usize {
        match self {
            BackendType::Scalar => 1,
            BackendType::Sse2 | BackendType::Sse41 => 4,
        }
    }
}

impl core::fmt::Display for BackendType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend compiled into this build
pub const fn active() -> BackendType {
    #[cfg(all(
        feature = "sse",
        not(feature = "force-scalar"),
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2",
        target_feature = "sse4.1"
    ))]
    {
        BackendType::Sse41
    }

    #[cfg(all(
        feature = "sse",
        not(feature = "force-scalar"),
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2",
        not(target_feature = "sse4.1")
    ))]
    {
        BackendType::Sse2
    }

    #[cfg(not(all(
        feature = "sse",
        not(feature = "force-scalar"),
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2"
    )))]
    {
        BackendType::Scalar
    }
}

/// Log the compiled backend against what the running CPU supports
///
/// Intended to be called once by the host at startup. Logs at `info` level, and
/// at `warn` level when the CPU could run a better backend than the one built.
pub fn report() -> (BackendType, CpuFeatures) {
    let backend = active();
    let features = CpuFeatures::detect();

    info!(
        "rigel-kernels backend: {} ({} lanes), cpu: sse2={} sse4.1={} avx2={}",
        backend,
        backend.lanes(),
        features.has_sse2,
        features.has_sse41,
        features.has_avx2
    );

    let best = features.best_backend();
    if best > backend {
        warn!(
            "built for {} but this CPU supports {}; rebuild with a matching target-cpu for faster kernels",
            backend, best
        );
    }

    (backend, features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_matches_default_vector() {
        use crate::{DefaultSimdVector, SimdVector};
        assert_eq!(active().lanes(), DefaultSimdVector::LANES);
    }

    #[test]
    fn test_best_backend_ordering() {
        let none = CpuFeatures::default();
        assert_eq!(none.best_backend(), BackendType::Scalar);

        let sse2 = CpuFeatures {
            has_sse2: true,
            ..CpuFeatures::default()
        };
        assert_eq!(sse2.best_backend(), BackendType::Sse2);

        let sse41 = CpuFeatures {
            has_sse2: true,
            has_sse41: true,
            has_avx2: false,
        };
        assert_eq!(sse41.best_backend(), BackendType::Sse41);
        assert!(BackendType::Sse41 > BackendType::Scalar);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(BackendType::Scalar.name(), "scalar");
        assert_eq!(BackendType::Sse41.lanes(), 4);
    }
}
