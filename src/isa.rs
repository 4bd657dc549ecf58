//! Runtime ISA detection, resolved once per process.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsaLevel {
    Scalar,
    Avx2,
    Neon,
}

static ISA_LEVEL: OnceLock<IsaLevel> = OnceLock::new();

/// The detected ISA level, cached after the first call.
///
/// Strategy selection keys off this once per matmul call; the hot loop never
/// re-detects.
pub fn get_isa_level() -> IsaLevel {
    *ISA_LEVEL.get_or_init(|| {
        let isa = detect_isa_features();
        log::info!("detected ISA level: {isa:?}");
        isa
    })
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
fn detect_isa_features() -> IsaLevel {
    if is_x86_feature_detected!("avx2") {
        IsaLevel::Avx2
    } else {
        IsaLevel::Scalar
    }
}

#[cfg(target_arch = "aarch64")]
fn detect_isa_features() -> IsaLevel {
    IsaLevel::Neon
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn detect_isa_features() -> IsaLevel {
    IsaLevel::Scalar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_stable() {
        assert_eq!(get_isa_level(), get_isa_level());
    }
}
