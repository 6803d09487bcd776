//! Configuration validation.
//!
//! All rules run before any fetch or build work; the first violated
//! rule aborts resolution with no partial manifest.

use crate::core::options::{BuildConfig, CompilerFamily};
use crate::recipe::errors::ValidationError;

/// Minimum supported C++ standard.
pub const MIN_CPPSTD: u32 = 14;

/// Check every validation rule against the configuration.
pub fn validate(config: &BuildConfig) -> Result<(), ValidationError> {
    if config.settings.cppstd < MIN_CPPSTD {
        return Err(ValidationError::CppStdTooOld {
            minimum: MIN_CPPSTD,
            requested: config.settings.cppstd,
        });
    }

    if config.settings.compiler == CompilerFamily::Msvc
        && config.settings.msvc_static_runtime
        && config.options.shared
    {
        return Err(ValidationError::SharedWithStaticRuntime);
    }

    // Unset peer option counts as not thread-safe.
    if config.options.with_raw && !config.peers.libraw_thread_safe.unwrap_or(false) {
        return Err(ValidationError::LibrawNotThreadSafe);
    }

    // One-directional on purpose: the rule only applies when opencv is
    // enabled, since opencv embeds and re-exposes the video decoder.
    // Unset peer option counts as enabled.
    if config.options.with_opencv {
        let opencv_with_ffmpeg = config.peers.opencv_with_ffmpeg.unwrap_or(true);
        if config.options.with_ffmpeg != opencv_with_ffmpeg {
            return Err(ValidationError::OpencvFfmpegMismatch {
                with_ffmpeg: config.options.with_ffmpeg,
                opencv_with_ffmpeg,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::TargetOs;

    fn base_config() -> BuildConfig {
        let mut config = BuildConfig::new("2.5.10.1".parse().unwrap());
        config.settings.os = TargetOs::Linux;
        config.settings.compiler = CompilerFamily::Gcc;
        config
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate(&base_config()), Ok(()));
    }

    #[test]
    fn test_cppstd_minimum() {
        let mut config = base_config();
        config.settings.cppstd = 11;
        assert_eq!(
            validate(&config),
            Err(ValidationError::CppStdTooOld {
                minimum: 14,
                requested: 11
            })
        );

        config.settings.cppstd = 14;
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn test_shared_with_msvc_static_runtime_rejected() {
        let mut config = base_config();
        config.settings.compiler = CompilerFamily::Msvc;
        config.settings.msvc_static_runtime = true;
        config.options.shared = true;
        assert_eq!(
            validate(&config),
            Err(ValidationError::SharedWithStaticRuntime)
        );

        // Static library with static runtime is fine
        config.options.shared = false;
        assert_eq!(validate(&config), Ok(()));

        // Shared with dynamic runtime is fine
        config.options.shared = true;
        config.settings.msvc_static_runtime = false;
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn test_static_runtime_only_checked_for_msvc() {
        let mut config = base_config();
        config.settings.msvc_static_runtime = true;
        config.options.shared = true;
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn test_raw_requires_thread_safe_libraw() {
        let mut config = base_config();
        config.options.with_raw = true;

        // Peer option unset counts as not thread-safe
        assert_eq!(validate(&config), Err(ValidationError::LibrawNotThreadSafe));

        config.peers.libraw_thread_safe = Some(false);
        assert_eq!(validate(&config), Err(ValidationError::LibrawNotThreadSafe));

        config.peers.libraw_thread_safe = Some(true);
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn test_opencv_ffmpeg_must_agree() {
        let mut config = base_config();
        config.options.with_opencv = true;
        config.options.with_ffmpeg = false;

        // Peer option unset counts as true -> mismatch
        assert_eq!(
            validate(&config),
            Err(ValidationError::OpencvFfmpegMismatch {
                with_ffmpeg: false,
                opencv_with_ffmpeg: true
            })
        );

        config.peers.opencv_with_ffmpeg = Some(false);
        assert_eq!(validate(&config), Ok(()));

        config.options.with_ffmpeg = true;
        assert_eq!(
            validate(&config),
            Err(ValidationError::OpencvFfmpegMismatch {
                with_ffmpeg: true,
                opencv_with_ffmpeg: false
            })
        );
    }

    #[test]
    fn test_mismatch_ignored_without_opencv() {
        // The rule is one-directional: with opencv disabled the peer's
        // sub-option is irrelevant.
        let mut config = base_config();
        config.options.with_opencv = false;
        config.options.with_ffmpeg = false;
        config.peers.opencv_with_ffmpeg = Some(true);
        assert_eq!(validate(&config), Ok(()));
    }
}
