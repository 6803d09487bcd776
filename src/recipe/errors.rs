//! Validation error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// A known-invalid configuration, rejected before any fetch or build.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ValidationError {
    #[error("C++{requested} is below the required minimum of C++{minimum}")]
    #[diagnostic(
        code(slipway::validate::cppstd),
        help("Set `settings.cppstd` to {minimum} or higher")
    )]
    CppStdTooOld { minimum: u32, requested: u32 },

    #[error("building shared library with static runtime is not supported")]
    #[diagnostic(
        code(slipway::validate::shared_static_runtime),
        help("Use a dynamic MSVC runtime (/MD) or build a static library")
    )]
    SharedWithStaticRuntime,

    #[error("with_raw requires libraw to be built with libraw/*:build_thread_safe=True")]
    #[diagnostic(
        code(slipway::validate::libraw_thread_safety),
        help("Set `peers.libraw_thread_safe = true` once libraw is rebuilt thread-safe")
    )]
    LibrawNotThreadSafe,

    #[error("with_opencv requires with_ffmpeg to be the same as opencv")]
    #[diagnostic(
        code(slipway::validate::opencv_ffmpeg_mismatch),
        help("Align `options.with_ffmpeg` with opencv's own ffmpeg sub-option")
    )]
    OpencvFfmpegMismatch {
        with_ffmpeg: bool,
        opencv_with_ffmpeg: bool,
    },
}

impl ValidationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ValidationError::CppStdTooOld { minimum, requested } => {
                Diagnostic::error(format!(
                    "C++{} is below the required minimum of C++{}",
                    requested, minimum
                ))
                .with_suggestion(format!("Set `settings.cppstd = {}` or higher", minimum))
            }

            ValidationError::SharedWithStaticRuntime => Diagnostic::error(
                "building shared library with static runtime is not supported",
            )
            .with_context("`options.shared = true` with an MSVC static runtime (/MT)")
            .with_suggestion("Switch to a dynamic runtime (/MD)".to_string())
            .with_suggestion("Build a static library instead (`shared = false`)".to_string()),

            ValidationError::LibrawNotThreadSafe => {
                Diagnostic::error("with_raw requires a thread-safe libraw")
                    .with_context("the libraw peer was not built with build_thread_safe")
                    .with_suggestion(
                        "Rebuild libraw thread-safe and set `peers.libraw_thread_safe = true`"
                            .to_string(),
                    )
            }

            ValidationError::OpencvFfmpegMismatch {
                with_ffmpeg,
                opencv_with_ffmpeg,
            } => Diagnostic::error("with_opencv requires with_ffmpeg to be the same as opencv")
                .with_context(format!("this build has with_ffmpeg = {}", with_ffmpeg))
                .with_context(format!(
                    "the opencv peer has with_ffmpeg = {}",
                    opencv_with_ffmpeg
                ))
                .with_suggestion(
                    "opencv embeds and re-exposes the video decoder, so the two toggles must agree"
                        .to_string(),
                ),
        }
    }
}
