//! Biometric authentication plugin for application shells.
//!
//! This crate answers exactly two questions on behalf of the shell: can the
//! device authenticate its owner biometrically right now (and why not, if
//! not), and did a specific authentication attempt succeed. Every decision
//! is delegated to the host operating system's authentication service;
//! nothing is persisted across calls and no retry policy is applied.
//!
//! Platform error conditions are reported through a small stable vocabulary
//! of tokens ([`ErrorCode`]) so the shell can localize its own messaging
//! instead of displaying raw platform text.

#![warn(missing_docs)]

mod code;
pub mod plugin;
mod probe;
mod prompt;
/// Platform-specific implementations.
mod sys;

use thiserror::Error;

pub use code::ErrorCode;
pub use probe::{Availability, BiometryType, FACE_DISCLOSURE_MISSING};
pub use prompt::{AuthOptions, DEFAULT_FALLBACK_TITLE, DEFAULT_REASON};

/// Errors produced by a failed authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BiometryError {
    /// The platform prompt completed with a failure.
    #[error("{message}")]
    Prompt {
        /// The platform's localized description of the failure.
        message: String,
        /// Stable token classifying the failure.
        code: ErrorCode,
    },
    /// The platform backend failed outside the prompt itself.
    #[error("platform error: {0}")]
    Platform(String),
}

impl BiometryError {
    /// Stable error token for caller-side localization.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Prompt { code, .. } => *code,
            Self::Platform(_) => ErrorCode::AuthenticationFailed,
        }
    }
}

/// Query the platform for biometric capability.
///
/// Never fails and never suspends; every error condition is reported
/// through the result's `reason` and `code` fields. The result is a fresh
/// snapshot: it is not cached, and it can go stale the moment the user
/// changes enrollment.
#[must_use]
pub fn check_biometry() -> Availability {
    Availability::from_probe(sys::probe())
}

/// Trigger the platform authentication prompt and await its outcome.
///
/// The availability snapshot taken at entry is advisory only: the prompt is
/// attempted regardless, since enrollment can change between check and
/// prompt. Each call is a single fresh platform evaluation: a recent
/// successful unlock never satisfies a new call, and nothing is retried.
/// The platform's single-shot completion callback is marshaled back to the
/// calling async context before this future resolves.
///
/// # Errors
/// Rejects with [`BiometryError::Prompt`] when the prompt fails or is
/// dismissed, and with [`BiometryError::Platform`] when the backend fails
/// outside the prompt itself.
pub async fn authenticate(options: AuthOptions) -> Result<(), BiometryError> {
    let availability = check_biometry();
    if !availability.is_available {
        log::debug!(
            "prompting although biometry reports unavailable ({}); a fallback path may be needed",
            availability.reason
        );
    }

    sys::evaluate(prompt::PromptSpec::resolve(&options)).await
}
