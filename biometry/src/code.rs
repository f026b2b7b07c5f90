//! The stable error-code vocabulary shared by every platform backend.

use std::fmt;

use serde::{Serialize, Serializer};

/// Stable error tokens relayed to the application shell.
///
/// The vocabulary follows the `LocalAuthentication` error domain, the
/// richest of the supported platforms; the other backends translate their
/// own conditions into the nearest token. "No error" is represented as
/// `Option::<ErrorCode>::None` and serializes to the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// The calling application cancelled the evaluation.
    AppCancel,
    /// The user failed to provide valid credentials.
    AuthenticationFailed,
    /// The authentication context is no longer valid.
    InvalidContext,
    /// Evaluation was requested from a non-interactive session.
    NotInteractive,
    /// Passcode fallback was requested but no device passcode is set.
    PasscodeNotSet,
    /// The system cancelled the evaluation.
    SystemCancel,
    /// The user dismissed the prompt.
    UserCancel,
    /// The user chose the passcode-fallback affordance.
    UserFallback,
    /// Too many failed attempts; biometry is locked out.
    BiometryLockout,
    /// Biometric evaluation is not available on this device.
    BiometryNotAvailable,
    /// No biometric credentials are enrolled.
    BiometryNotEnrolled,
}

impl ErrorCode {
    /// The wire token for this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppCancel => "appCancel",
            Self::AuthenticationFailed => "authenticationFailed",
            Self::InvalidContext => "invalidContext",
            Self::NotInteractive => "notInteractive",
            Self::PasscodeNotSet => "passcodeNotSet",
            Self::SystemCancel => "systemCancel",
            Self::UserCancel => "userCancel",
            Self::UserFallback => "userFallback",
            Self::BiometryLockout => "biometryLockout",
            Self::BiometryNotAvailable => "biometryNotAvailable",
            Self::BiometryNotEnrolled => "biometryNotEnrolled",
        }
    }

    /// Map a raw platform authentication-error code onto the vocabulary.
    ///
    /// Codes absent from the table collapse to
    /// [`ErrorCode::BiometryNotAvailable`], so callers always receive a
    /// defined token.
    #[must_use]
    pub const fn from_raw(code: i64) -> Self {
        match code {
            -1 => Self::AuthenticationFailed,
            -2 => Self::UserCancel,
            -3 => Self::UserFallback,
            -4 => Self::SystemCancel,
            -5 => Self::PasscodeNotSet,
            -6 => Self::BiometryNotAvailable,
            -7 => Self::BiometryNotEnrolled,
            -8 => Self::BiometryLockout,
            -9 => Self::AppCancel,
            -10 => Self::InvalidContext,
            -1004 => Self::NotInteractive,
            _ => Self::BiometryNotAvailable,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize an optional code as its token, the empty string standing in
/// for "no error".
pub(crate) fn serialize_optional<S: Serializer>(
    code: &Option<ErrorCode>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(code.map_or("", ErrorCode::as_str))
}
