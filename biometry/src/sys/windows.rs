//! Windows Hello implementation via `UserConsentVerifier`.
//!
//! The verifier renders its own system UI: the fallback and cancel copy of
//! the prompt spec have no equivalent here and only the reason is shown.

use windows::Security::Credentials::UI::{
    UserConsentVerificationResult, UserConsentVerifier, UserConsentVerifierAvailability,
};
use windows::core::HSTRING;

use crate::BiometryError;
use crate::code::ErrorCode;
use crate::probe::{BiometryType, Probe, ProbeFault};
use crate::prompt::{PromptSpec, UNRECOGNIZED_FAILURE};

fn known_fault(code: ErrorCode, description: &str) -> Option<ProbeFault> {
    Some(ProbeFault {
        code: Some(code),
        description: description.to_owned(),
        detail: None,
    })
}

/// Query Windows Hello availability.
///
/// The query blocks on the WinRT async operation: the checker contract is
/// synchronous.
pub(crate) fn probe() -> Probe {
    let availability = UserConsentVerifier::CheckAvailabilityAsync().and_then(|op| op.get());

    let (available, fault) = match availability {
        Ok(UserConsentVerifierAvailability::Available) => (true, None),
        Ok(UserConsentVerifierAvailability::DeviceNotPresent) => (
            false,
            known_fault(
                ErrorCode::BiometryNotAvailable,
                "no biometric verifier device is present",
            ),
        ),
        Ok(UserConsentVerifierAvailability::NotConfiguredForUser) => (
            false,
            known_fault(
                ErrorCode::BiometryNotEnrolled,
                "Windows Hello is not configured for the current user",
            ),
        ),
        Ok(UserConsentVerifierAvailability::DisabledByPolicy) => (
            false,
            known_fault(
                ErrorCode::BiometryNotAvailable,
                "biometric verification is disabled by policy",
            ),
        ),
        Ok(UserConsentVerifierAvailability::DeviceBusy) => (
            false,
            known_fault(
                ErrorCode::SystemCancel,
                "the biometric verifier device is busy",
            ),
        ),
        Ok(_) => (
            false,
            known_fault(
                ErrorCode::BiometryNotAvailable,
                "biometric verification is unavailable",
            ),
        ),
        Err(err) => (
            false,
            Some(ProbeFault {
                code: None,
                description: err.to_string(),
                detail: None,
            }),
        ),
    };

    Probe {
        // The verifier API does not expose the modality; fingerprint is
        // reported as the generic stand-in whenever a device exists.
        kind: if available || matches!(
            &fault,
            Some(ProbeFault {
                code: Some(ErrorCode::BiometryNotEnrolled),
                ..
            })
        ) {
            BiometryType::Fingerprint
        } else {
            BiometryType::None
        },
        available,
        fault,
        face_disclosure_declared: true,
    }
}

/// Run one verification prompt.
///
/// # Errors
/// Returns [`BiometryError::Prompt`] for verification failures, or
/// [`BiometryError::Platform`] when the WinRT call itself fails.
pub(crate) async fn evaluate(spec: PromptSpec) -> Result<(), BiometryError> {
    let operation = UserConsentVerifier::RequestVerificationAsync(&HSTRING::from(&spec.reason))
        .map_err(|err| BiometryError::Platform(err.to_string()))?;
    let result = operation
        .await
        .map_err(|err| BiometryError::Platform(err.to_string()))?;

    let (message, code) = match result {
        UserConsentVerificationResult::Verified => return Ok(()),
        UserConsentVerificationResult::DeviceNotPresent => (
            "no biometric verifier device is present",
            ErrorCode::BiometryNotAvailable,
        ),
        UserConsentVerificationResult::NotConfiguredForUser => (
            "Windows Hello is not configured for the current user",
            ErrorCode::BiometryNotEnrolled,
        ),
        UserConsentVerificationResult::DisabledByPolicy => (
            "biometric verification is disabled by policy",
            ErrorCode::BiometryNotAvailable,
        ),
        UserConsentVerificationResult::DeviceBusy => (
            "the biometric verifier device is busy",
            ErrorCode::SystemCancel,
        ),
        UserConsentVerificationResult::RetriesExhausted => (
            "verification retries are exhausted",
            ErrorCode::BiometryLockout,
        ),
        UserConsentVerificationResult::Canceled => {
            ("verification was cancelled", ErrorCode::UserCancel)
        }
        _ => (UNRECOGNIZED_FAILURE, ErrorCode::AuthenticationFailed),
    };

    Err(BiometryError::Prompt {
        message: message.to_owned(),
        code,
    })
}
