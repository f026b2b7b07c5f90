//! Prompt configuration and outcome handling for the authenticate flow.

use serde::{Deserialize, Serialize};

use crate::code::ErrorCode;
use crate::BiometryError;

/// Reason shown by the platform prompt when the caller supplies none.
pub const DEFAULT_REASON: &str = "Access requires authentication";

/// Label for the passcode-fallback affordance when the caller supplies none.
pub const DEFAULT_FALLBACK_TITLE: &str = "Enter Passcode";

/// Message used when the platform reports a failure of an unrecognized type.
pub(crate) const UNRECOGNIZED_FAILURE: &str = "an unknown error occurred during authentication";

/// Caller-supplied options for [`crate::authenticate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthOptions {
    /// Message displayed by the platform prompt.
    pub reason: Option<String>,
    /// Label for the "enter passcode" affordance. The empty string keeps
    /// the fallback mechanism available without surfacing a visible button.
    #[serde(alias = "iosFallbackTitle")]
    pub fallback_title: Option<String>,
    /// Label for the cancel affordance; the platform default applies when
    /// absent.
    pub cancel_title: Option<String>,
    /// Whether the device passcode is permitted as alternate proof.
    pub allow_device_credential: bool,
}

impl AuthOptions {
    /// Empty options: default copy, biometric-only policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prompt message.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the passcode-fallback label.
    #[must_use]
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = Some(title.into());
        self
    }

    /// Set the cancel label.
    #[must_use]
    pub fn with_cancel_title(mut self, title: impl Into<String>) -> Self {
        self.cancel_title = Some(title.into());
        self
    }

    /// Permit the device passcode as alternate proof.
    #[must_use]
    pub fn allow_device_credential(mut self, allow: bool) -> Self {
        self.allow_device_credential = allow;
        self
    }
}

/// Fully resolved prompt configuration handed to a platform backend.
///
/// Backends must disable any biometric-reuse grace window: a recent
/// successful unlock never satisfies a new call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptSpec {
    /// Message displayed by the prompt.
    pub reason: String,
    /// Visible label of the fallback affordance; `None` suppresses the
    /// label without disabling the fallback policy.
    pub fallback_title: Option<String>,
    /// Label of the cancel affordance; `None` leaves the platform default.
    pub cancel_title: Option<String>,
    /// Whether the policy accepts the device passcode as alternate proof.
    pub allow_device_credential: bool,
}

impl PromptSpec {
    /// Resolve effective prompt copy and policy from caller options.
    pub(crate) fn resolve(options: &AuthOptions) -> Self {
        let reason = match options.reason.as_deref() {
            Some(reason) if !reason.is_empty() => reason.to_owned(),
            _ => DEFAULT_REASON.to_owned(),
        };

        // An explicitly empty title suppresses the visible button while
        // leaving the fallback mechanism itself in place.
        let fallback_title = match options.fallback_title.as_deref() {
            Some("") => None,
            Some(title) => Some(title.to_owned()),
            None => Some(DEFAULT_FALLBACK_TITLE.to_owned()),
        };

        Self {
            reason,
            fallback_title,
            cancel_title: options.cancel_title.clone(),
            allow_device_credential: options.allow_device_credential,
        }
    }
}

/// Failure half of the platform's single-shot prompt callback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PromptFailure {
    /// Whether the error belongs to the platform's biometry error domain.
    pub recognized: bool,
    /// Raw platform error code, when the domain is recognized.
    pub code: Option<i64>,
    /// The platform's localized description.
    pub description: Option<String>,
}

/// Translate a prompt failure into the rejection relayed to the caller.
///
/// Unmapped platform codes collapse to `biometryNotAvailable`, matching the
/// availability checker; errors outside the biometry domain reject with a
/// fixed generic message and `authenticationFailed`.
pub(crate) fn rejection(failure: PromptFailure) -> BiometryError {
    if !failure.recognized {
        return BiometryError::Prompt {
            message: UNRECOGNIZED_FAILURE.to_owned(),
            code: ErrorCode::AuthenticationFailed,
        };
    }

    BiometryError::Prompt {
        message: failure
            .description
            .unwrap_or_else(|| UNRECOGNIZED_FAILURE.to_owned()),
        code: failure
            .code
            .map_or(ErrorCode::BiometryNotAvailable, ErrorCode::from_raw),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{
        AuthOptions, BiometryError, DEFAULT_FALLBACK_TITLE, DEFAULT_REASON, ErrorCode,
        PromptFailure, PromptSpec, UNRECOGNIZED_FAILURE, rejection,
    };

    #[rstest]
    #[case(None, DEFAULT_REASON)]
    #[case(Some(""), DEFAULT_REASON)]
    #[case(Some("Unlock vault"), "Unlock vault")]
    fn resolves_the_prompt_reason(#[case] reason: Option<&str>, #[case] expected: &str) {
        let mut options = AuthOptions::new();
        options.reason = reason.map(str::to_owned);
        assert_eq!(PromptSpec::resolve(&options).reason, expected);
    }

    #[rstest]
    #[case(None, Some(DEFAULT_FALLBACK_TITLE))]
    #[case(Some(""), None)]
    #[case(Some("Use PIN"), Some("Use PIN"))]
    fn resolves_the_fallback_title(#[case] title: Option<&str>, #[case] expected: Option<&str>) {
        let mut options = AuthOptions::new().allow_device_credential(true);
        options.fallback_title = title.map(str::to_owned);

        let spec = PromptSpec::resolve(&options);
        assert_eq!(spec.fallback_title.as_deref(), expected);
        // Suppressing the label must not disable the fallback policy.
        assert!(spec.allow_device_credential);
    }

    #[test]
    fn cancel_title_passes_through() {
        let spec = PromptSpec::resolve(&AuthOptions::new());
        assert_eq!(spec.cancel_title, None);

        let spec = PromptSpec::resolve(&AuthOptions::new().with_cancel_title("Dismiss"));
        assert_eq!(spec.cancel_title.as_deref(), Some("Dismiss"));
    }

    #[test]
    fn options_deserialize_from_shell_arguments() {
        let options: AuthOptions = serde_json::from_value(json!({
            "reason": "Unlock vault",
            "iosFallbackTitle": "Use PIN",
            "allowDeviceCredential": true,
        }))
        .unwrap();
        assert_eq!(options.reason.as_deref(), Some("Unlock vault"));
        assert_eq!(options.fallback_title.as_deref(), Some("Use PIN"));
        assert_eq!(options.cancel_title, None);
        assert!(options.allow_device_credential);

        let options: AuthOptions = serde_json::from_value(json!({
            "fallbackTitle": "Use PIN",
        }))
        .unwrap();
        assert_eq!(options.fallback_title.as_deref(), Some("Use PIN"));
        assert!(!options.allow_device_credential);
    }

    #[test]
    fn spec_serializes_camel_case_for_backends() {
        let spec = PromptSpec::resolve(
            &AuthOptions::new()
                .with_reason("Unlock vault")
                .allow_device_credential(true),
        );
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            json!({
                "reason": "Unlock vault",
                "fallbackTitle": DEFAULT_FALLBACK_TITLE,
                "cancelTitle": null,
                "allowDeviceCredential": true,
            })
        );
    }

    #[test]
    fn recognized_failures_carry_the_mapped_code() {
        let error = rejection(PromptFailure {
            recognized: true,
            code: Some(-8),
            description: Some("Biometry is locked out.".to_owned()),
        });
        assert_eq!(
            error,
            BiometryError::Prompt {
                message: "Biometry is locked out.".to_owned(),
                code: ErrorCode::BiometryLockout,
            }
        );
    }

    #[rstest]
    #[case(Some(-999))]
    #[case(None)]
    fn unmapped_codes_default_like_the_checker(#[case] code: Option<i64>) {
        let error = rejection(PromptFailure {
            recognized: true,
            code,
            description: Some("odd failure".to_owned()),
        });
        assert_eq!(error.code(), ErrorCode::BiometryNotAvailable);
    }

    #[test]
    fn unrecognized_failures_reject_generically() {
        let error = rejection(PromptFailure::default());
        assert_eq!(
            error,
            BiometryError::Prompt {
                message: UNRECOGNIZED_FAILURE.to_owned(),
                code: ErrorCode::AuthenticationFailed,
            }
        );
    }
}
