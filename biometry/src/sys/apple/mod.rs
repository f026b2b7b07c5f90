//! Apple platform (iOS/macOS) biometry implementation using swift-bridge.
//!
//! The Swift helper owns the `LAContext`: a fresh context per call, the
//! reuse grace window zeroed before every evaluation, and the
//! `NSFaceIDUsageDescription` lookup against the app's Info.plist relayed
//! through the probe snapshot. Payloads cross the bridge as JSON strings.

use log::warn;
use serde::Deserialize;

use crate::BiometryError;
use crate::code::ErrorCode;
use crate::probe::{BiometryType, Probe, ProbeFault};
use crate::prompt::{self, PromptFailure, PromptSpec};

#[swift_bridge::bridge]
mod ffi {
    extern "Rust" {
        type PromptCallback;
        fn on_success(self);
        fn on_failure(self, payload_json: String);
    }

    extern "Swift" {
        // Snapshot JSON: {available, kind, faceDisclosureDeclared,
        // errorCode?, errorDescription?, errorReason?}
        #[swift_bridge(rust_name = "biometry_probe")]
        fn biometry_probe() -> String;

        // Failure payload JSON: {recognized, code?, description?}
        #[swift_bridge(rust_name = "biometry_evaluate")]
        fn biometry_evaluate(spec_json: String, callback: PromptCallback);
    }
}

/// Receives the single completion callback of a prompt evaluation.
pub struct PromptCallback {
    sender: tokio::sync::oneshot::Sender<Result<(), BiometryError>>,
}

impl PromptCallback {
    fn on_success(self) {
        let _ = self.sender.send(Ok(()));
    }

    fn on_failure(self, payload_json: String) {
        let failure = serde_json::from_str::<PromptFailure>(&payload_json).unwrap_or_else(|err| {
            warn!("malformed prompt failure payload: {err}");
            PromptFailure::default()
        });
        let _ = self.sender.send(Err(prompt::rejection(failure)));
    }
}

impl std::fmt::Debug for PromptCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCallback").finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbePayload {
    available: bool,
    kind: u8,
    face_disclosure_declared: bool,
    error_code: Option<i64>,
    error_description: Option<String>,
    error_reason: Option<String>,
}

/// Query `LAContext` capability on Apple platforms.
pub(crate) fn probe() -> Probe {
    let payload = ffi::biometry_probe();
    match serde_json::from_str::<ProbePayload>(&payload) {
        Ok(snapshot) => Probe {
            available: snapshot.available,
            kind: BiometryType::from_raw(snapshot.kind),
            fault: snapshot.error_description.map(|description| ProbeFault {
                code: snapshot.error_code.map(ErrorCode::from_raw),
                description,
                detail: snapshot.error_reason,
            }),
            face_disclosure_declared: snapshot.face_disclosure_declared,
        },
        Err(err) => {
            warn!("malformed probe payload: {err}");
            Probe {
                available: false,
                kind: BiometryType::None,
                fault: Some(ProbeFault {
                    code: None,
                    description: format!("malformed probe payload: {err}"),
                    detail: None,
                }),
                face_disclosure_declared: true,
            }
        }
    }
}

/// Run one prompt evaluation on Apple platforms.
///
/// # Errors
/// Returns [`BiometryError::Prompt`] for prompt failures, or
/// [`BiometryError::Platform`] if the callback channel is dropped.
pub(crate) async fn evaluate(spec: PromptSpec) -> Result<(), BiometryError> {
    let spec_json = serde_json::to_string(&spec)
        .map_err(|err| BiometryError::Platform(format!("failed to serialize prompt spec: {err}")))?;

    let (tx, rx) = tokio::sync::oneshot::channel();
    ffi::biometry_evaluate(spec_json, PromptCallback { sender: tx });

    rx.await
        .unwrap_or_else(|_| Err(BiometryError::Platform("prompt callback dropped".to_owned())))
}
