#[cfg(any(target_os = "ios", target_os = "macos"))]
pub mod apple;
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub use apple::*;

#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub use android::*;

#[cfg(target_os = "windows")]
pub mod windows;
#[cfg(target_os = "windows")]
pub use windows::*;

#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows"
)))]
pub mod stub {
    //! Fallback for platforms without a biometric authentication service.

    use crate::BiometryError;
    use crate::code::ErrorCode;
    use crate::probe::{BiometryType, Probe, ProbeFault};
    use crate::prompt::{self, PromptFailure, PromptSpec};

    const UNSUPPORTED: &str = "biometric authentication is not supported on this platform";

    pub(crate) fn probe() -> Probe {
        Probe {
            available: false,
            kind: BiometryType::None,
            fault: Some(ProbeFault {
                code: Some(ErrorCode::BiometryNotAvailable),
                description: UNSUPPORTED.to_owned(),
                detail: None,
            }),
            face_disclosure_declared: true,
        }
    }

    #[allow(clippy::unused_async)]
    pub(crate) async fn evaluate(_spec: PromptSpec) -> Result<(), BiometryError> {
        Err(prompt::rejection(PromptFailure {
            recognized: true,
            code: None,
            description: Some(UNSUPPORTED.to_owned()),
        }))
    }
}
#[cfg(not(any(
    target_os = "ios",
    target_os = "macos",
    target_os = "android",
    target_os = "windows"
)))]
pub use stub::*;
