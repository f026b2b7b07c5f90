//! Platform capability snapshots and their assembly into [`Availability`].

use serde::{Serialize, Serializer};

use crate::code::{self, ErrorCode};

/// Diagnostic reported when the device supports face recognition but the
/// required usage-disclosure string is absent from the app configuration.
pub const FACE_DISCLOSURE_MISSING: &str = "device supports face recognition, but the usage-disclosure string is missing from the app configuration";

/// The kind of biometric sensor a device exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometryType {
    /// No biometric sensor.
    None,
    /// Fingerprint authentication (`TouchID`, Android fingerprint, etc.)
    Fingerprint,
    /// Facial recognition (`FaceID`, Android face unlock)
    Face,
    /// Iris scanning
    Iris,
}

impl BiometryType {
    /// The numeric wire value for this kind.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Fingerprint => 1,
            Self::Face => 2,
            Self::Iris => 3,
        }
    }

    /// Decode a platform-reported kind, treating unknown values as none.
    #[must_use]
    pub const fn from_raw(kind: u8) -> Self {
        match kind {
            1 => Self::Fingerprint,
            2 => Self::Face,
            3 => Self::Iris,
            _ => Self::None,
        }
    }
}

impl Serialize for BiometryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Result of a biometric availability check.
///
/// Built fresh on every call to [`crate::check_biometry`]; never cached,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Whether a biometric evaluation can be attempted right now.
    pub is_available: bool,
    /// The sensor kind the device reports, populated even when unavailable.
    pub biometry_type: BiometryType,
    /// The sensor kinds as a sequence, for multi-modal devices.
    pub biometry_types: Vec<BiometryType>,
    /// Developer-facing diagnostic; empty when available.
    pub reason: String,
    /// Stable error token; `None` serializes as the empty token.
    #[serde(serialize_with = "code::serialize_optional")]
    pub code: Option<ErrorCode>,
}

/// Snapshot of the platform capability query, as produced by a backend.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    /// Whether the platform can evaluate device-owner biometrics.
    pub available: bool,
    /// The sensor kind the platform reports.
    pub kind: BiometryType,
    /// The platform error attached to a negative query.
    pub fault: Option<ProbeFault>,
    /// Whether the face-recognition usage disclosure is declared in the app
    /// configuration. Platforms without that precondition report `true`.
    pub face_disclosure_declared: bool,
}

/// Platform error attached to a negative capability query.
#[derive(Debug, Clone)]
pub(crate) struct ProbeFault {
    /// Token the backend mapped the platform error to, if it could.
    pub code: Option<ErrorCode>,
    /// The platform's localized description.
    pub description: String,
    /// The platform's failure-reason text, when it provides one.
    pub detail: Option<String>,
}

impl Availability {
    /// Assemble the check result from a platform snapshot.
    ///
    /// A device that is hardware-capable of face recognition but lacks the
    /// usage disclosure is reported unavailable with a specific diagnostic,
    /// not as a generic platform error: the platform accepts the evaluation
    /// request at query time and only fails once the prompt is shown.
    pub(crate) fn from_probe(probe: Probe) -> Self {
        let biometry_types = match probe.kind {
            BiometryType::None => Vec::new(),
            kind => vec![kind],
        };

        if probe.available && probe.kind == BiometryType::Face && !probe.face_disclosure_declared {
            return Self {
                is_available: false,
                biometry_type: probe.kind,
                biometry_types,
                reason: FACE_DISCLOSURE_MISSING.to_owned(),
                code: Some(ErrorCode::BiometryNotAvailable),
            };
        }

        if probe.available {
            return Self {
                is_available: true,
                biometry_type: probe.kind,
                biometry_types,
                reason: String::new(),
                code: None,
            };
        }

        let (reason, fault_code) = match probe.fault {
            Some(fault) => {
                let reason = match fault.detail {
                    Some(detail) => format!("{}: {detail}", fault.description),
                    None => fault.description,
                };
                (reason, fault.code)
            }
            None => (String::new(), None),
        };

        Self {
            is_available: false,
            biometry_type: probe.kind,
            biometry_types,
            reason,
            code: Some(fault_code.unwrap_or(ErrorCode::BiometryNotAvailable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{Availability, BiometryType, ErrorCode, FACE_DISCLOSURE_MISSING, Probe, ProbeFault};

    fn capable(kind: BiometryType, disclosure: bool) -> Probe {
        Probe {
            available: true,
            kind,
            fault: None,
            face_disclosure_declared: disclosure,
        }
    }

    fn faulted(kind: BiometryType, fault: Option<ProbeFault>) -> Probe {
        Probe {
            available: false,
            kind,
            fault,
            face_disclosure_declared: true,
        }
    }

    #[rstest]
    #[case(0, BiometryType::None)]
    #[case(1, BiometryType::Fingerprint)]
    #[case(2, BiometryType::Face)]
    #[case(3, BiometryType::Iris)]
    #[case(9, BiometryType::None)]
    #[case(255, BiometryType::None)]
    fn decodes_platform_kinds(#[case] raw: u8, #[case] expected: BiometryType) {
        assert_eq!(BiometryType::from_raw(raw), expected);
    }

    #[test]
    fn available_fingerprint_is_clear() {
        let availability = Availability::from_probe(capable(BiometryType::Fingerprint, true));
        assert!(availability.is_available);
        assert_eq!(availability.biometry_type, BiometryType::Fingerprint);
        assert_eq!(availability.biometry_types, [BiometryType::Fingerprint]);
        assert_eq!(availability.reason, "");
        assert_eq!(availability.code, None);
    }

    #[test]
    fn fingerprint_ignores_disclosure_configuration() {
        let availability = Availability::from_probe(capable(BiometryType::Fingerprint, false));
        assert!(availability.is_available);
        assert_eq!(availability.reason, "");
        assert_eq!(availability.code, None);
    }

    #[test]
    fn missing_face_disclosure_overrides_available() {
        let availability = Availability::from_probe(capable(BiometryType::Face, false));
        assert!(!availability.is_available);
        assert_eq!(availability.reason, FACE_DISCLOSURE_MISSING);
        assert_eq!(availability.code, Some(ErrorCode::BiometryNotAvailable));
        assert_eq!(availability.biometry_type, BiometryType::Face);
        assert_eq!(availability.biometry_types, [BiometryType::Face]);
    }

    #[test]
    fn declared_face_disclosure_is_available() {
        let availability = Availability::from_probe(capable(BiometryType::Face, true));
        assert!(availability.is_available);
        assert_eq!(availability.code, None);
    }

    #[test]
    fn fault_reason_concatenates_detail() {
        let availability = Availability::from_probe(faulted(
            BiometryType::Face,
            Some(ProbeFault {
                code: Some(ErrorCode::BiometryLockout),
                description: "Biometry is locked out.".to_owned(),
                detail: Some("Too many failed attempts.".to_owned()),
            }),
        ));
        assert!(!availability.is_available);
        assert_eq!(
            availability.reason,
            "Biometry is locked out.: Too many failed attempts."
        );
        assert_eq!(availability.code, Some(ErrorCode::BiometryLockout));
    }

    #[test]
    fn fault_reason_without_detail_has_no_separator() {
        let availability = Availability::from_probe(faulted(
            BiometryType::Fingerprint,
            Some(ProbeFault {
                code: Some(ErrorCode::PasscodeNotSet),
                description: "Passcode not set.".to_owned(),
                detail: None,
            }),
        ));
        assert_eq!(availability.reason, "Passcode not set.");
        assert_eq!(availability.code, Some(ErrorCode::PasscodeNotSet));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(ProbeFault {
        code: None,
        description: "mystery failure".to_owned(),
        detail: None,
    }))]
    fn unavailable_always_carries_a_defined_token(#[case] fault: Option<ProbeFault>) {
        let availability = Availability::from_probe(faulted(BiometryType::None, fault));
        assert_eq!(availability.code, Some(ErrorCode::BiometryNotAvailable));
    }

    #[test]
    fn sensor_kind_is_reported_even_when_unavailable() {
        let availability = Availability::from_probe(faulted(
            BiometryType::Face,
            Some(ProbeFault {
                code: Some(ErrorCode::BiometryNotEnrolled),
                description: "No identities are enrolled.".to_owned(),
                detail: None,
            }),
        ));
        assert_eq!(availability.biometry_type, BiometryType::Face);
        assert_eq!(availability.biometry_types, [BiometryType::Face]);
    }

    #[test]
    fn no_sensor_yields_an_empty_sequence() {
        let availability = Availability::from_probe(faulted(BiometryType::None, None));
        assert_eq!(availability.biometry_type, BiometryType::None);
        assert!(availability.biometry_types.is_empty());
    }

    #[test]
    fn serializes_to_the_shell_contract() {
        let clear = Availability::from_probe(capable(BiometryType::Face, true));
        assert_eq!(
            serde_json::to_value(clear).unwrap(),
            json!({
                "isAvailable": true,
                "biometryType": 2,
                "biometryTypes": [2],
                "reason": "",
                "code": "",
            })
        );

        let unavailable = Availability::from_probe(faulted(
            BiometryType::None,
            Some(ProbeFault {
                code: Some(ErrorCode::BiometryNotEnrolled),
                description: "No identities are enrolled.".to_owned(),
                detail: None,
            }),
        ));
        assert_eq!(
            serde_json::to_value(unavailable).unwrap(),
            json!({
                "isAvailable": false,
                "biometryType": 0,
                "biometryTypes": [],
                "reason": "No identities are enrolled.",
                "code": "biometryNotEnrolled",
            })
        );
    }
}
