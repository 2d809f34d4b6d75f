//! Error types for the WS-Addressing validator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that stop a validation pass before any rule can run.
///
/// Conformance problems are never reported through this type; they are
/// accumulated as [`Violation`]s in a validation report.
#[derive(Error, Debug)]
pub enum WsaError {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("Invalid SOAP envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Message exchange has no response content")]
    MissingResponse,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<quick_xml::Error> for WsaError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e.to_string())
    }
}

/// Violation codes for WS-Addressing conformance failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationCode {
    /// No WS-Addressing namespace bound in the message
    WsaNotEnabled,
    /// Response uses a different WS-Addressing namespace than the request
    VersionMismatch,
    /// Mandatory addressing property absent
    MissingProperty,
    /// Addressing property present without text
    EmptyProperty,
    /// Response Action differs from the operation's default action
    ActionMismatch,
    /// Response RelatesTo differs from the request MessageID
    RelatesToMismatch,
    /// Anonymous address used where the operation prohibits it
    AnonymousProhibited,
    /// Non-anonymous address used where the operation requires anonymous
    AnonymousRequired,
    /// Request reference parameter not echoed in the response
    MissingReferenceParameter,
}

impl ViolationCode {
    /// Get the string code for this violation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WsaNotEnabled => "WSA_NOT_ENABLED",
            Self::VersionMismatch => "VERSION_MISMATCH",
            Self::MissingProperty => "MISSING_PROPERTY",
            Self::EmptyProperty => "EMPTY_PROPERTY",
            Self::ActionMismatch => "ACTION_MISMATCH",
            Self::RelatesToMismatch => "RELATES_TO_MISMATCH",
            Self::AnonymousProhibited => "ANONYMOUS_PROHIBITED",
            Self::AnonymousRequired => "ANONYMOUS_REQUIRED",
            Self::MissingReferenceParameter => "MISSING_REFERENCE_PARAMETER",
        }
    }
}

/// A conformance violation found in a WS-Addressing header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation code
    pub code: ViolationCode,
    /// Human-readable message
    pub message: String,
    /// Addressing property or reference parameter the violation is about
    pub location: Option<String>,
}

impl Violation {
    /// Create a new violation.
    pub fn new(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Create a violation with location.
    pub fn with_location(
        code: ViolationCode,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            location: Some(location.into()),
        }
    }
}

/// Aggregate failure of one validation pass.
///
/// The message is every violation text of the pass, in rule order, joined by
/// a single space.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
    pub violations: Vec<Violation>,
}
