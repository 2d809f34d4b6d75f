//! Configuration types for the WS-Addressing validator.

use crate::error::WsaError;
use crate::exchange::Operation;
use serde::{Deserialize, Serialize};

/// Main configuration for the WS-Addressing validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WsaConfig {
    /// Config version
    pub version: String,

    /// General settings
    pub settings: SettingsConfig,

    /// Which optional WS-A assertions are active
    pub assertions: WsaAssertionConfig,

    /// Operations that exchanges can be validated against
    pub operations: Vec<Operation>,
}

impl Default for WsaConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            settings: SettingsConfig::default(),
            assertions: WsaAssertionConfig::default(),
            operations: Vec::new(),
        }
    }
}

impl WsaConfig {
    /// Parse a YAML configuration document.
    pub fn from_yaml(content: &str) -> Result<Self, WsaError> {
        serde_yaml::from_str(content).map_err(|e| WsaError::Config(e.to_string()))
    }

    /// Look up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Action on failure: "block" or "allow"
    pub fail_action: FailAction,
}

/// Failure action when violations are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailAction {
    /// Report the failure and exit non-zero
    #[default]
    Block,
    /// Report the failure only (log only)
    Allow,
}

/// Toggles for the optional WS-Addressing assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WsaAssertionConfig {
    /// Require a non-empty Action (and, on responses, the default action)
    pub assert_action: bool,

    /// Require a non-empty To
    pub assert_to: bool,

    /// Require the response RelatesTo to match the request MessageID
    pub assert_relates_to: bool,

    /// Require request ReplyTo reference parameters to be echoed in the response
    pub assert_reply_to_ref_params: bool,

    /// Require request FaultTo reference parameters to be echoed in the response
    pub assert_fault_to_ref_params: bool,
}

impl Default for WsaAssertionConfig {
    fn default() -> Self {
        Self {
            assert_action: true,
            assert_to: false,
            assert_relates_to: false,
            assert_reply_to_ref_params: false,
            assert_fault_to_ref_params: false,
        }
    }
}

/// SOAP versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoapVersion {
    /// SOAP 1.1 (namespace: http://schemas.xmlsoap.org/soap/envelope/)
    #[default]
    #[serde(rename = "1.1")]
    Soap11,
    /// SOAP 1.2 (namespace: http://www.w3.org/2003/05/soap-envelope)
    #[serde(rename = "1.2")]
    Soap12,
}
