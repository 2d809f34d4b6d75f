//! Message exchange and WSDL operation model.

use crate::config::SoapVersion;
use crate::error::WsaError;
use serde::{Deserialize, Serialize};

/// WSDL 1.1 message exchange pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mep {
    OneWay,
    #[default]
    RequestResponse,
}

/// Per-operation policy on anonymous response endpoints (`wsaw:Anonymous`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnonymousPolicy {
    Prohibited,
    Required,
    #[default]
    Optional,
}

/// A WSDL operation as far as WS-Addressing validation needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    /// Operation name
    pub name: String,

    /// One-way or request-response
    pub mep: Mep,

    /// Anonymous address policy
    pub anonymous: AnonymousPolicy,

    /// SOAP version of the owning binding
    pub soap_version: SoapVersion,

    /// Target namespace of the WSDL definitions
    pub target_namespace: String,

    /// Port type (interface) the operation belongs to
    pub port_type: String,

    /// Input message name, if declared
    pub input_name: Option<String>,

    /// Output message name, if declared
    pub output_name: Option<String>,

    /// Explicit `wsaw:Action` on the input
    pub input_action: Option<String>,

    /// Explicit `wsaw:Action` on the output
    pub output_action: Option<String>,
}

impl Default for Operation {
    fn default() -> Self {
        Self {
            name: String::new(),
            mep: Mep::RequestResponse,
            anonymous: AnonymousPolicy::Optional,
            soap_version: SoapVersion::Soap11,
            target_namespace: String::new(),
            port_type: String::new(),
            input_name: None,
            output_name: None,
            input_action: None,
            output_action: None,
        }
    }
}

impl Operation {
    pub fn new(name: impl Into<String>, mep: Mep) -> Self {
        Self {
            name: name.into(),
            mep,
            ..Default::default()
        }
    }

    pub fn is_request_response(&self) -> bool {
        self.mep == Mep::RequestResponse
    }
}

/// Read-only view over one request/response pair of an operation invocation.
#[derive(Debug, Clone, Copy)]
pub struct MessageExchange<'a> {
    operation: &'a Operation,
    request: &'a str,
    response: Option<&'a str>,
}

impl<'a> MessageExchange<'a> {
    /// An exchange that has only sent its request so far.
    pub fn new(operation: &'a Operation, request: &'a str) -> Self {
        Self {
            operation,
            request,
            response: None,
        }
    }

    pub fn with_response(mut self, response: &'a str) -> Self {
        self.response = Some(response);
        self
    }

    pub fn operation(&self) -> &'a Operation {
        self.operation
    }

    pub fn request_content(&self) -> &'a str {
        self.request
    }

    pub fn response_content(&self) -> Result<&'a str, WsaError> {
        self.response.ok_or(WsaError::MissingResponse)
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}
