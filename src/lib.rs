//! WS-Addressing validator for Zentinel
//!
//! Checks that the WS-Addressing headers of a SOAP request and its response
//! conform to WS-Addressing 1.0 (2005/08) or the 2004/08 member submission as
//! bound to WSDL 1.1 operations.
//!
//! # Features
//!
//! - Addressing namespace detection (header first, envelope fallback)
//! - Mandatory property checks per direction and message exchange pattern
//! - Per-operation anonymous address policy (prohibited / required / optional)
//! - RelatesTo and reference parameter correlation between request and response
//! - All violations of a pass collected into one report
//!
//! # Example
//!
//! ```ignore
//! use zentinel_wsa::{MessageExchange, Operation, Mep, WsaAssertionConfig, WsaValidator};
//!
//! let operation = Operation::new("GetQuote", Mep::RequestResponse);
//! let exchange = MessageExchange::new(&operation, &request).with_response(&response);
//! let validator = WsaValidator::new(WsaAssertionConfig::default());
//!
//! validator.validate_request(&exchange)?.into_result()?;
//! validator.validate_response(&exchange)?.into_result()?;
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod parser;
pub mod validator;
pub mod version;
pub mod wsdl;

pub use config::{SoapVersion, WsaAssertionConfig, WsaConfig};
pub use error::{AssertionFailure, Violation, ViolationCode, WsaError};
pub use exchange::{AnonymousPolicy, MessageExchange, Mep, Operation};
pub use validator::{ValidationReport, WsaValidator};
pub use version::{detect_version, resolve_version, AddressingVersion};
