//! WS-Addressing namespace detection.

use crate::config::SoapVersion;
use crate::error::WsaError;
use crate::parser::{
    envelope_element, header_element, in_scope_prefix, parse_document, Document, Element,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// WS-Addressing 1.0 namespace.
pub const WSA_200508_NS: &str = "http://www.w3.org/2005/08/addressing";
/// WS-Addressing member submission namespace.
pub const WSA_200408_NS: &str = "http://schemas.xmlsoap.org/ws/2004/08/addressing";

/// Recognized WS-Addressing versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingVersion {
    #[serde(rename = "2005/08")]
    V200508,
    #[serde(rename = "2004/08")]
    V200408,
}

/// Classification of an endpoint address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Reply on the channel the request arrived on
    Anonymous,
    /// Do not send a reply
    None,
    /// An explicit endpoint
    Ordinary,
}

impl AddressingVersion {
    pub fn namespace(&self) -> &'static str {
        match self {
            AddressingVersion::V200508 => WSA_200508_NS,
            AddressingVersion::V200408 => WSA_200408_NS,
        }
    }

    /// Classify an address against this version's reserved URIs.
    pub fn address_kind(&self, address: &str) -> AddressKind {
        let Some(suffix) = address.strip_prefix(self.namespace()) else {
            return AddressKind::Ordinary;
        };
        match suffix {
            "/anonymous" | "/role/anonymous" => AddressKind::Anonymous,
            "/none" => AddressKind::None,
            _ => AddressKind::Ordinary,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Header,
    Envelope,
}

/// Lookup order: header before envelope, 2005/08 before 2004/08.
const PRECEDENCE: [(Scope, AddressingVersion); 4] = [
    (Scope::Header, AddressingVersion::V200508),
    (Scope::Header, AddressingVersion::V200408),
    (Scope::Envelope, AddressingVersion::V200508),
    (Scope::Envelope, AddressingVersion::V200408),
];

/// Determine which WS-Addressing namespace a parsed SOAP message uses.
///
/// Only namespaces bound to a prefix count. The header scope is every binding
/// in scope on the header element, so it includes the envelope's own
/// declarations; declarations made on header entries do not count.
///
/// Returns `Ok(None)` when the message has no header entries or no addressing
/// namespace is bound; whether that is acceptable is up to the caller.
pub fn resolve_version(
    doc: &Document,
    soap_version: SoapVersion,
) -> Result<Option<AddressingVersion>, WsaError> {
    let envelope = envelope_element(doc, soap_version)?;
    let Some(header) = header_element(doc, soap_version)?.filter(|h| h.has_child_elements())
    else {
        debug!("SOAP header absent or empty, no WS-A version");
        return Ok(None);
    };

    let found = PRECEDENCE.iter().find_map(|&(scope, version)| {
        bound_in_scope(scope, header, envelope, version.namespace()).then_some(version)
    });

    debug!(version = ?found, "Resolved WS-A version");
    Ok(found)
}

fn bound_in_scope(scope: Scope, header: &Element, envelope: &Element, uri: &str) -> bool {
    match scope {
        Scope::Header => in_scope_prefix(&[header, envelope], uri).is_some(),
        Scope::Envelope => in_scope_prefix(&[envelope], uri).is_some(),
    }
}

/// Parse raw message content and determine its WS-Addressing version.
pub fn detect_version(
    content: &str,
    soap_version: SoapVersion,
) -> Result<Option<AddressingVersion>, WsaError> {
    let doc = parse_document(content)?;
    resolve_version(&doc, soap_version)
}
