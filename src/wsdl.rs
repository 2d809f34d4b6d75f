//! WSDL-derived WS-Addressing lookups.
//!
//! Default action URIs follow the WS-Addressing WSDL binding: an explicit
//! `wsaw:Action` wins, otherwise the action is built from the target
//! namespace, port type and message name.

use crate::exchange::{Mep, Operation};
use crate::parser::Element;
use crate::version::AddressingVersion;

/// Default WS-A action of an operation's input (`is_response = false`) or
/// output message.
pub fn default_action(operation: &Operation, is_response: bool) -> String {
    let explicit = if is_response {
        operation.output_action.as_deref()
    } else {
        operation.input_action.as_deref()
    };
    if let Some(action) = explicit.filter(|a| !a.trim().is_empty()) {
        return action.trim().to_string();
    }

    let delimiter = if operation.target_namespace.starts_with("urn:") {
        ':'
    } else {
        '/'
    };

    let message_name = if is_response {
        operation
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{}Response", operation.name))
    } else {
        match (&operation.input_name, operation.mep) {
            (Some(name), _) => name.clone(),
            (None, Mep::RequestResponse) => format!("{}Request", operation.name),
            (None, Mep::OneWay) => operation.name.clone(),
        }
    };

    let mut action = operation.target_namespace.clone();
    if !action.is_empty() && !action.ends_with(delimiter) {
        action.push(delimiter);
    }
    action.push_str(&operation.port_type);
    action.push(delimiter);
    action.push_str(&message_name);
    action
}

/// `MessageID` of the request, read from its already-parsed header.
pub fn request_message_id(
    request_header: Option<&Element>,
    version: AddressingVersion,
) -> Option<&str> {
    request_header?
        .first_child_ns(version.namespace(), "MessageID")
        .map(Element::text)
        .filter(|id| !id.is_empty())
}

/// Reference parameters of the request's `ReplyTo`.
pub fn reply_to_ref_params(request_header: &Element, version: AddressingVersion) -> Vec<&Element> {
    endpoint_ref_params(request_header, version, "ReplyTo")
}

/// Reference parameters of the request's `FaultTo`.
pub fn fault_to_ref_params(request_header: &Element, version: AddressingVersion) -> Vec<&Element> {
    endpoint_ref_params(request_header, version, "FaultTo")
}

/// Reference parameters carried by an endpoint reference header entry.
///
/// The 2004/08 submission also carries `ReferenceProperties`, which are
/// echoed the same way.
fn endpoint_ref_params<'a>(
    header: &'a Element,
    version: AddressingVersion,
    endpoint: &str,
) -> Vec<&'a Element> {
    let ns = version.namespace();
    let Some(epr) = header.first_child_ns(ns, endpoint) else {
        return Vec::new();
    };

    let containers: &[&str] = match version {
        AddressingVersion::V200508 => &["ReferenceParameters"],
        AddressingVersion::V200408 => &["ReferenceParameters", "ReferenceProperties"],
    };

    containers
        .iter()
        .filter_map(|name| epr.first_child_ns(ns, name))
        .flat_map(|container| container.children.iter())
        .collect()
}
