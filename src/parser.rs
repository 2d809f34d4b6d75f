//! SOAP XML parsing utilities.
//!
//! Builds a small namespace-aware element tree with quick-xml's `NsReader`.
//! quick-xml never expands external entities, and DOCTYPE declarations are
//! rejected outright.

use crate::config::SoapVersion;
use crate::error::WsaError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::borrow::Cow;

/// Deepest element nesting accepted by [`parse_document`].
pub const MAX_ELEMENT_DEPTH: usize = 128;

/// SOAP namespace URIs.
pub const SOAP_11_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP_12_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

impl SoapVersion {
    /// Envelope namespace URI for this SOAP version.
    pub fn envelope_namespace(&self) -> &'static str {
        match self {
            SoapVersion::Soap11 => SOAP_11_NS,
            SoapVersion::Soap12 => SOAP_12_NS,
        }
    }
}

/// A namespace declaration made on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Declared prefix, `None` for a default namespace (`xmlns="..."`)
    pub prefix: Option<String>,
    /// Namespace URI
    pub uri: String,
}

/// A parsed XML element.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Prefix as written in the document
    pub prefix: Option<String>,
    /// Element local name
    pub local_name: String,
    /// Resolved namespace URI
    pub namespace: Option<String>,
    /// Namespace declarations made on this element
    pub namespace_decls: Vec<NamespaceDecl>,
    /// Child elements, in document order
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    /// Concatenated character data directly inside this element, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn has_child_elements(&self) -> bool {
        !self.children.is_empty()
    }

    /// First child element with the given namespace and local name.
    pub fn first_child_ns(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.local_name == local_name && c.namespace.as_deref() == Some(namespace))
    }

    /// Child elements with the given local name, in any namespace.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local_name == local_name)
    }
}

/// Prefix bound to `uri` among the bindings in scope on an element.
///
/// `scope` lists the element first, then its ancestors outwards. A prefix
/// redeclared closer to the element shadows the outer binding.
pub fn in_scope_prefix<'a>(scope: &[&'a Element], uri: &str) -> Option<&'a str> {
    let mut shadowed: Vec<&str> = Vec::new();
    for &element in scope {
        for decl in &element.namespace_decls {
            let Some(prefix) = decl.prefix.as_deref() else {
                continue;
            };
            if shadowed.contains(&prefix) {
                continue;
            }
            if decl.uri == uri {
                return Some(prefix);
            }
            shadowed.push(prefix);
        }
    }
    None
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
}

/// Parse message content into an element tree.
///
/// Nesting deeper than [`MAX_ELEMENT_DEPTH`] is rejected as a parse error.
pub fn parse_document(xml: &str) -> Result<Document, WsaError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(ref e)) => {
                if stack.len() >= MAX_ELEMENT_DEPTH {
                    return Err(WsaError::XmlParse(format!(
                        "Element nesting exceeds maximum depth of {}",
                        MAX_ELEMENT_DEPTH
                    )));
                }
                stack.push(element_from_start(ns, e)?);
            }

            (ns, Event::Empty(ref e)) => {
                let element = element_from_start(ns, e)?;
                attach(&mut stack, &mut root, element)?;
            }

            (_, Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| WsaError::XmlParse("Unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }

            (_, Event::Text(ref e)) => {
                let text = e.unescape()?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                } else if !text.trim().is_empty() {
                    return Err(WsaError::XmlParse(
                        "Text content outside the root element".to_string(),
                    ));
                }
            }

            (_, Event::CData(ref e)) => {
                let text = std::str::from_utf8(e)
                    .map_err(|e| WsaError::XmlParse(format!("Invalid UTF-8: {}", e)))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }

            (_, Event::DocType(_)) => {
                return Err(WsaError::XmlParse(
                    "DOCTYPE declarations are not allowed".to_string(),
                ));
            }

            (_, Event::Eof) => break,

            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(WsaError::XmlParse(format!(
            "Unexpected end of document, {} element(s) left open",
            stack.len()
        )));
    }

    root.map(|root| Document { root })
        .ok_or_else(|| WsaError::XmlParse("Document has no root element".to_string()))
}

/// Attach a completed element to its parent, or make it the document root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), WsaError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(WsaError::XmlParse(
                "Document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn element_from_start(ns: ResolveResult<'_>, e: &BytesStart<'_>) -> Result<Element, WsaError> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(utf8(ns.as_ref())?.into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(WsaError::XmlParse(format!(
                "Unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let name = e.name();
    let prefix = match name.prefix() {
        Some(p) => Some(utf8(p.as_ref())?.into_owned()),
        None => None,
    };
    let local_name = utf8(e.local_name().as_ref())?.into_owned();

    let mut namespace_decls = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| WsaError::XmlParse(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let decl_prefix = if key == "xmlns" {
            None
        } else if let Some(p) = key.strip_prefix("xmlns:") {
            Some(p.to_string())
        } else {
            continue;
        };
        namespace_decls.push(NamespaceDecl {
            prefix: decl_prefix,
            uri: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(Element {
        prefix,
        local_name,
        namespace,
        namespace_decls,
        children: Vec::new(),
        text: String::new(),
    })
}

fn utf8(bytes: &[u8]) -> Result<Cow<'_, str>, WsaError> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| WsaError::XmlParse(format!("Invalid UTF-8: {}", e)))
}

/// Locate the SOAP Envelope for the given SOAP version.
pub fn envelope_element(doc: &Document, soap_version: SoapVersion) -> Result<&Element, WsaError> {
    let root = &doc.root;
    if root.local_name == "Envelope"
        && root.namespace.as_deref() == Some(soap_version.envelope_namespace())
    {
        Ok(root)
    } else {
        Err(WsaError::InvalidEnvelope(format!(
            "No SOAP {:?} Envelope found (root element is '{}')",
            soap_version, root.local_name
        )))
    }
}

/// Locate the SOAP Header, if the envelope has one.
pub fn header_element(
    doc: &Document,
    soap_version: SoapVersion,
) -> Result<Option<&Element>, WsaError> {
    let envelope = envelope_element(doc, soap_version)?;
    Ok(envelope.first_child_ns(soap_version.envelope_namespace(), "Header"))
}
