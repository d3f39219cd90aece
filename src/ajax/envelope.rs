//! `ajax-response` envelope parsing
//!
//! ```text
//! <ajax-response>
//!   <response type="object"  id="grid_updater"> ... </response>
//!   <response type="element" id="status_panel"> ... </response>
//! </ajax-response>
//! ```
//!
//! Parsed elements are copied out of the borrowed `roxmltree` document into
//! an owned tree so they can travel inside messages.

use std::fmt;

use super::RequestId;

/// Owned XML node
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// Owned XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let children = node
            .children()
            .filter_map(|child| {
                if child.is_element() {
                    Some(XmlNode::Element(XmlElement::from_node(child)))
                } else if child.is_text() {
                    child.text().map(|t| XmlNode::Text(t.to_string()))
                } else {
                    None
                }
            })
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            children,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// All descendant elements with the given tag name, in document order.
    /// Does not include `self`.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in self.child_elements() {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// First descendant element with the given tag name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Serialized children, used as replacement inner content
    pub fn inner_xml(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_node(child, &mut out);
        }
        out
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn write_node(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Text(t) => escape_into(t, false, out),
        XmlNode::Element(e) => write_element(e, out),
    }
}

fn write_element(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// The `type` attribute of a response element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// Delivered to a registered handler object
    Object,
    /// Replaces the inner content of a registered target
    Element,
    /// Anything else, including a missing attribute
    Unknown(String),
}

impl ResponseKind {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("object") => ResponseKind::Object,
            Some("element") => ResponseKind::Element,
            Some(other) => ResponseKind::Unknown(other.to_string()),
            None => ResponseKind::Unknown(String::new()),
        }
    }
}

/// One typed child of an `ajax-response` envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseElement {
    /// Request whose response carried this element
    pub request: RequestId,
    pub kind: ResponseKind,
    /// Lookup id of the handler or target
    pub id: Option<String>,
    pub element: XmlElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Body is not well-formed XML
    Xml(String),
    /// Body holds no `ajax-response` element
    MissingEnvelope,
    /// Body holds more than one `ajax-response` element
    MultipleEnvelopes(usize),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Xml(e) => write!(f, "malformed response XML: {}", e),
            EnvelopeError::MissingEnvelope => write!(f, "no ajax-response element"),
            EnvelopeError::MultipleEnvelopes(n) => {
                write!(f, "expected one ajax-response element, found {}", n)
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

pub const ENVELOPE_TAG: &str = "ajax-response";

/// Parse a response body into its typed elements
pub fn parse_envelope(
    body: &str,
    request: RequestId,
) -> Result<Vec<ResponseElement>, EnvelopeError> {
    let doc = roxmltree::Document::parse(body).map_err(|e| EnvelopeError::Xml(e.to_string()))?;

    let envelopes: Vec<roxmltree::Node<'_, '_>> = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == ENVELOPE_TAG)
        .collect();

    let envelope = match envelopes.as_slice() {
        [] => return Err(EnvelopeError::MissingEnvelope),
        [one] => *one,
        many => return Err(EnvelopeError::MultipleEnvelopes(many.len())),
    };

    Ok(envelope
        .children()
        .filter(|n| n.is_element())
        .map(|node| {
            let element = XmlElement::from_node(node);
            ResponseElement {
                request,
                kind: ResponseKind::parse(element.attribute("type")),
                id: element.attribute("id").map(str::to_string),
                element,
            }
        })
        .collect())
}
