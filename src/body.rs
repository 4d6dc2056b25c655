//! Request body validation against a stub's expected body.
//!
//! Plain bodies are compared byte for byte. XML bodies are parsed and compared
//! structurally: element names, nesting, attributes and text content must be
//! identical, while attribute order, indentation and comments are ignored.

use std::collections::BTreeMap;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::{error, warn};

/// How an expected body is compared with the request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyKind {
    /// Exact string equality.
    #[default]
    Text,
    /// Structural XML equality.
    Xml,
}

/// Expected request body configured on a content stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedBody {
    pub kind: BodyKind,
    pub value: String,
}

impl ExpectedBody {
    /// Create a new expected body.
    ///
    /// # Parameters
    ///
    /// - `kind` - Comparison mode
    /// - `value` - Expected body text
    ///
    /// # Returns
    ///
    /// Returns a new `ExpectedBody` instance.
    pub fn new(kind: BodyKind, value: impl Into<String>) -> Self {
        Self { kind, value: value.into() }
    }

    /// Check whether the request body satisfies this expectation.
    ///
    /// Malformed XML on either side never matches.
    pub fn matches(&self, actual: &str) -> bool {
        match self.kind {
            BodyKind::Text => self.value == actual,
            BodyKind::Xml => match (parse_xml(&self.value), parse_xml(actual)) {
                (Ok(expected), Ok(actual)) => expected == actual,
                _ => false,
            },
        }
    }
}

/// Validate a request body, logging a diagnostic on mismatch.
///
/// # Parameters
///
/// - `expected` - Expected body, if the stub configures one
/// - `actual` - Raw request body
///
/// # Returns
///
/// Returns `true` when no body is expected or the body matches.
pub fn validate(expected: Option<&ExpectedBody>, actual: &str) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    warn!("expected request bodies are deprecated, read the body from the stats routes instead");

    if expected.matches(actual) {
        return true;
    }

    match expected.kind {
        BodyKind::Xml => error!(
            "body comparison (XML) failed: the request body {actual:?} does not match the expected one {:?}",
            expected.value
        ),
        BodyKind::Text => error!(
            "body comparison failed: the request body {actual:?} does not match the expected one {:?}",
            expected.value
        ),
    }
    false
}

/// Errors raised while parsing an XML body.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("xml attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("unbalanced element nesting")]
    Unbalanced,
    #[error("document has no root element")]
    NoRoot,
}

/// Parsed XML node, normalized for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
enum XmlNode {
    Element { name: String, attributes: BTreeMap<String, String>, children: Vec<XmlNode> },
    Text(String),
}

impl XmlNode {
    fn element(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut attributes = BTreeMap::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            attributes.insert(key, attribute.unescape_value()?.into_owned());
        }
        Ok(Self::Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        })
    }
}

/// Append a node to the innermost open element, or to the document level.
fn attach(stack: &mut [XmlNode], roots: &mut Vec<XmlNode>, node: XmlNode) {
    let siblings = match stack.last_mut() {
        Some(XmlNode::Element { children, .. }) => children,
        _ => roots,
    };
    // Adjacent text and CDATA sections form one text node.
    if let (Some(XmlNode::Text(previous)), XmlNode::Text(text)) = (siblings.last_mut(), &node) {
        previous.push_str(text);
        return;
    }
    siblings.push(node);
}

/// Parse an XML document into its top-level nodes.
fn parse_xml(input: &str) -> Result<Vec<XmlNode>, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut roots = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(XmlNode::element(&start)?),
            Event::Empty(start) => {
                let node = XmlNode::element(&start)?;
                attach(&mut stack, &mut roots, node);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(XmlError::Unbalanced)?;
                attach(&mut stack, &mut roots, node);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                let text = text.trim();
                if !text.is_empty() {
                    attach(&mut stack, &mut roots, XmlNode::Text(text.to_owned()));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).trim().to_owned();
                if !text.is_empty() {
                    attach(&mut stack, &mut roots, XmlNode::Text(text));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no content.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Unbalanced);
    }
    if !roots.iter().any(|node| matches!(node, XmlNode::Element { .. })) {
        return Err(XmlError::NoRoot);
    }
    Ok(roots)
}
