//! Parsed-document abstraction.
//!
//! XML and JSON inputs are converted into one owned uniform node tree so
//! that extraction and mapping never care which wire format the document
//! arrived in. Namespace URIs and prefixes are discarded at parse time;
//! all searches match on local name only.

use recordrelay_types::FlowError;

use crate::config::DocumentFormat;

/// Synthetic name of the tree root for JSON documents.
const JSON_ROOT_NAME: &str = "document";
/// Synthetic name of unnamed JSON array items at the document root.
const JSON_ITEM_NAME: &str = "item";

/// One node of the uniform document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocNode {
    name: String,
    text: String,
    children: Vec<DocNode>,
}

impl DocNode {
    fn new(name: impl Into<String>, text: impl Into<String>, children: Vec<DocNode>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            children,
        }
    }

    /// Local name of the node (tag name or JSON field name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed direct text content. Empty for container nodes.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[DocNode] {
        &self.children
    }

    /// All nodes named `name`, anywhere beneath (and including) this node,
    /// in document order. Deterministic: re-walking the same tree yields
    /// the same sequence.
    #[must_use]
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a DocNode> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a DocNode>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect_named(name, out);
        }
    }

    /// Resolve a slash-separated path of direct-child steps, first match
    /// per step. Returns `None` when any step is absent.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> Option<&DocNode> {
        let mut node = self;
        for step in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.iter().find(|c| c.name == step)?;
        }
        Some(node)
    }
}

/// A parsed inbound document, immutable for the duration of one run.
#[derive(Debug, Clone)]
pub struct Document {
    root: DocNode,
}

impl Document {
    /// Parse an inbound document string.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptyInput`] when the input is blank or cannot
    /// be parsed in the declared format.
    pub fn parse(input: &str, format: DocumentFormat) -> Result<Self, FlowError> {
        if input.trim().is_empty() {
            return Err(FlowError::EmptyInput("document is blank".to_string()));
        }
        let root = match format {
            DocumentFormat::Xml => parse_xml(input)?,
            DocumentFormat::Json => parse_json(input)?,
        };
        Ok(Self { root })
    }

    /// Root of the uniform node tree.
    #[must_use]
    pub fn root(&self) -> &DocNode {
        &self.root
    }
}

fn parse_xml(input: &str) -> Result<DocNode, FlowError> {
    let doc = roxmltree::Document::parse(input)
        .map_err(|e| FlowError::EmptyInput(format!("invalid XML: {e}")))?;
    Ok(convert_xml_node(doc.root_element()))
}

fn convert_xml_node(node: roxmltree::Node<'_, '_>) -> DocNode {
    let text: String = node
        .children()
        .filter_map(|c| if c.is_text() { c.text() } else { None })
        .collect::<String>()
        .trim()
        .to_string();
    let children = node
        .children()
        .filter(roxmltree::Node::is_element)
        .map(convert_xml_node)
        .collect();
    // tag_name().name() is the local name; the namespace URI is dropped here
    DocNode::new(node.tag_name().name(), text, children)
}

fn parse_json(input: &str) -> Result<DocNode, FlowError> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| FlowError::EmptyInput(format!("invalid JSON: {e}")))?;
    let children = convert_json_value(JSON_ITEM_NAME, &value);
    // A root object becomes the root node directly; arrays and scalars get
    // a synthetic root so the tree always has exactly one root.
    match children.as_slice() {
        [only] if value.is_object() => Ok(DocNode::new(
            JSON_ROOT_NAME,
            only.text.clone(),
            only.children.clone(),
        )),
        _ => Ok(DocNode::new(JSON_ROOT_NAME, "", children)),
    }
}

/// Convert one JSON value into zero or more nodes named `name`.
/// Arrays flatten into repeated sibling nodes sharing the field name.
fn convert_json_value(name: &str, value: &serde_json::Value) -> Vec<DocNode> {
    match value {
        serde_json::Value::Object(map) => {
            let children = map
                .iter()
                .flat_map(|(k, v)| convert_json_value(k, v))
                .collect();
            vec![DocNode::new(name, "", children)]
        }
        serde_json::Value::Array(items) => items
            .iter()
            .flat_map(|item| convert_json_value(name, item))
            .collect(),
        serde_json::Value::String(s) => vec![DocNode::new(name, s.clone(), Vec::new())],
        serde_json::Value::Bool(b) => vec![DocNode::new(name, b.to_string(), Vec::new())],
        serde_json::Value::Number(n) => vec![DocNode::new(name, n.to_string(), Vec::new())],
        serde_json::Value::Null => vec![DocNode::new(name, "", Vec::new())],
    }
}
