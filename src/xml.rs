//! XML to JSON: parse into an attributed tree, then flatten it into a
//! key/value tree.
//!
//! Every child node is keyed by its node name. Text, CDATA and comment
//! children use the DOM names `#text`, `#cdata-section` and `#comment`, and
//! like any node without attributes or children they flatten to an empty
//! object; their content is not carried over.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{ConvertError, Result};

/// Key holding an element's attributes in the flattened tree
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// A parsed XML element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name as written (`prefix:local`)
    pub name: String,
    /// Attributes in declaration order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<XmlNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Any node that can sit under an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Instruction { target: String, content: String },
}

impl From<Element> for XmlNode {
    fn from(element: Element) -> Self {
        XmlNode::Element(element)
    }
}

impl XmlNode {
    /// The DOM node name this node is keyed by
    pub fn node_name(&self) -> &str {
        match self {
            XmlNode::Element(element) => &element.name,
            XmlNode::Text(_) => "#text",
            XmlNode::CData(_) => "#cdata-section",
            XmlNode::Comment(_) => "#comment",
            XmlNode::Instruction { target, .. } => target,
        }
    }
}

/// Parse XML text into its root element.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element_from(&e)?),
            Event::Empty(e) => {
                let element = element_from(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ConvertError::parse("XML", "unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => return Err(ConvertError::parse("XML", "text outside the root element")),
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    parent.children.push(XmlNode::CData(text));
                }
            }
            Event::Comment(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    parent.children.push(XmlNode::Comment(text));
                }
            }
            Event::PI(e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Instruction {
                        target: String::from_utf8_lossy(e.target()).into_owned(),
                        content: String::from_utf8_lossy(e.content()).trim().to_string(),
                    });
                }
            }
            Event::Eof => break,
            // Declarations and doctypes carry nothing for the tree
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::parse(
            "XML",
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or_else(|| ConvertError::parse("XML", "no root element"))
}

fn element_from(e: &BytesStart) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((name, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ConvertError::parse("XML", "more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

/// The flattened form of one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatNode {
    pub attributes: Vec<(String, String)>,
    /// One entry per distinct child name, in first-seen order
    pub children: Vec<(String, FlatValue)>,
}

/// Value under a child name: one child, or all same-named siblings in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlatValue {
    Single(FlatNode),
    Many(Vec<FlatNode>),
}

impl FlatValue {
    fn push(&mut self, node: FlatNode) {
        match self {
            FlatValue::Many(nodes) => nodes.push(node),
            FlatValue::Single(first) => {
                let first = std::mem::take(first);
                *self = FlatValue::Many(vec![first, node]);
            }
        }
    }
}

impl FlatNode {
    pub fn get(&self, name: &str) -> Option<&FlatValue> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// Flatten an element and all its descendants.
pub fn flatten(element: &Element) -> FlatNode {
    let mut flat = FlatNode {
        attributes: element.attributes.clone(),
        children: Vec::new(),
    };
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for child in &element.children {
        let node = match child {
            XmlNode::Element(child) => flatten(child),
            _ => FlatNode::default(),
        };
        let name = child.node_name();
        match seen.get(name) {
            Some(&index) => flat.children[index].1.push(node),
            None => {
                seen.insert(name, flat.children.len());
                flat.children
                    .push((name.to_string(), FlatValue::Single(node)));
            }
        }
    }

    flat
}

impl Serialize for FlatNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_attributes = !self.attributes.is_empty();
        let len = self.children.len() + usize::from(has_attributes);
        let mut map = serializer.serialize_map(Some(len))?;
        if has_attributes {
            map.serialize_entry(ATTRIBUTES_KEY, &Attributes(&self.attributes))?;
        }
        for (name, value) in &self.children {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct Attributes<'a>(&'a [(String, String)]);

impl Serialize for Attributes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Convert XML text to pretty-printed JSON.
pub fn xml_to_json(xml: &str) -> Result<String> {
    let root = parse(xml)?;
    let flat = flatten(&root);
    tracing::debug!(root = %root.name, keys = flat.children.len(), "flattened XML tree");
    Ok(serde_json::to_string_pretty(&flat)?)
}
