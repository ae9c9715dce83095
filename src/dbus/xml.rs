//! Introspection XML schema.
//!
//! Parses the `org.freedesktop.DBus.Introspectable` document format into a
//! fixed set of types. Only the parts the walker reads are modelled: child
//! `<node>`s, `<interface>`s, and their `<method>`/`<signal>`/`<property>`
//! members. Anything else (annotations, comments, text, unknown elements) is
//! dropped while parsing.
//!
//! Missing attributes default to the empty string rather than failing.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors from parsing introspection XML.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended inside <{0}>")]
    Unclosed(String),

    #[error("content after the document element")]
    TrailingContent,
}

/// A `<node>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    /// The `name` attribute. Absent on most root nodes.
    pub name: Option<String>,
    /// Child nodes and interfaces in document order.
    pub children: Vec<NodeChild>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeChild {
    Node(Node),
    Interface(Interface),
}

/// An `<interface>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interface {
    pub name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Method(Method),
    Signal(String),
    Property(String),
}

/// A `<method>` element and its `<arg>`s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Method {
    pub name: String,
    pub args: Vec<Arg>,
}

/// A method `<arg>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arg {
    pub name: String,
    pub direction: String,
    pub ty: String,
}

impl Node {
    /// Parse an introspection document.
    ///
    /// The document element is treated as the node whatever its tag is.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let root = parse_document(xml)?;
        Ok(Node::from_element(root))
    }

    /// Child nodes, in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            NodeChild::Node(node) => Some(node),
            NodeChild::Interface(_) => None,
        })
    }

    /// Interfaces declared directly on this node, in document order.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.children.iter().filter_map(|child| match child {
            NodeChild::Interface(iface) => Some(iface),
            NodeChild::Node(_) => None,
        })
    }

    fn from_element(element: Element) -> Self {
        let name = element.attribute("name").map(str::to_string);
        let children = element
            .children
            .into_iter()
            .filter_map(|child| match child.name.as_str() {
                "node" => Some(NodeChild::Node(Node::from_element(child))),
                "interface" => Some(NodeChild::Interface(Interface::from_element(child))),
                _ => None,
            })
            .collect();
        Node { name, children }
    }
}

impl Interface {
    fn from_element(element: Element) -> Self {
        let name = element.attribute_or_empty("name");
        let members = element
            .children
            .into_iter()
            .filter_map(|child| match child.name.as_str() {
                "method" => Some(Member::Method(Method::from_element(child))),
                "signal" => Some(Member::Signal(child.attribute_or_empty("name"))),
                "property" => Some(Member::Property(child.attribute_or_empty("name"))),
                _ => None,
            })
            .collect();
        Interface { name, members }
    }
}

impl Method {
    fn from_element(element: Element) -> Self {
        let name = element.attribute_or_empty("name");
        let args = element
            .children
            .iter()
            .filter(|child| child.name == "arg")
            .map(|arg| Arg {
                name: arg.attribute_or_empty("name"),
                direction: arg.attribute_or_empty("direction"),
                ty: arg.attribute_or_empty("type"),
            })
            .collect();
        Method { name, args }
    }
}

/// Untyped element tree, the intermediate form between events and schema.
#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn attribute_or_empty(&self, key: &str) -> String {
        self.attribute(key).unwrap_or_default().to_string()
    }
}

/// Build the element tree of the document element. Only comments,
/// processing instructions and whitespace may follow it.
fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<Element> = Vec::new();

    loop {
        let finished = match reader.read_event()? {
            Event::Start(start) => {
                open.push(Element::from_start(&start)?);
                None
            }
            Event::Empty(start) => Some(Element::from_start(&start)?),
            Event::End(_) => Some(open.pop().ok_or(XmlError::NoRoot)?),
            Event::Eof => {
                return Err(match open.pop() {
                    Some(element) => XmlError::Unclosed(element.name),
                    None => XmlError::NoRoot,
                });
            }
            _ => None,
        };

        if let Some(element) = finished {
            match open.last_mut() {
                Some(parent) => parent.children.push(element),
                None => {
                    expect_end(&mut reader)?;
                    return Ok(element);
                }
            }
        }
    }
}

fn expect_end(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(()),
            Event::Comment(_) | Event::PI(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            _ => return Err(XmlError::TrailingContent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTIFICATIONS: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <!-- desktop notifications -->
  <interface name="org.freedesktop.Notifications">
    <method name="GetCapabilities">
      <arg name="capabilities" type="as" direction="out"/>
    </method>
    <method name="CloseNotification">
      <arg name="id" type="u" direction="in"/>
    </method>
    <signal name="NotificationClosed">
      <arg name="id" type="u"/>
      <arg name="reason" type="u"/>
    </signal>
    <property name="Version" type="s" access="read">
      <annotation name="org.freedesktop.DBus.Property.EmitsChangedSignal" value="const"/>
    </property>
  </interface>
  <node name="child"/>
</node>"#;

    #[test]
    fn test_parse_interfaces_and_nodes() {
        let node = Node::parse(NOTIFICATIONS).unwrap();
        assert_eq!(node.name, None);

        let ifaces: Vec<_> = node.interfaces().collect();
        assert_eq!(ifaces.len(), 1);
        assert_eq!(ifaces[0].name, "org.freedesktop.Notifications");
        assert_eq!(ifaces[0].members.len(), 4);

        let nodes: Vec<_> = node.nodes().collect();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name.as_deref(), Some("child"));
    }

    #[test]
    fn test_parse_method_args_in_order() {
        let node = Node::parse(NOTIFICATIONS).unwrap();
        let iface = node.interfaces().next().unwrap();
        match &iface.members[0] {
            Member::Method(method) => {
                assert_eq!(method.name, "GetCapabilities");
                assert_eq!(
                    method.args,
                    vec![Arg {
                        name: "capabilities".into(),
                        direction: "out".into(),
                        ty: "as".into(),
                    }]
                );
            }
            other => panic!("expected method, got {:?}", other),
        }
        assert_eq!(
            iface.members[2],
            Member::Signal("NotificationClosed".into())
        );
        assert_eq!(iface.members[3], Member::Property("Version".into()));
    }

    #[test]
    fn test_missing_attributes_default_to_empty() {
        let node = Node::parse(
            r#"<node><interface name="org.X"><method name="M"><arg type="s"/></method></interface></node>"#,
        )
        .unwrap();
        let iface = node.interfaces().next().unwrap();
        let Member::Method(method) = &iface.members[0] else {
            panic!("expected method");
        };
        assert_eq!(method.args[0].name, "");
        assert_eq!(method.args[0].direction, "");
        assert_eq!(method.args[0].ty, "s");
    }

    #[test]
    fn test_unknown_top_level_elements_ignored() {
        let node = Node::parse(
            r#"<node><annotation name="a" value="b"/><frobnicate/><node name="x"/></node>"#,
        )
        .unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.interfaces().count(), 0);
    }

    #[test]
    fn test_escaped_attribute_values() {
        let node = Node::parse(r#"<node><interface name="a&amp;b"/></node>"#).unwrap();
        assert_eq!(node.interfaces().next().unwrap().name, "a&b");
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(matches!(Node::parse(""), Err(XmlError::NoRoot)));
        assert!(matches!(
            Node::parse("<!-- nothing -->"),
            Err(XmlError::NoRoot)
        ));
    }

    #[test]
    fn test_unclosed_document_is_error() {
        assert!(Node::parse("<node><interface name=\"x\">").is_err());
    }

    #[test]
    fn test_trailing_content_is_error() {
        assert!(matches!(
            Node::parse("<node/><junk>"),
            Err(XmlError::TrailingContent)
        ));
        assert!(matches!(
            Node::parse("<node></node><node/>"),
            Err(XmlError::TrailingContent)
        ));
        assert!(matches!(
            Node::parse("<node/>stray text"),
            Err(XmlError::TrailingContent)
        ));
    }

    #[test]
    fn test_comments_and_whitespace_after_root_allowed() {
        let node = Node::parse("<node><node name=\"a\"/></node>\n  <!-- end -->\n<?pi x?>\n").unwrap();
        assert_eq!(node.nodes().count(), 1);
    }

    #[test]
    fn test_mismatched_tags_are_error() {
        assert!(Node::parse("<node><interface></node>").is_err());
    }
}
