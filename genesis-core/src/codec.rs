//! XML encoding of sanitized trees and decoding of inbound documents.
//!
//! Encoding writes one element per field in insertion order, repeats the
//! element for every item of a [`FieldValue::List`] and never writes
//! attributes. Decoding accepts any well-formed document: the root element's
//! children become the fields of the returned [`FieldSet`].
//!
//! ```
//! use genesis_core::{codec, tree::SanitizedTree, types::FieldSet};
//!
//! let tree = SanitizedTree::build(
//!     FieldSet::new().with(
//!         "payment_transaction",
//!         FieldSet::new().with("transaction_type", "credit").with("amount", "5000"),
//!     ),
//! );
//!
//! let document = codec::encode(&tree);
//! assert_eq!(
//!     document.as_str(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
//!      <payment_transaction><transaction_type>credit</transaction_type><amount>5000</amount></payment_transaction>"
//! );
//!
//! let decoded = codec::decode(document.as_bytes()).unwrap();
//! assert_eq!(decoded.get_text("amount"), Some("5000"));
//! ```

use quick_xml::{Reader, escape::escape, events::Event};

use crate::{
    errors::{Error, Result},
    tree::SanitizedTree,
    types::{FieldSet, FieldValue, WireDocument},
};

/// Root element used when a tree does not consist of a single nested group.
pub const DEFAULT_ROOT: &str = "request";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Encodes `tree` into an XML document.
///
/// A tree whose only top-level entry is a nested group is written with that
/// entry as the root element, otherwise the entries are wrapped in
/// [`DEFAULT_ROOT`].
pub fn encode(tree: &SanitizedTree) -> WireDocument {
    let fields = tree.as_fields();
    let mut single = fields.iter();
    match (single.next(), single.next()) {
        (Some((root, FieldValue::Map(children))), None) => write_document(root, children),
        _ => write_document(DEFAULT_ROOT, fields),
    }
}

/// Encodes `tree` as the children of a `root` element.
pub fn encode_with_root(root: &str, tree: &SanitizedTree) -> WireDocument {
    write_document(root, tree.as_fields())
}

fn write_document(root: &str, children: &FieldSet) -> WireDocument {
    let mut out = String::from(XML_DECLARATION);
    write_group(&mut out, root, children);
    WireDocument(out)
}

fn write_group(out: &mut String, name: &str, children: &FieldSet) {
    open_tag(out, name);
    for (child, value) in children.iter() {
        write_value(out, child, value);
    }
    close_tag(out, name);
}

fn write_value(out: &mut String, name: &str, value: &FieldValue) {
    match value {
        FieldValue::Null => {
            open_tag(out, name);
            close_tag(out, name);
        }
        FieldValue::Text(text) => {
            open_tag(out, name);
            out.push_str(&escape(text.as_str()));
            close_tag(out, name);
        }
        FieldValue::List(items) => {
            for item in items {
                write_value(out, name, item);
            }
        }
        FieldValue::Map(children) => write_group(out, name, children),
    }
}

fn open_tag(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// An element still waiting for its closing tag.
struct OpenElement {
    name: String,
    text: String,
    children: FieldSet,
}

impl OpenElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: FieldSet::new(),
        }
    }

    fn into_value(self) -> FieldValue {
        if self.children.is_empty() {
            FieldValue::Text(self.text)
        } else {
            FieldValue::Map(self.children)
        }
    }
}

/// Decodes an XML document into the fields held by its root element.
///
/// Leaf text is kept exactly as written; whitespace between child elements
/// is dropped.
///
/// Fails with [`Error::Parse`] when `raw` is empty, not UTF-8 or not
/// well-formed. Nothing is checked against a schema; repeated sibling
/// elements become a [`FieldValue::List`] and attributes are ignored.
pub fn decode(raw: &[u8]) -> Result<FieldSet> {
    let text = std::str::from_utf8(raw)
        .map_err(|err| Error::Parse(format!("document is not valid UTF-8: {err}")))?;
    if text.trim().is_empty() {
        return Err(Error::Parse("document is empty".to_string()));
    }

    let mut reader = Reader::from_str(text);

    let mut open: Vec<OpenElement> = Vec::new();
    let mut root: Option<FieldSet> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            Error::Parse(format!(
                "malformed document at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                if open.is_empty() && root.is_some() {
                    return Err(Error::Parse("document has more than one root".to_string()));
                }
                open.push(OpenElement::new(element_name(start.name().as_ref())?));
            }
            Event::Empty(start) => {
                let element = OpenElement::new(element_name(start.name().as_ref())?);
                close_element(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected closing tag".to_string()))?;
                close_element(&mut open, &mut root, element)?;
            }
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|err| Error::Parse(format!("invalid text content: {err}")))?;
                push_text(&mut open, &content)?;
            }
            Event::CData(content) => {
                let content = content.into_inner();
                let content = std::str::from_utf8(&content)
                    .map_err(|err| Error::Parse(format!("invalid CDATA content: {err}")))?;
                push_text(&mut open, content)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Error::Parse(format!(
            "element <{}> is never closed",
            unclosed.name
        )));
    }

    root.ok_or_else(|| Error::Parse("document has no root element".to_string()))
}

fn element_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| Error::Parse(format!("invalid element name: {err}")))
}

fn push_text(open: &mut [OpenElement], content: &str) -> Result<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err(Error::Parse("text found outside the root element".to_string())),
    }
}

fn close_element(
    open: &mut [OpenElement],
    root: &mut Option<FieldSet>,
    element: OpenElement,
) -> Result<()> {
    match open.last_mut() {
        Some(parent) => {
            let name = element.name.clone();
            attach(&mut parent.children, name, element.into_value());
            Ok(())
        }
        None if root.is_some() => Err(Error::Parse("document has more than one root".to_string())),
        None => {
            *root = Some(element.children);
            Ok(())
        }
    }
}

/// Stores a decoded child, turning repeated names into a list.
fn attach(children: &mut FieldSet, name: String, value: FieldValue) {
    if children.get(&name).is_some() {
        children.append(name, value);
    } else {
        children.insert(name, value);
    }
}
