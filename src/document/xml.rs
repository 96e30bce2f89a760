use crate::document::charset::{self, declare_utf8_xml};
use crate::document::{Document, DocumentError, Element, Flavor, Node};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parses a well-formed XML document into a [`Document`]
///
/// Unlike [`parse_html`](crate::document::parse_html) this is strict:
/// mismatched or unclosed tags, undefined entities and documents without a
/// root element are errors, so callers can fall back to the lenient parser.
pub fn parse_xml(bytes: &[u8]) -> Result<Document, DocumentError> {
    parse_xml_with_content_type(bytes, None)
}

/// Parses an XML response body, honoring the charset of its Content-Type
///
/// The declaration's `encoding`, if any, is changed to UTF-8 to match the
/// decoded tree.
pub fn parse_xml_with_content_type(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<Document, DocumentError> {
    let text = charset::decode(bytes, content_type);
    let mut reader = Reader::from_str(&text);

    let mut open: Vec<Element> = Vec::new();
    let mut top: Vec<Node> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| DocumentError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        let node = match event {
            Event::Start(start) => {
                open.push(element_from(&start, &reader)?);
                continue;
            }
            Event::End(_) => match open.pop() {
                Some(element) => Node::Element(element),
                None => {
                    return Err(DocumentError::Xml {
                        position: reader.buffer_position() as u64,
                        message: "unexpected closing tag".to_string(),
                    })
                }
            },
            Event::Empty(start) => Node::Element(element_from(&start, &reader)?),
            Event::Text(text) => {
                let unescaped = text.unescape().map_err(|e| DocumentError::Xml {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                Node::Text(unescaped.into_owned())
            }
            Event::CData(data) => Node::CData(lossy(&data)),
            Event::Comment(comment) => Node::Comment(lossy(&comment)),
            Event::Decl(decl) => Node::ProcessingInstruction(declare_utf8_xml(&lossy(&decl))),
            Event::PI(pi) => Node::ProcessingInstruction(lossy(&pi)),
            Event::DocType(doctype) => Node::Doctype(lossy(&doctype).trim().to_owned()),
            Event::Eof => break,
        };

        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => top.push(node),
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(DocumentError::Unclosed(unclosed.name().to_owned()));
    }

    if !top.iter().any(|node| matches!(node, Node::Element(_))) {
        return Err(DocumentError::NoRoot);
    }

    Ok(Document::new(Flavor::Xml, top))
}

fn element_from(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, DocumentError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let value = attr.unescape_value().map_err(|e| DocumentError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        element.set_attr(&String::from_utf8_lossy(attr.key.as_ref()), value.into_owned());
    }

    Ok(element)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
