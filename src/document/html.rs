use crate::document::charset::{self, charset_param, is_utf8_label};
use crate::document::{Document, Element, Flavor, Node};
use ego_tree::NodeRef;
use scraper::{Html, Node as HtmlNode};

/// Parses HTML into a [`Document`]
///
/// Parsing never fails: html5ever recovers from malformed markup the way a
/// browser does, adding implied `html`/`head`/`body` elements. The encoding
/// is taken from a byte order mark or an in-document declaration.
///
/// # Example
///
/// ```
/// use site_mirror::document::parse_html;
///
/// let document = parse_html(b"<p><img src=logo.png>");
/// assert!(document.elements().iter().any(|e| e.attr("src") == Some("logo.png")));
/// ```
pub fn parse_html(bytes: &[u8]) -> Document {
    parse_html_with_content_type(bytes, None)
}

/// Parses an HTML response body, honoring the charset of its Content-Type
///
/// The tree holds decoded text, so any `<meta>` charset declaration naming
/// another encoding is changed to `utf-8` to match the serialized output.
pub fn parse_html_with_content_type(bytes: &[u8], content_type: Option<&str>) -> Document {
    let text = charset::decode(bytes, content_type);
    let html = Html::parse_document(&text);

    let children = html.tree.root().children().filter_map(convert).collect();
    let mut document = Document::new(Flavor::Html, children);
    declare_utf8(&mut document);
    document
}

fn convert(node: NodeRef<'_, HtmlNode>) -> Option<Node> {
    match node.value() {
        HtmlNode::Element(source) => {
            let mut element = Element::new(source.name());
            // Foreign attributes such as xlink:href keep their prefix
            for (name, value) in source.attrs.iter() {
                let qualified = match &name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, name.local),
                    None => name.local.to_string(),
                };
                element.set_attr(&qualified, &**value);
            }
            element.children = node.children().filter_map(convert).collect();
            Some(Node::Element(element))
        }
        HtmlNode::Text(text) => Some(Node::Text((**text).to_owned())),
        HtmlNode::Comment(comment) => Some(Node::Comment((**comment).to_owned())),
        HtmlNode::Doctype(doctype) => Some(Node::Doctype(doctype_contents(
            doctype.name(),
            doctype.public_id(),
            doctype.system_id(),
        ))),
        HtmlNode::ProcessingInstruction(pi) => Some(Node::ProcessingInstruction(format!(
            "{} {}",
            &*pi.target,
            &**pi
        ))),
        HtmlNode::Document | HtmlNode::Fragment => None,
    }
}

fn declare_utf8(document: &mut Document) {
    document.for_each_element_mut(|element| {
        if element.name() != "meta" {
            return;
        }

        let stale_charset = element.attr("charset").map(|label| !is_utf8_label(label));
        if stale_charset == Some(true) {
            element.set_attr("charset", "utf-8");
            return;
        }

        let is_content_type = element
            .attr("http-equiv")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("content-type"));
        let stale_content = element
            .attr("content")
            .and_then(charset_param)
            .is_some_and(|label| !is_utf8_label(label));
        if is_content_type && stale_content {
            element.set_attr("content", "text/html; charset=utf-8");
        }
    });
}

fn doctype_contents(name: &str, public_id: &str, system_id: &str) -> String {
    let mut contents = name.to_owned();
    if !public_id.is_empty() {
        contents.push_str(&format!(" PUBLIC \"{}\"", public_id));
        if !system_id.is_empty() {
            contents.push_str(&format!(" \"{}\"", system_id));
        }
    } else if !system_id.is_empty() {
        contents.push_str(&format!(" SYSTEM \"{}\"", system_id));
    }
    contents
}
