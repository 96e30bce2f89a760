use crate::document::{Document, Element, Flavor, Node};

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// HTML elements whose text content is written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "noscript",
];

impl Document {
    /// Serializes the document back to markup
    ///
    /// HTML documents follow the HTML serialization rules (void elements,
    /// raw-text elements); XML documents use self-closing empty elements.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(&mut out, node, self.flavor, false);
        }
        out
    }
}

fn write_node(out: &mut String, node: &Node, flavor: Flavor, raw_text: bool) {
    match node {
        Node::Element(element) => write_element(out, element, flavor),
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => escape_text(out, text, flavor),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
        Node::ProcessingInstruction(contents) => {
            out.push_str("<?");
            out.push_str(contents);
            out.push_str(match flavor {
                Flavor::Html => ">",
                Flavor::Xml => "?>",
            });
        }
        Node::CData(data) => match flavor {
            Flavor::Xml => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            Flavor::Html => escape_text(out, data, flavor),
        },
    }
}

fn write_element(out: &mut String, element: &Element, flavor: Flavor) {
    let name = element.name();

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_attr(out, value, flavor);
        out.push('"');
    }

    match flavor {
        Flavor::Html => {
            out.push('>');
            let lowered = name.to_ascii_lowercase();
            if VOID_ELEMENTS.contains(&lowered.as_str()) {
                return;
            }

            let raw_text = RAW_TEXT_ELEMENTS.contains(&lowered.as_str());
            for child in &element.children {
                write_node(out, child, flavor, raw_text);
            }
        }
        Flavor::Xml => {
            if element.children.is_empty() {
                out.push_str("/>");
                return;
            }

            out.push('>');
            for child in &element.children {
                write_node(out, child, flavor, false);
            }
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_text(out: &mut String, text: &str, flavor: Flavor) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' if flavor == Flavor::Html => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(out: &mut String, value: &str, flavor: Flavor) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' if flavor == Flavor::Xml => out.push_str("&lt;"),
            '\u{a0}' if flavor == Flavor::Html => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
