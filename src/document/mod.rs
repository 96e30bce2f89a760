//! Mutable markup documents
//!
//! Pages are parsed into a small owned tree so that reference attributes can
//! be rewritten in place and the result serialized back to disk:
//! - `charset` finds the source encoding; trees always hold decoded text
//! - `html` adapts the scraper/html5ever parse tree
//! - `xml` builds the tree from quick-xml events
//! - `serialize` turns the tree back into markup
//!
//! Extraction and rewriting never look at tag names directly; they go through
//! [`TagKind`], which knows which attributes of each tag carry references.

mod charset;
mod html;
mod serialize;
mod xml;

pub use html::{parse_html, parse_html_with_content_type};
pub use xml::{parse_xml, parse_xml_with_content_type};

use thiserror::Error;

/// Errors produced while building a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML syntax error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("Document has no root element")]
    NoRoot,
}

/// Which serializer rules apply to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Html,
    Xml,
}

/// A parsed markup document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    flavor: Flavor,
    children: Vec<Node>,
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Contents of a `<!DOCTYPE ...>` declaration
    Doctype(String),
    /// Contents between `<?` and `?>`, including XML declarations
    ProcessingInstruction(String),
    CData(String),
}

/// An element with ordered attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Attributes whose value is a whitespace-separated list of tokens
const MULTI_VALUED_ATTRIBUTES: &[&str] = &[
    "class",
    "rel",
    "rev",
    "accept-charset",
    "headers",
    "accesskey",
    "dropzone",
];

/// An attribute value, either a single string or an ordered token list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Single(String),
    List(Vec<String>),
}

impl AttrValue {
    /// Returns the value used as a reference: the string itself, or the
    /// first token of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()).filter(|v| !v.is_empty()),
            Self::List(values) => values.first().map(String::as_str),
        }
    }

    /// Returns the value flattened into one string
    pub fn joined(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::List(values) => values.join(" "),
        }
    }
}

/// Tags that carry references the mirror cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<link href>` (stylesheets, icons, ...)
    Link,
    /// `<script src>`
    Script,
    /// `<img src srcset>`
    Image,
    /// `<source srcset>`
    Source,
    /// `<a href>`
    Anchor,
}

impl TagKind {
    /// Classifies a tag name; namespace prefixes and case are ignored
    pub fn of(name: &str) -> Option<Self> {
        let local = name.rsplit(':').next().unwrap_or(name);
        match local.to_ascii_lowercase().as_str() {
            "link" => Some(Self::Link),
            "script" => Some(Self::Script),
            "img" => Some(Self::Image),
            "source" => Some(Self::Source),
            "a" => Some(Self::Anchor),
            _ => None,
        }
    }

    /// The attribute holding the tag's single reference, if any
    pub fn reference_attr(self) -> Option<&'static str> {
        match self {
            Self::Link | Self::Anchor => Some("href"),
            Self::Script | Self::Image => Some("src"),
            Self::Source => None,
        }
    }

    /// The attribute holding a responsive candidate list, if any
    pub fn candidate_list_attr(self) -> Option<&'static str> {
        match self {
            Self::Image | Self::Source => Some("srcset"),
            _ => None,
        }
    }

    /// Returns true if the tag references an asset rather than a page
    pub fn is_asset(self) -> bool {
        !matches!(self, Self::Anchor)
    }
}

/// One entry of a responsive candidate list (`url descriptor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub url: &'a str,
    pub descriptor: &'a str,
}

/// Splits a `srcset`-style value into its candidates
///
/// Entries are separated by commas; within an entry the URL is the first
/// whitespace-delimited token and the rest is the descriptor. Empty entries
/// are skipped.
///
/// # Examples
///
/// ```
/// use site_mirror::document::parse_candidate_list;
///
/// let candidates = parse_candidate_list("a.png 1x, b.png 2x");
/// assert_eq!(candidates[1].url, "b.png");
/// assert_eq!(candidates[1].descriptor, "2x");
/// ```
pub fn parse_candidate_list(value: &str) -> Vec<Candidate<'_>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(char::is_whitespace) {
            Some((url, descriptor)) => Candidate {
                url,
                descriptor: descriptor.trim(),
            },
            None => Candidate {
                url: entry,
                descriptor: "",
            },
        })
        .collect()
}

impl Document {
    pub fn new(flavor: Flavor, children: Vec<Node>) -> Self {
        Self { flavor, children }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns all elements in document order
    pub fn elements(&self) -> Vec<&Element> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Element>) {
            for node in nodes {
                if let Node::Element(element) = node {
                    out.push(element);
                    collect(&element.children, out);
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.children, &mut out);
        out
    }

    /// Calls `f` on every element in document order
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        fn visit(nodes: &mut [Node], f: &mut dyn FnMut(&mut Element)) {
            for node in nodes {
                if let Node::Element(element) = node {
                    f(element);
                    visit(&mut element.children, f);
                }
            }
        }

        visit(&mut self.children, &mut f);
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reference-bearing kind of this element, if any
    pub fn kind(&self) -> Option<TagKind> {
        TagKind::of(&self.name)
    }

    /// Iterates over attributes in document order
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the raw string value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an attribute as a single value or a token list
    pub fn attr_value(&self, name: &str) -> Option<AttrValue> {
        let raw = self.attr(name)?;
        if MULTI_VALUED_ATTRIBUTES
            .iter()
            .any(|multi| multi.eq_ignore_ascii_case(name))
        {
            Some(AttrValue::List(
                raw.split_whitespace().map(str::to_owned).collect(),
            ))
        } else {
            Some(AttrValue::Single(raw.to_owned()))
        }
    }

    /// Sets an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    /// Sets an attribute from a single value or token list
    pub fn set_attr_value(&mut self, name: &str, value: AttrValue) {
        self.set_attr(name, value.joined());
    }
}
