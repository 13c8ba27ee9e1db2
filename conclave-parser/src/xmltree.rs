//! A minimal in-memory XML element tree.
//!
//! Agent output embeds small, hand-authored XML fragments (tool
//! requests, plans, task lists). We don't need a streaming parser for
//! these — just enough of a tree to walk children by tag name the way
//! `ElementTree` does.

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

/// Errors from parsing an XML fragment into a tree.
#[derive(Debug, Error)]
pub enum XmlTreeError {
    /// The underlying XML tokenizer failed.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An end tag appeared with no matching open element.
    #[error("unmatched closing tag")]
    UnmatchedClose,

    /// The fragment contained no root element.
    #[error("no root element found")]
    EmptyFragment,
}

/// A parsed XML element: a tag, its direct text content, and children.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    /// The element's tag name.
    pub tag: String,
    /// Text immediately inside this element (not inside a child).
    pub text: Option<String>,
    /// Direct child elements, in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// The first direct child with this tag name.
    pub fn find(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with this tag name.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}

/// Parse a single well-formed XML fragment into a tree rooted at its
/// outermost element.
pub fn parse_fragment(xml: &str) -> Result<XmlElement, XmlTreeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Stack of (element-being-built) from outermost to innermost.
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push(XmlElement {
                    tag,
                    text: None,
                    children: Vec::new(),
                });
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let elem = XmlElement {
                    tag,
                    text: None,
                    children: Vec::new(),
                };
                push_finished(&mut stack, &mut root, elem);
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    let text = t.unescape()?.into_owned();
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        top.text = Some(match top.text.take() {
                            Some(existing) => format!("{existing}{trimmed}"),
                            None => trimmed.to_string(),
                        });
                    }
                }
            }
            Event::End(_) => {
                let finished = stack.pop().ok_or(XmlTreeError::UnmatchedClose)?;
                push_finished(&mut stack, &mut root, finished);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(XmlTreeError::EmptyFragment)
}

fn push_finished(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, elem: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => *root = Some(elem),
    }
}
