//! CiNii OpenSearch Atom response parsing.
//!
//! The payload is read with quick-xml's namespace-aware reader into a small
//! element tree, and fields are then looked up by (namespace URI, local
//! name). Prefixes in the document are irrelevant; only the URIs matter.
//!
//! Lookups follow child-path semantics: entries and counters are direct
//! children of the root, entry fields are direct children of the entry, and
//! author names sit one level further down under `atom:author`. A missing
//! node is never an error; only a document that is not well-formed is.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use thiserror::Error;

use super::error::CiniiError;
use super::models::{Article, ArticleSearchResult};

/// Atom: feed, entry, title, link, author, summary.
pub const NS_ATOM: &str = "http://www.w3.org/2005/Atom";
/// OpenSearch: pagination counters.
pub const NS_OPENSEARCH: &str = "http://a9.com/-/spec/opensearch/1.1/";
/// PRISM: bibliographic fields.
pub const NS_PRISM: &str = "http://prismstandard.org/namespaces/basic/2.1/";
/// CiNii vendor namespace: `crid`.
pub const NS_CINII: &str = "http://ci.nii.ac.jp/ns/1.0/";

/// Reasons a payload is rejected as malformed.
#[derive(Debug, Error)]
enum MalformedXml {
    #[error("{0}")]
    Reader(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("undeclared namespace prefix '{0}'")]
    UnknownPrefix(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("content after the root element")]
    TrailingContent,

    #[error("end tag without a matching start tag")]
    UnmatchedEnd,

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

/// A parsed XML element. `text` is the character data before the first
/// child element.
#[derive(Debug, Default)]
struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn open(resolved: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self, MalformedXml> {
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(MalformedXml::UnknownPrefix(
                    String::from_utf8_lossy(&prefix).into_owned(),
                ));
            }
        };

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            namespace,
            local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    fn append_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |c| c.is(namespace, local_name))
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    fn child_text(&self, namespace: &str, local_name: &str) -> Option<String> {
        self.child(namespace, local_name)
            .and_then(Element::text)
            .map(str::to_string)
    }

    /// Unprefixed attribute value.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Read a whole document into an element tree.
fn read_document(xml: &[u8]) -> Result<Element, MalformedXml> {
    let mut reader = NsReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(MalformedXml::TrailingContent);
                }
                stack.push(Element::open(resolved, &start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(MalformedXml::TrailingContent);
                }
                let element = Element::open(resolved, &start)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(MalformedXml::UnmatchedEnd)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.append_text(&text),
                    None if text.trim().is_empty() => {}
                    None if root.is_some() => return Err(MalformedXml::TrailingContent),
                    None => return Err(MalformedXml::NoRoot),
                }
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                let text = String::from_utf8_lossy(&raw);
                match stack.last_mut() {
                    Some(current) => current.append_text(&text),
                    None if root.is_some() => return Err(MalformedXml::TrailingContent),
                    None => return Err(MalformedXml::NoRoot),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(MalformedXml::Unclosed(open.local_name.clone()));
    }

    root.ok_or(MalformedXml::NoRoot)
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), MalformedXml> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(MalformedXml::TrailingContent),
        None => *root = Some(element),
    }
    Ok(())
}

/// Parse a CiNii OpenSearch Atom payload.
///
/// Fails only when the payload is not well-formed XML; the failure carries
/// the reader's reason for logging, but displays as a fixed message.
pub fn parse_search_response(xml: &[u8]) -> Result<ArticleSearchResult, CiniiError> {
    let root = read_document(xml).map_err(|e| CiniiError::parse(e.to_string()))?;

    Ok(ArticleSearchResult {
        articles: root
            .children_named(NS_ATOM, "entry")
            .map(parse_article)
            .collect(),
        total_results: counter(&root, "totalResults"),
        start_index: counter(&root, "startIndex"),
        items_per_page: counter(&root, "itemsPerPage"),
    })
}

fn parse_article(entry: &Element) -> Article {
    let authors: Vec<&str> = entry
        .children_named(NS_ATOM, "author")
        .flat_map(|author| author.children_named(NS_ATOM, "name"))
        .filter_map(Element::text)
        .collect();

    let link = entry
        .child(NS_ATOM, "link")
        .and_then(|l| l.attribute("href"))
        .map(str::to_string);

    let publication_year = entry
        .child_text(NS_PRISM, "publicationDate")
        .and_then(|date| date.split('-').next().map(str::to_string));

    Article {
        title: entry.child_text(NS_ATOM, "title"),
        link,
        author: (!authors.is_empty()).then(|| authors.join(", ")),
        journal: entry.child_text(NS_PRISM, "publicationName"),
        volume: entry.child_text(NS_PRISM, "volume"),
        issue: entry.child_text(NS_PRISM, "number"),
        page_start: entry.child_text(NS_PRISM, "startingPage"),
        page_end: entry.child_text(NS_PRISM, "endingPage"),
        publication_year,
        description: entry.child_text(NS_ATOM, "summary"),
        crid: entry.child_text(NS_CINII, "crid"),
    }
}

/// OpenSearch counter; 0 unless the text is purely ASCII digits.
fn counter(root: &Element, local_name: &str) -> u64 {
    root.child_text(NS_OPENSEARCH, local_name)
        .filter(|v| v.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
