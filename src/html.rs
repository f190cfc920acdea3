//! Tag lookup over parsed HTML.
//!
//! Every report walks pages with the same two primitives: [`find_tag`] for
//! the first element matching a [`TagQuery`], and [`find_all`] for every
//! match. Both search the descendants of a root element depth-first, in
//! document order. The root itself is never a candidate.
//!
//! ```ignore
//! let doc = Html::parse_document(body);
//! let main = find_tag(doc.root_element(), &TagQuery::new("section").attr_eq("id", "what-s-new-in-python"))?;
//! let items = find_all(main, &TagQuery::new("li").attr_eq("class", "toctree-l1"));
//! ```

use std::fmt;

use regex::Regex;
use scraper::ElementRef;

use crate::error::{AppError, Result};
use crate::utils::truncate_for_log;

/// How much of the searched subtree goes into a not-found error.
const CONTEXT_PREVIEW_BYTES: usize = 120;

/// Predicate over a single attribute value.
#[derive(Debug, Clone)]
pub enum AttrFilter {
    /// Value equals the literal. For `class`, any one class token may match.
    Equals(String),
    /// Value contains the substring.
    Contains(String),
    /// Value matches the pattern anywhere (unanchored search).
    Matches(Regex),
}

impl AttrFilter {
    pub fn matches(&self, attr_name: &str, value: &str) -> bool {
        match self {
            AttrFilter::Equals(expected) if attr_name == "class" => {
                value == expected || value.split_whitespace().any(|token| token == expected)
            }
            AttrFilter::Equals(expected) => value == expected,
            AttrFilter::Contains(needle) => value.contains(needle.as_str()),
            AttrFilter::Matches(pattern) => pattern.is_match(value),
        }
    }
}

impl fmt::Display for AttrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrFilter::Equals(v) => write!(f, "={v}"),
            AttrFilter::Contains(v) => write!(f, "*={v}"),
            AttrFilter::Matches(re) => write!(f, "~=/{}/", re.as_str()),
        }
    }
}

/// A tag name plus an optional attribute filter.
#[derive(Debug, Clone)]
pub struct TagQuery {
    pub tag: String,
    pub attr: Option<(String, AttrFilter)>,
}

impl TagQuery {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attr: None,
        }
    }

    pub fn attr_eq(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_attr(name, AttrFilter::Equals(value.into()))
    }

    pub fn attr_contains(self, name: impl Into<String>, needle: impl Into<String>) -> Self {
        self.with_attr(name, AttrFilter::Contains(needle.into()))
    }

    pub fn attr_matches(self, name: impl Into<String>, pattern: Regex) -> Self {
        self.with_attr(name, AttrFilter::Matches(pattern))
    }

    fn with_attr(mut self, name: impl Into<String>, filter: AttrFilter) -> Self {
        self.attr = Some((name.into(), filter));
        self
    }

    /// Structural match of a single element.
    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();
        if !el.name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        match &self.attr {
            None => true,
            Some((name, filter)) => el
                .attr(name)
                .is_some_and(|value| filter.matches(name, value)),
        }
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attr {
            None => write!(f, "{}", self.tag),
            Some((name, filter)) => write!(f, "{}[{}{}]", self.tag, name, filter),
        }
    }
}

/// Descendants of `root` in document order, excluding `root`.
fn descendant_elements<'a>(root: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// First descendant of `root` matching `query`.
///
/// # Arguments
///
/// * `root` - element whose subtree is searched; `root` itself is never a match
/// * `query` - tag name plus attribute filters
///
/// # Returns
///
/// The first match in document order.
///
/// # Errors
///
/// [`AppError::TagNotFound`] naming the query and the opening of the
/// searched subtree.
pub fn find_tag<'a>(root: ElementRef<'a>, query: &TagQuery) -> Result<ElementRef<'a>> {
    descendant_elements(root)
        .find(|el| query.matches(el))
        .ok_or_else(|| AppError::TagNotFound {
            query: query.to_string(),
            context: truncate_for_log(&root.html(), CONTEXT_PREVIEW_BYTES),
        })
}

/// Every descendant of `root` matching `query`, in document order.
pub fn find_all<'a>(root: ElementRef<'a>, query: &TagQuery) -> Vec<ElementRef<'a>> {
    descendant_elements(root).filter(|el| query.matches(el)).collect()
}

/// Concatenated text of an element and all its descendants.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Value of `name` on `element`, or a not-found error for `query`.
pub fn require_attr<'a>(element: ElementRef<'a>, name: &str) -> Result<&'a str> {
    element.value().attr(name).ok_or_else(|| AppError::TagNotFound {
        query: format!("{}[{}]", element.value().name(), name),
        context: truncate_for_log(&element.html(), CONTEXT_PREVIEW_BYTES),
    })
}
