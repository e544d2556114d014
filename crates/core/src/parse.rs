//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! forum pages and querying them with CSS selectors.
//!
//! Text is read the way a browser would render it inline: whitespace runs
//! collapse to a single space, block boundaries and `<br>` count as
//! whitespace, and the result is trimmed. The `select_*` helpers follow
//! "selection" semantics: a miss is an empty string or `None`, never an error.
//!
//! # Example
//!
//! ```rust
//! use bandbbs_core::parse::Document;
//!
//! let html = r#"
//!     <div class="node-stats"><span>12</span><span>340</span></div>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.select_text("div.node-stats span").unwrap(), "12 340");
//! assert_eq!(doc.select_last("div.node-stats span").unwrap().unwrap().text(), "340");
//! ```

use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::{BbsError, Result};

/// Tags whose boundaries separate words when text is flattened.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Represents a parsed HTML document.
///
/// `Document` is not `Send`: parse it after the last `.await` of a task and
/// drop it before the next one.
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from any malformed markup, so this never fails in
    /// practice; the `Result` keeps the signature uniform with the fetchers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bandbbs_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h2>General</h2></body></html>").unwrap();
    /// assert_eq!(doc.select_text("h2").unwrap(), "General");
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: None })
    }

    /// Parses HTML and remembers the URL the page was loaded from.
    pub fn parse_with_base(html: &str, base_url: Url) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// Gets the URL the document was loaded from, if known.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`BbsError::HtmlParseError`] if the selector is invalid.
    /// A valid selector that matches nothing yields an empty vec.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// Text of every match joined by a single space; `""` when nothing matches.
    pub fn select_text(&self, selector: &str) -> Result<String> {
        Ok(join_texts(&self.select(selector)?))
    }

    /// Value of `attr` on the first match carrying it; `""` when none does.
    pub fn select_attr(&self, selector: &str, attr: &str) -> Result<String> {
        Ok(first_attr(&self.select(selector)?, attr))
    }

    /// First element in document order matching the selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(Element::new))
    }

    /// Last element in document order matching the selector.
    pub fn select_last(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).last().map(Element::new))
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html.select(&selector).next().map(normalized_text)
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        normalized_text(self.html.root_element())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use bandbbs_core::parse::Document;
///
/// let html = r#"<a class="avatar"><img src="data/avatars/s/1.jpg"></a>"#;
/// let doc = Document::parse(html).unwrap();
/// let img = doc.select_first("a.avatar img").unwrap().unwrap();
///
/// assert_eq!(img.attr("src"), Some("data/avatars/s/1.jpg"));
/// assert_eq!(img.parent().unwrap().tag_name(), "a");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Gets the whitespace-normalized text content of this element.
    pub fn text(&self) -> String {
        normalized_text(self.element)
    }

    /// Gets the value of an attribute, `None` if absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Nearest enclosing element, `None` at the document root.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::new)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`BbsError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }

    /// Text of every matching descendant joined by a single space.
    pub fn select_text(&self, selector: &str) -> Result<String> {
        Ok(join_texts(&self.select(selector)?))
    }

    /// Value of `attr` on the first matching descendant carrying it.
    pub fn select_attr(&self, selector: &str, attr: &str) -> Result<String> {
        Ok(first_attr(&self.select(selector)?, attr))
    }

    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).next().map(Element::new))
    }

    pub fn select_last(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).last().map(Element::new))
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| BbsError::HtmlParseError(format!("Invalid selector: {}", e)))
}

pub(crate) fn join_texts(elements: &[Element<'_>]) -> String {
    let mut joined = String::new();
    for element in elements {
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(&element.text());
    }
    joined
}

fn first_attr(elements: &[Element<'_>], attr: &str) -> String {
    elements
        .iter()
        .find_map(|el| el.attr(attr))
        .map(str::to_string)
        .unwrap_or_default()
}

fn normalized_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Text(text) => raw.push_str(text),
                Node::Element(el) if el.name() == "br" || BLOCK_TAGS.contains(&el.name()) => raw.push(' '),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value()
                    && BLOCK_TAGS.contains(&el.name())
                {
                    raw.push(' ');
                }
            }
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
