//! HTML parsing and structural queries.
//!
//! This module provides the [`Document`] and [`Element`] types the extractor
//! queries with CSS selectors. Both are thin wrappers over `scraper` that turn
//! selector syntax errors into [`FetchError::HtmlParseError`].
//!
//! # Example
//!
//! ```rust
//! use replytree_core::parse::Document;
//!
//! let html = r#"
//!     <div class="cell item">
//!         <span class="item_title"><a href="/t/1">Hello</a></span>
//!     </div>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let cards = doc.select(".cell.item").unwrap();
//! assert_eq!(cards.len(), 1);
//! ```

use scraper::{Html, Selector};
use url::Url;

use crate::{FetchError, Result};

/// Parses a CSS selector, mapping syntax errors to [`FetchError::HtmlParseError`].
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| FetchError::HtmlParseError(format!("Invalid selector '{}': {}", selector, e)))
}

/// Represents a parsed HTML document.
///
/// A Document owns the parsed tree and, when known, the URL it was fetched
/// from.
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// HTML parsing is error-tolerant: malformed markup still yields a tree.
    ///
    /// # Example
    ///
    /// ```rust
    /// use replytree_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>").unwrap();
    /// assert_eq!(doc.select("h1").unwrap()[0].text(), "Title");
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: None })
    }

    /// Parses HTML and records the URL the document came from.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `url` is not an absolute URL.
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let base_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// Gets the URL the document was fetched from, if known.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects all elements matching a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .ok()
            .flatten()
            .map(|el| el.text().trim().to_string())
    }
}

/// A single element in a parsed [`Document`].
///
/// # Example
///
/// ```rust
/// use replytree_core::parse::Document;
///
/// let html = r#"<div id="r_42"><a href="/member/alice">alice</a></div>"#;
/// let doc = Document::parse(html).unwrap();
/// let cell = &doc.select("div[id^='r_']").unwrap()[0];
///
/// assert_eq!(cell.id(), Some("r_42"));
/// assert_eq!(cell.select("a").unwrap()[0].attr("href"), Some("/member/alice"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, or `None` when absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the `id` attribute.
    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching a CSS selector.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }
}
