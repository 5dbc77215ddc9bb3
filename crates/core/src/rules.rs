//! Declarative selector rules for forum pages.
//!
//! Every field the extractor reads is described by a [`FieldRule`]: a CSS
//! selector plus an [`Extract`] step that turns the first matching element
//! into text. [`SiteRules::default`] describes the V2EX layout; a JSON file
//! can override any part of it.
//!
//! ```json
//! {
//!   "origin": "https://www.v2ex.com",
//!   "listing": {
//!     "activity_time": {
//!       "selector": ".topic_info",
//!       "extract": { "kind": "segment", "separator": "•", "index": 2 }
//!     }
//!   }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::validate_url;
use crate::parse::{Document, Element, compile_selector};
use crate::{FetchError, Result};

/// How a matched element becomes a field value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extract {
    /// Trimmed text content.
    #[default]
    Text,
    /// Trimmed attribute value.
    Attr { name: String },
    /// Attribute value when present and non-empty, otherwise text content.
    AttrOrText { name: String },
    /// One trimmed segment of the text split on `separator`.
    Segment { separator: String, index: usize },
}

impl Extract {
    /// Applies this step to a matched element.
    pub fn apply(&self, element: &Element<'_>) -> String {
        match self {
            Extract::Text => element.text().trim().to_string(),
            Extract::Attr { name } => element.attr(name).unwrap_or_default().trim().to_string(),
            Extract::AttrOrText { name } => match element.attr(name).map(str::trim) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => element.text().trim().to_string(),
            },
            Extract::Segment { separator, index } => split_segment(&element.text(), separator, *index),
        }
    }
}

/// Returns the trimmed `index`-th segment of `text`, or an empty string when
/// there are not enough segments.
pub fn split_segment(text: &str, separator: &str, index: usize) -> String {
    text.split(separator)
        .nth(index)
        .map(|segment| segment.trim().to_string())
        .unwrap_or_default()
}

/// Where to find one field and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub selector: String,
    #[serde(default)]
    pub extract: Extract,
    /// Value used when no element matches or the extracted value is empty.
    #[serde(default)]
    pub fallback: String,
}

impl FieldRule {
    /// A rule reading trimmed text.
    pub fn text(selector: &str) -> Self {
        Self { selector: selector.to_string(), extract: Extract::Text, fallback: String::new() }
    }

    /// A rule reading an attribute.
    pub fn attr(selector: &str, name: &str) -> Self {
        Self { selector: selector.to_string(), extract: Extract::Attr { name: name.to_string() }, fallback: String::new() }
    }

    /// A rule reading an attribute, falling back to the element's text.
    pub fn attr_or_text(selector: &str, name: &str) -> Self {
        Self {
            selector: selector.to_string(),
            extract: Extract::AttrOrText { name: name.to_string() },
            fallback: String::new(),
        }
    }

    /// A rule reading one separator-delimited segment of the text.
    pub fn segment(selector: &str, separator: &str, index: usize) -> Self {
        Self {
            selector: selector.to_string(),
            extract: Extract::Segment { separator: separator.to_string(), index },
            fallback: String::new(),
        }
    }

    /// Sets the value used when the field is missing.
    pub fn or(mut self, fallback: &str) -> Self {
        self.fallback = fallback.to_string();
        self
    }

    /// Reads the field from the first element under `scope` matching the selector.
    ///
    /// A missing element degrades to the fallback; only an invalid selector
    /// is an error.
    pub fn read<S: Scope>(&self, scope: &S) -> Result<String> {
        let value = scope
            .first(&self.selector)?
            .map(|element| self.extract.apply(&element))
            .unwrap_or_default();

        if value.is_empty() { Ok(self.fallback.clone()) } else { Ok(value) }
    }
}

/// Something a selector can be evaluated against.
pub trait Scope {
    fn first(&self, selector: &str) -> Result<Option<Element<'_>>>;
}

impl Scope for Document {
    fn first(&self, selector: &str) -> Result<Option<Element<'_>>> {
        self.select_first(selector)
    }
}

impl Scope for Element<'_> {
    fn first(&self, selector: &str) -> Result<Option<Element<'_>>> {
        self.select_first(selector)
    }
}

/// Rules for one topic card on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRules {
    /// Selector for each topic card.
    pub item: String,
    pub title: FieldRule,
    pub link: FieldRule,
    pub author: FieldRule,
    pub comment_count: FieldRule,
    pub activity_time: FieldRule,
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            item: ".cell.item".to_string(),
            title: FieldRule::text(".item_title a"),
            link: FieldRule::attr(".item_title a", "href"),
            author: FieldRule::text("strong a"),
            comment_count: FieldRule::text(".count_livid").or("0"),
            // node • author • time • last reply
            activity_time: FieldRule::segment(".topic_info", "•", 2),
        }
    }
}

/// Rules for a topic detail page and its reply cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailRules {
    pub title: FieldRule,
    pub author: FieldRule,
    pub time: FieldRule,
    pub content: FieldRule,
    /// Selector for each reply cell.
    pub reply: String,
    pub reply_author: FieldRule,
    pub reply_time: FieldRule,
    pub reply_content: FieldRule,
    pub reply_number: FieldRule,
}

impl Default for DetailRules {
    fn default() -> Self {
        Self {
            title: FieldRule::text("h1"),
            author: FieldRule::text(".header small a"),
            time: FieldRule::attr_or_text(".header small span", "title"),
            content: FieldRule::text(".topic_content"),
            reply: ".cell[id^='r_']".to_string(),
            reply_author: FieldRule::text("strong a"),
            reply_time: FieldRule::text(".ago"),
            reply_content: FieldRule::text(".reply_content"),
            reply_number: FieldRule::text(".no"),
        }
    }
}

/// The complete rule table for one forum site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteRules {
    /// Canonical origin relative links are resolved against.
    pub origin: String,
    /// Listing page fetched when no URL is given.
    pub listing_url: String,
    pub listing: ListingRules,
    pub detail: DetailRules,
}

impl Default for SiteRules {
    fn default() -> Self {
        Self {
            origin: "https://www.v2ex.com".to_string(),
            listing_url: "https://www.v2ex.com/?tab=all".to_string(),
            listing: ListingRules::default(),
            detail: DetailRules::default(),
        }
    }
}

impl SiteRules {
    /// Parses the canonical origin.
    pub fn origin_url(&self) -> Result<Url> {
        validate_url(&self.origin)
    }

    /// Every field rule as a (field name, rule) table.
    pub fn field_rules(&self) -> Vec<(&'static str, &FieldRule)> {
        let listing = &self.listing;
        let detail = &self.detail;

        vec![
            ("listing.title", &listing.title),
            ("listing.link", &listing.link),
            ("listing.author", &listing.author),
            ("listing.comment_count", &listing.comment_count),
            ("listing.activity_time", &listing.activity_time),
            ("detail.title", &detail.title),
            ("detail.author", &detail.author),
            ("detail.time", &detail.time),
            ("detail.content", &detail.content),
            ("detail.reply_author", &detail.reply_author),
            ("detail.reply_time", &detail.reply_time),
            ("detail.reply_content", &detail.reply_content),
            ("detail.reply_number", &detail.reply_number),
        ]
    }

    /// Checks that every selector compiles and both URLs are valid.
    pub fn validate(&self) -> Result<()> {
        self.origin_url()
            .map_err(|e| FetchError::ConfigError(format!("origin: {}", e)))?;
        validate_url(&self.listing_url).map_err(|e| FetchError::ConfigError(format!("listing_url: {}", e)))?;

        let containers = [("listing.item", &self.listing.item), ("detail.reply", &self.detail.reply)];
        for (field, selector) in containers {
            compile_selector(selector).map_err(|e| FetchError::ConfigError(format!("{}: {}", field, e)))?;
        }

        for (field, rule) in self.field_rules() {
            compile_selector(&rule.selector).map_err(|e| FetchError::ConfigError(format!("{}: {}", field, e)))?;
        }

        Ok(())
    }

    /// Parses and validates a rule table from JSON.
    ///
    /// Omitted sections keep their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: SiteRules = serde_json::from_str(json).map_err(|e| FetchError::ConfigError(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Loads and validates a rule table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FetchError::FileNotFound(path.to_path_buf()));
        }

        let json = fs::read_to_string(path)
            .map_err(|e| FetchError::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

/// Locates the rule table to use.
///
/// Lookup order: an explicit path, then `<config dir>/replytree/rules.json`,
/// then the built-in defaults.
#[derive(Debug, Clone)]
pub struct RulesLoader {
    custom_path: Option<PathBuf>,
    standard_path: Option<PathBuf>,
}

impl RulesLoader {
    /// Creates a loader using the platform config directory.
    pub fn new() -> Self {
        Self { custom_path: None, standard_path: dirs::config_dir().map(|dir| dir.join("replytree").join("rules.json")) }
    }

    /// Uses an explicit rule file. A missing or invalid explicit file is an error.
    pub fn custom_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_path = Some(path.into());
        self
    }

    /// Overrides the standard location (None disables it).
    pub fn standard_path(mut self, path: Option<PathBuf>) -> Self {
        self.standard_path = path;
        self
    }

    /// Resolves the rule table.
    ///
    /// A broken file at the standard location is logged and skipped.
    pub fn load(&self) -> Result<SiteRules> {
        if let Some(path) = &self.custom_path {
            tracing::debug!(path = %path.display(), "loading rules file");
            return SiteRules::from_file(path);
        }

        if let Some(path) = &self.standard_path
            && path.exists()
        {
            match SiteRules::from_file(path) {
                Ok(rules) => {
                    tracing::debug!(path = %path.display(), "loaded rules file");
                    return Ok(rules);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring invalid rules file"),
            }
        }

        Ok(SiteRules::default())
    }
}

impl Default for RulesLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_rules_validate() {
        let rules = SiteRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.origin_url().unwrap().as_str(), "https://www.v2ex.com/");
    }

    #[test]
    fn test_split_segment() {
        assert_eq!(split_segment("node • 3 小时前 • 2 小时前", "•", 2), "2 小时前");
        assert_eq!(split_segment("a • b", "•", 2), "");
        assert_eq!(split_segment("  only  ", "•", 0), "only");
    }

    #[test]
    fn test_field_rule_fallback() {
        let doc = Document::parse(r#"<div class="cell item"><span>no badge</span></div>"#).unwrap();
        let rule = FieldRule::text(".count_livid").or("0");
        assert_eq!(rule.read(&doc).unwrap(), "0");
    }

    #[test]
    fn test_attr_or_text_prefers_attribute() {
        let doc = Document::parse(
            r#"<span class="a" title="2024-01-02 10:00:00 +08:00">1 天前</span><span class="b">2 天前</span>"#,
        )
        .unwrap();

        assert_eq!(
            FieldRule::attr_or_text("span.a", "title").read(&doc).unwrap(),
            "2024-01-02 10:00:00 +08:00"
        );
        assert_eq!(FieldRule::attr_or_text("span.b", "title").read(&doc).unwrap(), "2 天前");
    }

    #[test]
    fn test_read_invalid_selector() {
        let doc = Document::parse("<p>x</p>").unwrap();
        let result = FieldRule::text("[[bad").read(&doc);
        assert!(matches!(result, Err(FetchError::HtmlParseError(_))));
    }

    #[test]
    fn test_from_json_partial_override() {
        let json = r#"{ "origin": "https://example.org", "listing": { "item": "li.topic" } }"#;
        let rules = SiteRules::from_json(json).unwrap();

        assert_eq!(rules.origin, "https://example.org");
        assert_eq!(rules.listing.item, "li.topic");
        assert_eq!(rules.listing.title, ListingRules::default().title);
        assert_eq!(rules.detail, DetailRules::default());
    }

    #[test]
    fn test_from_json_segment_rule() {
        let json = r#"{ "listing": { "activity_time": {
            "selector": ".meta",
            "extract": { "kind": "segment", "separator": "|", "index": 1 }
        } } }"#;
        let rules = SiteRules::from_json(json).unwrap();

        assert_eq!(rules.listing.activity_time, FieldRule::segment(".meta", "|", 1));
    }

    #[test]
    fn test_from_json_rejects_bad_selector() {
        let json = r#"{ "detail": { "reply": "[[broken" } }"#;
        let result = SiteRules::from_json(json);
        assert!(matches!(result, Err(FetchError::ConfigError(_))));
    }

    #[test]
    fn test_from_json_rejects_relative_origin() {
        let result = SiteRules::from_json(r#"{ "origin": "/relative" }"#);
        assert!(matches!(result, Err(FetchError::ConfigError(_))));
    }

    #[test]
    fn test_loader_custom_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "origin": "https://forum.example.com" }}"#).unwrap();

        let rules = RulesLoader::new().standard_path(None).custom_path(file.path()).load().unwrap();
        assert_eq!(rules.origin, "https://forum.example.com");
    }

    #[test]
    fn test_loader_missing_custom_path() {
        let result = RulesLoader::new().custom_path("/nonexistent/rules.json").load();
        assert!(matches!(result, Err(FetchError::FileNotFound(_))));
    }

    #[test]
    fn test_loader_skips_invalid_standard_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, "not json").unwrap();

        let rules = RulesLoader::new().standard_path(Some(path)).load().unwrap();
        assert_eq!(rules, SiteRules::default());
    }

    #[test]
    fn test_loader_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let rules = RulesLoader::new()
            .standard_path(Some(dir.path().join("missing.json")))
            .load()
            .unwrap();
        assert_eq!(rules, SiteRules::default());
    }
}
