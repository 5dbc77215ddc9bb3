//! Main fetch-extract-reconstruct API.
//!
//! [`Forum`] ties the fetcher, the extractor and the thread reconstructor
//! together so every detail fetch computes reply counts the same way. The
//! free functions [`parse_topic_list`] and [`parse_topic`] do the same for
//! HTML that is already in hand.
//!
//! # Example
//!
//! ```rust,no_run
//! use replytree_core::Forum;
//!
//! # #[tokio::main]
//! # async fn main() -> replytree_core::Result<()> {
//! let forum = Forum::new();
//! let topics = forum.fetch_topics().await?;
//! if let Some(first) = topics.first() {
//!     let topic = forum.fetch_topic(&first.url).await?;
//!     println!("{} replies", topic.replies.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::Result;
use crate::extract::{extract_topic_detail, extract_topic_list};
use crate::fetch::FetchConfig;
#[cfg(feature = "fetch")]
use crate::fetch::fetch_document;
use crate::model::Topic;
use crate::parse::Document;
use crate::rules::SiteRules;
use crate::thread::compute_reply_counts;

/// Configuration for a [`Forum`].
///
/// # Example
///
/// ```rust
/// use replytree_core::ForumConfig;
///
/// let config = ForumConfig::builder()
///     .timeout(10)
///     .user_agent("my-reader/1.0")
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ForumConfig {
    /// HTTP settings.
    pub fetch: FetchConfig,
    /// Selector rules for the site.
    pub rules: SiteRules,
}

impl ForumConfig {
    /// Creates a new builder for ForumConfig.
    pub fn builder() -> ForumConfigBuilder {
        ForumConfigBuilder::new()
    }
}

/// Builder for ForumConfig.
pub struct ForumConfigBuilder {
    config: ForumConfig,
}

impl ForumConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ForumConfig::default() }
    }

    /// Sets the HTTP settings.
    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the selector rules.
    pub fn rules(mut self, value: SiteRules) -> Self {
        self.config.rules = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ForumConfig {
        self.config
    }
}

impl Default for ForumConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for reading a forum.
///
/// A Forum holds only immutable configuration; every call performs a fresh
/// fetch and returns a new record set.
#[derive(Debug, Clone, Default)]
pub struct Forum {
    config: ForumConfig,
}

impl Forum {
    /// Creates a Forum with default configuration (V2EX rules).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Forum with custom configuration.
    pub fn with_config(config: ForumConfig) -> Self {
        Self { config }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    /// Extracts topic summaries from listing HTML.
    pub fn parse_topics(&self, html: &str) -> Result<Vec<Topic>> {
        let doc = Document::parse(html)?;
        extract_topic_list(&doc, &self.config.rules)
    }

    /// Extracts a topic with its replies and reply counts from detail HTML.
    pub fn parse_topic(&self, html: &str, url: &str) -> Result<Topic> {
        let doc = Document::parse(html)?;
        self.topic_from_document(&doc, url)
    }

    fn topic_from_document(&self, doc: &Document, url: &str) -> Result<Topic> {
        let mut topic = extract_topic_detail(doc, url, &self.config.rules)?;
        topic.replies = compute_reply_counts(topic.replies);
        Ok(topic)
    }

    /// Fetches the configured listing page and extracts its topics.
    #[cfg(feature = "fetch")]
    pub async fn fetch_topics(&self) -> Result<Vec<Topic>> {
        self.fetch_topics_from(&self.config.rules.listing_url).await
    }

    /// Fetches a listing page and extracts its topics.
    #[cfg(feature = "fetch")]
    pub async fn fetch_topics_from(&self, url: &str) -> Result<Vec<Topic>> {
        let doc = fetch_document(url, &self.config.fetch).await?;
        extract_topic_list(&doc, &self.config.rules)
    }

    /// Fetches a topic page, extracts it and computes reply counts.
    #[cfg(feature = "fetch")]
    pub async fn fetch_topic(&self, url: &str) -> Result<Topic> {
        let doc = fetch_document(url, &self.config.fetch).await?;
        self.topic_from_document(&doc, url)
    }
}

/// Extracts topic summaries from listing HTML using the default rules.
pub fn parse_topic_list(html: &str) -> Result<Vec<Topic>> {
    Forum::new().parse_topics(html)
}

/// Extracts a full topic from detail HTML using the default rules.
pub fn parse_topic(html: &str, url: &str) -> Result<Topic> {
    Forum::new().parse_topic(html, url)
}

/// Fetches the default listing page.
#[cfg(feature = "fetch")]
pub async fn fetch_topic_list() -> Result<Vec<Topic>> {
    Forum::new().fetch_topics().await
}

/// Fetches one topic with the default configuration.
#[cfg(feature = "fetch")]
pub async fn fetch_topic(url: &str) -> Result<Topic> {
    Forum::new().fetch_topic(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_HTML: &str = r#"
        <h1>Thread</h1>
        <div class="cell" id="r_1"><strong><a>alice</a></strong><div class="reply_content">first post</div></div>
        <div class="cell" id="r_2"><strong><a>bob</a></strong><div class="reply_content">@alice agreed</div></div>
        <div class="cell" id="r_3"><strong><a>carol</a></strong><div class="reply_content">@alice me too</div></div>
    "#;

    #[test]
    fn test_builder_defaults() {
        let config = ForumConfig::builder().build();
        assert_eq!(config.fetch.timeout, 30);
        assert_eq!(config.rules, SiteRules::default());
    }

    #[test]
    fn test_builder_overrides() {
        let rules = SiteRules { origin: "https://example.org".to_string(), ..Default::default() };
        let config = ForumConfig::builder()
            .timeout(5)
            .user_agent("test-agent")
            .rules(rules)
            .build();

        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "test-agent");
        assert_eq!(config.rules.origin, "https://example.org");
    }

    #[test]
    fn test_parse_topic_computes_reply_counts() {
        let topic = parse_topic(DETAIL_HTML, "https://www.v2ex.com/t/1").unwrap();
        let counts: Vec<usize> = topic.replies.iter().map(|r| r.reply_count).collect();

        assert_eq!(topic.title, "Thread");
        assert_eq!(counts, vec![2, 0, 0]);
    }

    #[test]
    fn test_parse_topic_list_uses_rules_origin() {
        let rules = SiteRules { origin: "https://forum.example.com".to_string(), ..Default::default() };
        let forum = Forum::with_config(ForumConfig::builder().rules(rules).build());
        let html = r#"<div class="cell item"><span class="item_title"><a href="/t/3">x</a></span></div>"#;

        let topics = forum.parse_topics(html).unwrap();
        assert_eq!(topics[0].url, "https://forum.example.com/t/3");
    }
}
