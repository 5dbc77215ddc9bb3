//! Topic and reply records.
//!
//! These are plain value types. A [`Topic`] is built fresh by every listing
//! or detail extraction and is never patched afterwards; re-fetching produces
//! a new record.

use serde::{Deserialize, Serialize};

/// One forum thread.
///
/// Listing extraction fills the summary fields. Detail extraction also fills
/// `content` and `replies`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topic {
    /// Thread title.
    pub title: String,

    /// Username of the thread starter.
    pub author: String,

    /// Absolute URL of the thread page.
    pub url: String,

    /// Comment count as displayed on the listing ("0" when no badge is shown).
    pub comment_count: String,

    /// Relative or absolute timestamp text, not normalized.
    pub activity_time: String,

    /// Body text. Empty for listing summaries.
    pub content: String,

    /// Replies in page order. Empty for listing summaries.
    pub replies: Vec<Reply>,
}

impl Topic {
    /// Returns true when the record carries detail data.
    pub fn has_detail(&self) -> bool {
        !self.content.is_empty() || !self.replies.is_empty()
    }
}

/// One comment under a topic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reply {
    pub author: String,
    pub time: String,
    pub content: String,

    /// Display index as shown on the page; opaque text.
    pub number: String,

    /// Username from a leading `@name` in `content`, or empty.
    pub mentioned_author: String,

    /// How many later replies in the same topic mention this reply's author.
    ///
    /// Set only by [`crate::thread::compute_reply_counts`].
    pub reply_count: usize,
}

impl Reply {
    /// Builds a reply and derives `mentioned_author` from its content.
    pub fn new(
        author: impl Into<String>, time: impl Into<String>, content: impl Into<String>, number: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let mentioned_author = parse_mention(&content).to_string();

        Self { author: author.into(), time: time.into(), content, number: number.into(), mentioned_author, reply_count: 0 }
    }

    /// Returns true when this reply opens with an `@name` mention.
    pub fn is_mention(&self) -> bool {
        !self.mentioned_author.is_empty()
    }
}

/// Extracts the username from a leading `@name` mention.
///
/// Leading whitespace is ignored. The name runs from after the `@` to the
/// first whitespace character or the end of the text.
///
/// ```rust
/// use replytree_core::model::parse_mention;
///
/// assert_eq!(parse_mention("@alice thanks!"), "alice");
/// assert_eq!(parse_mention("alice, thanks"), "");
/// assert_eq!(parse_mention("@bob"), "bob");
/// ```
pub fn parse_mention(content: &str) -> &str {
    content
        .trim_start()
        .strip_prefix('@')
        .and_then(|rest| rest.split(char::is_whitespace).next())
        .unwrap_or("")
}
