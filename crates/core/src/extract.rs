//! Record extraction from forum pages.
//!
//! Both entry points are pure functions of a parsed [`Document`] and a
//! [`SiteRules`] table. Missing fields degrade to empty strings (or the
//! rule's fallback) instead of failing the page; only an invalid selector
//! is an error.

use url::Url;

use crate::Result;
use crate::model::{Reply, Topic};
use crate::parse::{Document, Element};
use crate::rules::{DetailRules, ListingRules, SiteRules};

/// Resolves a detail link against the site origin.
///
/// Links that already carry an http(s) scheme are returned unchanged.
/// Returns `None` for an empty link, one that cannot be joined, or one
/// that does not resolve to an http(s) URL.
///
/// ```rust
/// use replytree_core::extract::resolve_link;
/// use url::Url;
///
/// let origin = Url::parse("https://www.v2ex.com").unwrap();
/// assert_eq!(resolve_link("/t/12345", &origin).as_deref(), Some("https://www.v2ex.com/t/12345"));
/// ```
pub fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => Some(href.to_string()),
        _ => origin
            .join(href)
            .ok()
            .filter(|joined| matches!(joined.scheme(), "http" | "https"))
            .map(String::from),
    }
}

/// Extracts one topic card. Returns `None` when the card lacks a title or link.
fn extract_card(card: &Element<'_>, rules: &ListingRules, origin: &Url) -> Result<Option<Topic>> {
    let title = rules.title.read(card)?;
    let href = rules.link.read(card)?;

    let url = match resolve_link(&href, origin) {
        Some(url) if !title.is_empty() => url,
        _ => return Ok(None),
    };

    Ok(Some(Topic {
        title,
        author: rules.author.read(card)?,
        url,
        comment_count: rules.comment_count.read(card)?,
        activity_time: rules.activity_time.read(card)?,
        ..Default::default()
    }))
}

/// Extracts topic summaries from a listing page, in document order.
///
/// Cards without a title or link are skipped.
pub fn extract_topic_list(doc: &Document, rules: &SiteRules) -> Result<Vec<Topic>> {
    let origin = rules.origin_url()?;
    let cards = doc.select(&rules.listing.item)?;
    let mut topics = Vec::with_capacity(cards.len());

    for (index, card) in cards.iter().enumerate() {
        match extract_card(card, &rules.listing, &origin)? {
            Some(topic) => topics.push(topic),
            None => tracing::warn!(index, "skipping topic card without title or link"),
        }
    }

    tracing::debug!(cards = cards.len(), topics = topics.len(), "extracted topic list");

    Ok(topics)
}

/// Extracts one reply cell.
fn extract_reply(cell: &Element<'_>, rules: &DetailRules) -> Result<Reply> {
    Ok(Reply::new(
        rules.reply_author.read(cell)?,
        rules.reply_time.read(cell)?,
        rules.reply_content.read(cell)?,
        rules.reply_number.read(cell)?,
    ))
}

/// Extracts every reply cell in document order.
///
/// `reply_count` is left at zero; see [`crate::thread::compute_reply_counts`].
pub fn extract_replies(doc: &Document, rules: &DetailRules) -> Result<Vec<Reply>> {
    doc.select(&rules.reply)?
        .iter()
        .map(|cell| extract_reply(cell, rules))
        .collect()
}

/// Extracts a topic detail page.
///
/// Fills title, author, time, body and the ordered replies. Reply counts are
/// not computed here.
pub fn extract_topic_detail(doc: &Document, url: &str, rules: &SiteRules) -> Result<Topic> {
    let detail = &rules.detail;
    let replies = extract_replies(doc, detail)?;

    let topic = Topic {
        title: detail.title.read(doc)?,
        author: detail.author.read(doc)?,
        url: url.to_string(),
        comment_count: replies.len().to_string(),
        activity_time: detail.time.read(doc)?,
        content: detail.content.read(doc)?,
        replies,
    };

    tracing::debug!(url, replies = topic.replies.len(), "extracted topic detail");

    Ok(topic)
}
