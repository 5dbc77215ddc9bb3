//! Reply-graph reconstruction from `@name` mentions.
//!
//! The forum has no explicit reply-to links. A reply that opens with
//! `@alice` is treated as answering alice, and an edge only ever points
//! forward in page order: a reply can be answered by later replies, never by
//! earlier ones.
//!
//! A reply without a mention addresses nobody, so an empty
//! `mentioned_author` never forms an edge.

use serde::Serialize;

use crate::model::Reply;

/// One edge of the reply graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionEdge<'a> {
    /// Index of the replying comment in page order.
    pub from: usize,
    /// Author the comment addresses.
    pub to_author: &'a str,
}

/// A reply together with every reply in the topic addressed to its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyThread<'a> {
    pub reply: &'a Reply,
    pub responses: Vec<&'a Reply>,
}

/// Populates `reply_count` for every reply.
///
/// `reply_count[i]` is the number of replies `j > i` whose mentioned author
/// equals `replies[i].author` (exact, case-sensitive match). Any previous
/// counts are overwritten.
///
/// ```rust
/// use replytree_core::model::Reply;
/// use replytree_core::thread::compute_reply_counts;
///
/// let replies = compute_reply_counts(vec![
///     Reply::new("alice", "", "first post", "1"),
///     Reply::new("bob", "", "@alice agreed", "2"),
///     Reply::new("carol", "", "@alice me too", "3"),
/// ]);
/// let counts: Vec<usize> = replies.iter().map(|r| r.reply_count).collect();
/// assert_eq!(counts, vec![2, 0, 0]);
/// ```
pub fn compute_reply_counts(mut replies: Vec<Reply>) -> Vec<Reply> {
    let counts: Vec<usize> = replies
        .iter()
        .enumerate()
        .map(|(i, reply)| {
            replies[i + 1..]
                .iter()
                .filter(|later| later.is_mention() && later.mentioned_author == reply.author)
                .count()
        })
        .collect();

    for (reply, count) in replies.iter_mut().zip(counts) {
        reply.reply_count = count;
    }

    replies
}

/// Selects every reply that mentions `target_author`, preserving order.
pub fn find_replies_to<'a>(replies: &'a [Reply], target_author: &str) -> Vec<&'a Reply> {
    if target_author.is_empty() {
        return Vec::new();
    }

    replies
        .iter()
        .filter(|reply| reply.mentioned_author == target_author)
        .collect()
}

/// Lists the reply graph as (replier → mentioned author) edges in page order.
pub fn mention_edges(replies: &[Reply]) -> Vec<MentionEdge<'_>> {
    replies
        .iter()
        .enumerate()
        .filter(|(_, reply)| reply.is_mention())
        .map(|(from, reply)| MentionEdge { from, to_author: &reply.mentioned_author })
        .collect()
}

/// Builds the thread view for the reply at `index` (0-based).
///
/// Returns `None` when `index` is out of range.
pub fn reply_thread(replies: &[Reply], index: usize) -> Option<ReplyThread<'_>> {
    let reply = replies.get(index)?;
    Some(ReplyThread { reply, responses: find_replies_to(replies, &reply.author) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(author: &str, content: &str) -> Reply {
        Reply::new(author, "", content, "")
    }

    fn scenario() -> Vec<Reply> {
        vec![
            reply("alice", "first post"),
            reply("bob", "@alice agreed"),
            reply("carol", "@alice me too"),
        ]
    }

    #[test]
    fn test_compute_reply_counts_scenario() {
        let replies = compute_reply_counts(scenario());
        let counts: Vec<usize> = replies.iter().map(|r| r.reply_count).collect();
        assert_eq!(counts, vec![2, 0, 0]);
    }

    #[test]
    fn test_find_replies_to_scenario() {
        let replies = compute_reply_counts(scenario());
        let found = find_replies_to(&replies, "alice");

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].author, "bob");
        assert_eq!(found[1].author, "carol");
        assert!(find_replies_to(&replies, "dave").is_empty());
        assert!(find_replies_to(&replies, "").is_empty());
    }

    #[test]
    fn test_counts_only_look_forward() {
        let replies = compute_reply_counts(vec![
            reply("bob", "@alice early"),
            reply("alice", "hello"),
            reply("carol", "@alice later"),
        ]);

        assert_eq!(replies[1].reply_count, 1);
        assert_eq!(replies[0].reply_count, 0);
    }

    #[test]
    fn test_repeated_author_counts_each_position() {
        let replies = compute_reply_counts(vec![
            reply("alice", "one"),
            reply("bob", "@alice a"),
            reply("alice", "two"),
            reply("carol", "@alice b"),
        ]);

        let counts: Vec<usize> = replies.iter().map(|r| r.reply_count).collect();
        assert_eq!(counts, vec![2, 0, 1, 0]);
    }

    #[test]
    fn test_case_sensitive_match() {
        let replies = compute_reply_counts(vec![reply("Alice", "hi"), reply("bob", "@alice hey")]);
        assert_eq!(replies[0].reply_count, 0);
    }

    #[test]
    fn test_missing_author_collects_nothing() {
        let replies = compute_reply_counts(vec![reply("", "no byline"), reply("bob", "plain text")]);
        assert_eq!(replies[0].reply_count, 0);
    }

    #[test]
    fn test_counts_overwrite_previous_values() {
        let mut stale = scenario();
        stale[1].reply_count = 9;
        let replies = compute_reply_counts(stale);
        assert_eq!(replies[1].reply_count, 0);
    }

    #[test]
    fn test_count_property_holds() {
        let authors = ["a", "b", "c", "a", "b", "d", "a"];
        let contents = ["x", "@a y", "@b z", "@c", "@a", "@a q", "@b"];
        let input: Vec<Reply> = authors
            .iter()
            .zip(contents.iter())
            .map(|(a, c)| reply(a, c))
            .collect();
        let replies = compute_reply_counts(input);

        for (i, r) in replies.iter().enumerate() {
            let expected = replies[i + 1..]
                .iter()
                .filter(|later| later.mentioned_author == r.author)
                .count();
            assert_eq!(r.reply_count, expected, "reply {}", i);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_reply_counts(Vec::new()).is_empty());
        assert!(mention_edges(&[]).is_empty());
    }

    #[test]
    fn test_mention_edges() {
        let replies = scenario();
        let edges = mention_edges(&replies);

        assert_eq!(
            edges,
            vec![MentionEdge { from: 1, to_author: "alice" }, MentionEdge { from: 2, to_author: "alice" }]
        );
    }

    #[test]
    fn test_reply_thread() {
        let replies = compute_reply_counts(scenario());
        let thread = reply_thread(&replies, 0).unwrap();

        assert_eq!(thread.reply.author, "alice");
        assert_eq!(thread.responses.len(), thread.reply.reply_count);
        assert!(reply_thread(&replies, 3).is_none());
    }
}
