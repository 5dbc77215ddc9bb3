use serde::Serialize;

use crate::Result;
use crate::model::{Reply, Topic};
use crate::thread::{MentionEdge, ReplyThread, mention_edges};

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
    /// Attach the reply graph edges to topic output
    pub include_edges: bool,
}

/// Topic output with optional reply graph
#[derive(Debug, Clone, Serialize)]
pub struct TopicOutput<'a> {
    #[serde(flatten)]
    pub topic: &'a Topic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<MentionEdge<'a>>>,
}

/// Replies that mention one author
#[derive(Debug, Clone, Serialize)]
pub struct MentionsOutput<'a> {
    pub target: &'a str,
    pub replies: &'a [&'a Reply],
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Convert a topic listing to a JSON array
pub fn topics_to_json(topics: &[Topic], config: &JsonConfig) -> Result<String> {
    to_json(&topics, config.pretty)
}

/// Convert one topic (with replies) to JSON
pub fn topic_to_json(topic: &Topic, config: &JsonConfig) -> Result<String> {
    let edges = if config.include_edges { Some(mention_edges(&topic.replies)) } else { None };
    to_json(&TopicOutput { topic, edges }, config.pretty)
}

/// Convert a reply thread view to JSON
pub fn thread_to_json(thread: &ReplyThread<'_>, config: &JsonConfig) -> Result<String> {
    to_json(thread, config.pretty)
}

/// Convert the replies that mention `target` to JSON
pub fn mentions_to_json(target: &str, replies: &[&Reply], config: &JsonConfig) -> Result<String> {
    to_json(&MentionsOutput { target, replies }, config.pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn topic_list(&self, topics: &[Topic]) -> Result<String> {
        topics_to_json(topics, &self.config)
    }

    pub fn topic(&self, topic: &Topic) -> Result<String> {
        topic_to_json(topic, &self.config)
    }

    pub fn thread(&self, thread: &ReplyThread<'_>) -> Result<String> {
        thread_to_json(thread, &self.config)
    }

    pub fn mentions(&self, target: &str, replies: &[&Reply]) -> Result<String> {
        mentions_to_json(target, replies, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::{compute_reply_counts, find_replies_to, reply_thread};

    fn sample_topic() -> Topic {
        Topic {
            title: "Thread".into(),
            url: "https://www.v2ex.com/t/1".into(),
            replies: compute_reply_counts(vec![
                Reply::new("alice", "", "first post", "1"),
                Reply::new("bob", "", "@alice agreed", "2"),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_topics_to_json_array() {
        let json = topics_to_json(&[sample_topic()], &JsonConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["title"], "Thread");
    }

    #[test]
    fn test_topic_to_json_round_trips() {
        let topic = sample_topic();
        let json = topic_to_json(&topic, &JsonConfig::default()).unwrap();
        let parsed: Topic = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, topic);
        assert!(!json.contains("edges"));
    }

    #[test]
    fn test_topic_to_json_with_edges() {
        let config = JsonConfig { pretty: true, include_edges: true };
        let json = topic_to_json(&sample_topic(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(json.contains('\n'));
        assert_eq!(value["edges"][0]["from"], 1);
        assert_eq!(value["edges"][0]["to_author"], "alice");
        assert_eq!(value["replies"][0]["reply_count"], 1);
    }

    #[test]
    fn test_thread_to_json() {
        let topic = sample_topic();
        let thread = reply_thread(&topic.replies, 0).unwrap();
        let json = JsonFormatter::new(JsonConfig::default()).thread(&thread).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["reply"]["author"], "alice");
        assert_eq!(value["responses"][0]["author"], "bob");
    }

    #[test]
    fn test_mentions_to_json() {
        let topic = sample_topic();
        let to_alice = find_replies_to(&topic.replies, "alice");
        let json = mentions_to_json("alice", &to_alice, &JsonConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["target"], "alice");
        assert_eq!(value["replies"].as_array().unwrap().len(), 1);
        assert_eq!(value["replies"][0]["author"], "bob");
    }
}
