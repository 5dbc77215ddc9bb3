pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod forum;
pub mod model;
pub mod parse;
pub mod rules;
pub mod thread;

pub use error::{FetchError, Result};
pub use extract::{extract_replies, extract_topic_detail, extract_topic_list, resolve_link};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, validate_url};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_document, fetch_url};
pub use formatters::{JsonConfig, JsonFormatter, TextConfig, TextFormatter};
pub use formatters::{
    mentions_to_json, mentions_to_text, thread_to_json, thread_to_text, topic_to_json, topic_to_text, topics_to_json,
    topics_to_text,
};
pub use forum::{Forum, ForumConfig, ForumConfigBuilder, parse_topic, parse_topic_list};
#[cfg(feature = "fetch")]
pub use forum::{fetch_topic, fetch_topic_list};
pub use model::{Reply, Topic, parse_mention};
pub use parse::{Document, Element};
pub use rules::{DetailRules, Extract, FieldRule, ListingRules, RulesLoader, SiteRules};
pub use thread::{MentionEdge, ReplyThread, compute_reply_counts, find_replies_to, mention_edges, reply_thread};
